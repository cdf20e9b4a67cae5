//! Cross-profile project index.
//!
//! Projects are flattened profile by profile in insertion order, keeping each
//! profile's own project order. No deduplication happens here; distinct
//! titles are guaranteed by the store's uniqueness constraint.

use crate::model::profile::{Profile, Project};
use crate::repo::profile_repo::{ProfileOrder, ProfileRepository, RepoResult};
use log::debug;

/// Returns every project, optionally restricted to an exact skill tag.
///
/// `None` and `Some("")` both return the unfiltered index.
pub fn list_projects<R: ProfileRepository + ?Sized>(
    repo: &R,
    skill: Option<&str>,
) -> RepoResult<Vec<Project>> {
    let profiles = repo.list_profiles(ProfileOrder::Insertion)?;
    let projects = flatten_projects(profiles, skill);
    debug!(
        "event=project_index module=insights status=ok filtered={} projects={}",
        skill.is_some_and(|value| !value.is_empty()),
        projects.len()
    );
    Ok(projects)
}

/// Flattens already-loaded profiles into one project sequence.
pub fn flatten_projects(
    profiles: impl IntoIterator<Item = Profile>,
    skill: Option<&str>,
) -> Vec<Project> {
    let skill = skill.filter(|value| !value.is_empty());
    profiles
        .into_iter()
        .flat_map(|profile| profile.projects)
        .filter(|project| skill.map_or(true, |wanted| project.has_skill(wanted)))
        .collect()
}
