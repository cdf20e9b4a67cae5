//! Substring search over the profile collection.
//!
//! # Invariants
//! - A profile matches when the lowercased query occurs in its name, email,
//!   any skill, any project title or any project description.
//! - Results keep scan order and contain each profile at most once.
//! - An empty query matches every profile; callers that want the listing
//!   shape should not call search for blank input.

use crate::model::profile::Profile;
use crate::repo::profile_repo::{ProfileOrder, ProfileRepository, RepoResult};
use log::debug;

/// Scans the store in insertion order and returns matching profiles.
pub fn search_profiles<R: ProfileRepository + ?Sized>(
    repo: &R,
    query: &str,
) -> RepoResult<Vec<Profile>> {
    let profiles = repo.list_profiles(ProfileOrder::Insertion)?;
    let scanned = profiles.len();
    let results = filter_profiles(profiles, query);
    debug!(
        "event=profile_search module=search status=ok scanned={scanned} matched={} query_chars={}",
        results.len(),
        query.chars().count()
    );
    Ok(results)
}

/// Filters an already-loaded sequence of profiles, preserving its order.
pub fn filter_profiles(profiles: impl IntoIterator<Item = Profile>, query: &str) -> Vec<Profile> {
    let needle = query.to_lowercase();
    profiles
        .into_iter()
        .filter(|profile| profile_matches(profile, &needle))
        .collect()
}

/// Returns whether `profile` contains `needle`, which must already be lowercase.
pub fn profile_matches(profile: &Profile, needle: &str) -> bool {
    contains_folded(&profile.name, needle)
        || contains_folded(&profile.email, needle)
        || profile
            .skills
            .iter()
            .any(|skill| contains_folded(skill, needle))
        || profile.projects.iter().any(|project| {
            contains_folded(&project.title, needle)
                || project
                    .description
                    .as_deref()
                    .is_some_and(|description| contains_folded(description, needle))
        })
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
