//! Skill frequency ranking.
//!
//! Counting is exact and case-sensitive: `"React"` and `"react"` are separate
//! skills. Ties keep the order in which skills were first seen while scanning.

use crate::model::profile::Profile;
use crate::repo::profile_repo::{ProfileOrder, ProfileRepository, RepoResult};
use log::debug;
use std::collections::HashMap;

/// Number of skills returned when the caller does not ask for a limit.
pub const TOP_SKILLS_DEFAULT_LIMIT: usize = 5;
/// Upper bound applied to caller-supplied limits.
pub const TOP_SKILLS_LIMIT_MAX: usize = 50;

/// One ranked skill with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

/// Returns up to `limit` skills, most frequent first.
pub fn top_skills<R: ProfileRepository + ?Sized>(
    repo: &R,
    limit: usize,
) -> RepoResult<Vec<String>> {
    let profiles = repo.list_profiles(ProfileOrder::Insertion)?;
    let ranked = rank_skills(&profiles);
    debug!(
        "event=top_skills module=insights status=ok profiles={} distinct_skills={} limit={limit}",
        profiles.len(),
        ranked.len()
    );
    Ok(ranked
        .into_iter()
        .take(limit)
        .map(|entry| entry.skill)
        .collect())
}

/// Counts every skill occurrence and orders by descending count.
///
/// The sort is stable over first-seen order, so equal counts never reorder.
pub fn rank_skills(profiles: &[Profile]) -> Vec<SkillCount> {
    let mut ranked: Vec<SkillCount> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for skill in profiles.iter().flat_map(|profile| profile.skills.iter()) {
        match slots.get(skill.as_str()) {
            Some(&slot) => ranked[slot].count += 1,
            None => {
                slots.insert(skill.as_str(), ranked.len());
                ranked.push(SkillCount {
                    skill: skill.clone(),
                    count: 1,
                });
            }
        }
    }

    ranked.sort_by(|left, right| right.count.cmp(&left.count));
    ranked
}

/// Normalizes a caller-supplied limit: absent or zero means the default.
pub fn normalize_top_skills_limit(limit: Option<usize>) -> usize {
    match limit {
        Some(0) | None => TOP_SKILLS_DEFAULT_LIMIT,
        Some(value) => value.min(TOP_SKILLS_LIMIT_MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_top_skills_limit, rank_skills, SkillCount};
    use crate::model::profile::{Profile, ProfileDraft};
    use uuid::Uuid;

    fn with_skills(skills: &[&str]) -> Profile {
        let mut draft = ProfileDraft::new("n", format!("{}@x.com", Uuid::new_v4()));
        draft.skills = skills.iter().map(|skill| skill.to_string()).collect();
        Profile::from_draft(Uuid::new_v4(), draft, 0, 0)
    }

    #[test]
    fn ranks_by_count_then_first_seen() {
        let profiles = vec![
            with_skills(&["sql", "go"]),
            with_skills(&["rust", "go"]),
            with_skills(&["rust"]),
        ];
        let ranked = rank_skills(&profiles);
        let names: Vec<&str> = ranked.iter().map(|entry| entry.skill.as_str()).collect();
        assert_eq!(names, vec!["go", "rust", "sql"]);
        assert_eq!(
            ranked[0],
            SkillCount {
                skill: "go".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn counts_duplicates_within_one_profile_and_keeps_case() {
        let ranked = rank_skills(&[with_skills(&["React", "react", "react"])]);
        assert_eq!(ranked[0].skill, "react");
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[1].skill, "React");
    }

    #[test]
    fn limit_normalization() {
        assert_eq!(normalize_top_skills_limit(None), 5);
        assert_eq!(normalize_top_skills_limit(Some(0)), 5);
        assert_eq!(normalize_top_skills_limit(Some(3)), 3);
        assert_eq!(normalize_top_skills_limit(Some(500)), 50);
    }
}
