//! Core data and query layer for the profile directory.
//! This crate owns the profile schema and every invariant over it.

pub mod db;
pub mod insights;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use insights::project_index::{flatten_projects, list_projects};
pub use insights::top_skills::{
    normalize_top_skills_limit, rank_skills, top_skills, SkillCount, TOP_SKILLS_DEFAULT_LIMIT,
    TOP_SKILLS_LIMIT_MAX,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::profile::{
    Links, Profile, ProfileDraft, ProfileId, ProfileSummary, ProfileValidationError, Project,
    Work,
};
pub use repo::profile_repo::{
    ProfileOrder, ProfileRepository, RepoError, RepoResult, SqliteProfileRepository, UniqueField,
};
pub use search::profile_search::{filter_profiles, profile_matches, search_profiles};
pub use service::profile_service::{ProfileService, ProfileServiceError, UpdateOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
