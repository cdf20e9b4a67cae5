//! Profile create/update/list use-cases.
//!
//! # Invariants
//! - Requests without a non-blank `name` or `email` never reach the store.
//! - Update is a full replace keyed by exact email; an unmatched email is a
//!   successful no-op reported as [`UpdateOutcome::Unmatched`].
//! - List is always newest first.

use crate::model::profile::{Profile, ProfileDraft, ProfileValidationError};
use crate::repo::profile_repo::{
    ProfileOrder, ProfileRepository, RepoError, RepoResult, UniqueField,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for profile use-cases.
#[derive(Debug)]
pub enum ProfileServiceError {
    /// Required field missing or blank.
    Validation(ProfileValidationError),
    /// A uniqueness constraint rejected the write.
    Conflict(UniqueField),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back did not find the row.
    InconsistentState(&'static str),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict(field) => write!(f, "profile {} already exists", field.as_str()),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent profile state: {details}"),
        }
    }
}

impl Error for ProfileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProfileValidationError> for ProfileServiceError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProfileServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Conflict(field) => Self::Conflict(field),
            other => Self::Repo(other),
        }
    }
}

/// Result of a full-replace update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The matching profile after replacement.
    Replaced(Profile),
    /// No profile had the target email; nothing was written.
    Unmatched,
}

impl UpdateOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced(_))
    }
}

/// Profile service facade over repository implementations.
pub struct ProfileService<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Read access for the scan engines sharing this repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates a profile and returns the stored document.
    pub fn create(&mut self, draft: &ProfileDraft) -> Result<Profile, ProfileServiceError> {
        let started_at = Instant::now();
        let draft = draft.normalized();
        draft.validate_identity()?;

        let id = self.repo.create_profile(&draft).map_err(|err| {
            warn!(
                "event=profile_create module=service status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            err
        })?;
        let profile = self
            .repo
            .get_profile(id)?
            .ok_or(ProfileServiceError::InconsistentState(
                "created profile not found in read-back",
            ))?;

        info!(
            "event=profile_create module=service status=ok profile_id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(profile)
    }

    /// Replaces the whole document of the profile identified by `email`.
    ///
    /// `email` is trimmed and then matched exactly; the replacement may carry a
    /// different email. Identity fields are stored trimmed.
    pub fn update(
        &mut self,
        email: &str,
        draft: &ProfileDraft,
    ) -> Result<UpdateOutcome, ProfileServiceError> {
        let started_at = Instant::now();
        let draft = draft.normalized();
        draft.validate_identity()?;

        let id = match self.repo.replace_profile(email.trim(), &draft) {
            Ok(id) => id,
            Err(RepoError::NotFound(_)) => {
                info!(
                    "event=profile_update module=service status=ok matched=false duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(UpdateOutcome::Unmatched);
            }
            Err(err) => {
                warn!(
                    "event=profile_update module=service status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(err.into());
            }
        };

        let profile = self
            .repo
            .get_profile(id)?
            .ok_or(ProfileServiceError::InconsistentState(
                "updated profile not found in read-back",
            ))?;

        info!(
            "event=profile_update module=service status=ok matched=true profile_id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(UpdateOutcome::Replaced(profile))
    }

    /// Lists every profile, most recently created first.
    pub fn list(&self) -> RepoResult<Vec<Profile>> {
        self.repo.list_profiles(ProfileOrder::NewestFirst)
    }
}
