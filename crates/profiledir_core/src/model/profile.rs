//! Profile document model and schema validation.
//!
//! # Invariants
//! - `name` and `email` are non-blank.
//! - Every project has a non-blank `title`; every work entry a non-blank
//!   `role` and `company`.
//! - Skill strings are stored exactly as entered (no trimming or case folding).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned profile identifier.
pub type ProfileId = Uuid;

/// External links shown on a profile card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

/// Portfolio project owned by one profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique across all profiles.
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Exact, case-sensitive membership test used by the project index.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|candidate| candidate == skill)
    }
}

/// Work history entry owned by one profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    #[serde(default)]
    pub role: String,
    /// Unique across all profiles.
    #[serde(default)]
    pub company: String,
}

impl Work {
    pub fn new(role: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            company: company.into(),
        }
    }
}

/// Client-submitted profile content for create and full-replace update.
///
/// Missing `name`/`email` deserialize as empty strings so they are reported as
/// validation failures instead of malformed input. Unknown keys (a client-sent
/// `id`, timestamps) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub work: Vec<Work>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl ProfileDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with surrounding whitespace removed from `name` and `email`.
    ///
    /// The stored email is the update lookup key, so both sides use this form.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self.clone()
        }
    }

    /// Checks only the identity fields callers must always supply.
    pub fn validate_identity(&self) -> Result<(), ProfileValidationError> {
        if is_blank(&self.name) {
            return Err(ProfileValidationError::MissingName);
        }
        if is_blank(&self.email) {
            return Err(ProfileValidationError::MissingEmail);
        }
        Ok(())
    }

    /// Checks every schema-required field, including nested records.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        self.validate_identity()?;

        for (index, project) in self.projects.iter().enumerate() {
            if is_blank(&project.title) {
                return Err(ProfileValidationError::MissingProjectTitle { index });
            }
        }

        for (index, work) in self.work.iter().enumerate() {
            if is_blank(&work.role) {
                return Err(ProfileValidationError::MissingWorkRole { index });
            }
            if is_blank(&work.company) {
                return Err(ProfileValidationError::MissingWorkCompany { index });
            }
        }

        Ok(())
    }
}

/// Stored profile document.
///
/// Serializes with `id`, `createdAt` and `updatedAt` alongside the content
/// fields. See [`ProfileSummary`] for the identifier-free listing shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub work: Vec<Work>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Unix epoch milliseconds, set once on create.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every update.
    pub updated_at: i64,
}

impl Profile {
    /// Builds a stored document from draft content and store metadata.
    pub fn from_draft(
        id: ProfileId,
        draft: ProfileDraft,
        created_at: i64,
        updated_at: i64,
    ) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            education: draft.education,
            skills: draft.skills,
            projects: draft.projects,
            work: draft.work,
            links: draft.links,
            created_at,
            updated_at,
        }
    }
}

/// Listing projection of a profile without identifier or timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub work: Vec<Work>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl From<Profile> for ProfileSummary {
    fn from(profile: Profile) -> Self {
        Self {
            name: profile.name,
            email: profile.email,
            education: profile.education,
            skills: profile.skills,
            projects: profile.projects,
            work: profile.work,
            links: profile.links,
        }
    }
}

/// Schema violation detected before a profile reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileValidationError {
    MissingName,
    MissingEmail,
    MissingProjectTitle { index: usize },
    MissingWorkRole { index: usize },
    MissingWorkCompany { index: usize },
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "name is required"),
            Self::MissingEmail => write!(f, "email is required"),
            Self::MissingProjectTitle { index } => {
                write!(f, "projects[{index}].title is required")
            }
            Self::MissingWorkRole { index } => write!(f, "work[{index}].role is required"),
            Self::MissingWorkCompany { index } => write!(f, "work[{index}].company is required"),
        }
    }
}

impl Error for ProfileValidationError {}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
