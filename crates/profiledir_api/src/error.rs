//! Operation-boundary error taxonomy and its status mapping.

use crate::request::ApiResponse;
use profiledir_core::db::DbError;
use profiledir_core::{ProfileServiceError, ProfileValidationError, RepoError, UniqueField};
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Failure of one API operation.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed body or query string.
    BadRequest(String),
    Validation(ProfileValidationError),
    Conflict(UniqueField),
    NotFound,
    MethodNotAllowed,
    /// Storage or consistency failure; the detail is logged, never returned.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(message) => message.clone(),
            Self::Validation(err) => err.to_string(),
            Self::Conflict(UniqueField::Email) => "Profile already exist".to_string(),
            Self::Conflict(field) => format!("Profile {} already exists", field.as_str()),
            Self::NotFound => "Not Found".to_string(),
            Self::MethodNotAllowed => "Method Not Allowed".to_string(),
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn into_response(self) -> ApiResponse {
        ApiResponse::new(self.status(), json!({ "message": self.public_message() }))
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal(detail) => write!(f, "internal error: {detail}"),
            other => f.write_str(&other.public_message()),
        }
    }
}

impl Error for ApiError {}

impl From<ProfileServiceError> for ApiError {
    fn from(value: ProfileServiceError) -> Self {
        match value {
            ProfileServiceError::Validation(err) => Self::Validation(err),
            ProfileServiceError::Conflict(field) => Self::Conflict(field),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        ProfileServiceError::from(value).into()
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Internal(format!("response serialization failed: {value}"))
    }
}
