//! Request/response surface over the profile directory core.
//!
//! # Responsibility
//! - Map `METHOD path?query` plus an optional JSON body onto one core
//!   operation and render the result as a status code and JSON body.
//! - Translate every failure into a coarse status; details are only logged.
//!
//! # Invariants
//! - `handle` never panics and never returns internal error details.
//! - Every route except `/health` is also served under the `/api` prefix.

pub mod config;
pub mod error;
pub mod request;
pub mod router;

pub use config::ApiConfig;
pub use error::ApiError;
pub use request::{ApiRequest, ApiResponse, Method, QueryParams};
pub use router::{ProfileApi, Route};
