//! Profile use-case services.
//!
//! # Responsibility
//! - Validate requests before they reach the profile store.
//! - Keep API/CLI layers decoupled from storage details.

pub mod profile_service;
