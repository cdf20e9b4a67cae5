//! Profile search entry points.
//!
//! # Responsibility
//! - Case-insensitive substring matching across profile text fields.
//!
//! Matching is presence/absence only; there is no relevance score.

pub mod profile_search;
