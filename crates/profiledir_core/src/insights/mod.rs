//! Aggregate read views computed by scanning every profile.
//!
//! # Responsibility
//! - Rank skills by frequency across profiles.
//! - Flatten projects into one cross-profile index.
//!
//! # Invariants
//! - Both views scan the store in insertion order and are case-sensitive.
//! - Neither view keeps state between calls.

pub mod project_index;
pub mod top_skills;
