//! Profile directory domain model.
//!
//! # Responsibility
//! - Define the profile document and its owned sub-records.
//! - Separate client-submitted content (`ProfileDraft`) from store-assigned
//!   identity and timestamps (`Profile`).
//!
//! # Invariants
//! - Projects and work entries are owned by exactly one profile.
//! - `id`, `created_at` and `updated_at` are never taken from client input.

pub mod profile;
