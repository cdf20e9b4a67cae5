//! Profile store: persistence contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define the data access contract used by services and read engines.
//! - Keep SQL, row decoding and constraint classification inside core.
//!
//! # Invariants
//! - Writes call `ProfileDraft::validate()` before any SQL mutation.
//! - Uniqueness failures surface as `RepoError::Conflict`, never as raw
//!   SQLite errors.

pub mod profile_repo;
