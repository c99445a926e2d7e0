//! Persistence collaborators for aggregated input data.
//!
//! # Responsibility
//! - Provide the record snapshot contract and its SQLite implementation.
//! - Keep SQL and encoding details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod record_repo;
