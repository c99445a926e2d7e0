//! Domain model for platform contacts and merged identities.
//!
//! # Responsibility
//! - Define the value types exchanged with ingestion and persistence
//!   collaborators (`Platform`, `Community`, `ContactRecord`).
//! - Define the canonical merged entity (`Identity`) owned by the resolver.
//!
//! # Invariants
//! - `Community` equality covers every field; a renamed community is a
//!   distinct entity.
//! - A `ContactRecord` is mutable while being assembled and read-only once
//!   handed to the aggregator.
//! - Alias, phone and community sets are ordered so downstream iteration is
//!   deterministic.

pub mod contact;
pub mod identity;
