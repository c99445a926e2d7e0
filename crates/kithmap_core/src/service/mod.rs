//! Use-case services over the core engine and its collaborators.
//!
//! # Responsibility
//! - Provide stable entry points tying the snapshot store to aggregation.
//! - Own input normalization helpers for ingestion collaborators.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - The service layer remains storage-agnostic.

pub mod record_service;
