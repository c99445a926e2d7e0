//! Exported social graph construction and serialization.
//!
//! # Responsibility
//! - Derive the labeled undirected graph from aggregated state.
//! - Serialize graphs to DOT for downstream analysis tooling.
//!
//! # Invariants
//! - Construction is a pure function of the aggregated state; it never
//!   mutates identities or the registry.
//! - Node and edge order is deterministic for a given aggregator.

pub mod builder;
pub mod dot;
