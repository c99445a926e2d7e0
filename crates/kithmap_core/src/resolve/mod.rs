//! Identity resolution engine.
//!
//! # Responsibility
//! - Decide, per incoming record, which existing identities it relates to
//!   (`index`).
//! - Merge records into identities or create new ones (`aggregator`).
//! - Share equal community values across the aggregated state (`interner`).
//!
//! # Invariants
//! - Ingestion order is significant: the index is updated incrementally, so
//!   re-ordering a batch can change the final grouping. This is part of the
//!   contract, not an accident.
//! - The index, identity arena and interner are exclusively owned by one
//!   `Aggregator` value; nothing mutates them concurrently.

mod aggregator;
mod index;
mod interner;

pub use aggregator::Aggregator;
