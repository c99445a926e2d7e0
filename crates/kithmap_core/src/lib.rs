//! Core identity resolution and social graph construction for kithmap.
//! This crate is the single source of truth for the merge policy and its
//! invariants.

pub mod db;
pub mod graph;
pub mod logging;
pub mod model;
pub mod repo;
pub mod resolve;
pub mod service;

pub use graph::builder::{GraphOptions, SocialEdge, SocialGraph, SocialNode};
pub use graph::dot::to_dot;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Community, ContactRecord, Platform, RecordValidationError};
pub use model::identity::{Identity, IdentityId};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordStore};
pub use resolve::Aggregator;
pub use service::record_service::{normalize_phone, normalize_record, RecordService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
