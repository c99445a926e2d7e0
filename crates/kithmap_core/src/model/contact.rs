//! Platform-scoped contact values produced by ingestion collaborators.
//!
//! # Responsibility
//! - Identify source systems (`Platform`) and their groups (`Community`).
//! - Carry one platform's raw view of a person (`ContactRecord`) into the
//!   aggregator.
//!
//! # Invariants
//! - `Platform` equality is decided by its name alone.
//! - `Community` equality covers platform, id, display name and the
//!   personal flag; renaming a group therefore yields a distinct community.
//! - A record handed to the aggregator must pass `validate()`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Immutable identifier for a source messaging system.
///
/// Two platforms are the same source iff their names match; the name is the
/// only equality/hash key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Platform {
    name: String,
}

impl Platform {
    /// Creates a platform identified by `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Platform name as provided by the ingestion collaborator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a community scoped to this platform.
    pub fn community(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        personal: bool,
    ) -> Community {
        Community {
            platform: self.clone(),
            id: id.into(),
            name: name.into(),
            personal,
        }
    }

    /// Creates an empty contact record scoped to this platform.
    pub fn record(&self) -> ContactRecord {
        ContactRecord::new(self.clone())
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A group/channel on one platform.
///
/// Equality deliberately includes the display name: callers that rename a
/// group produce a second logical community even though the platform-local
/// id is stable. Consumers that want id-keyed identity must dedupe
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Community {
    platform: Platform,
    id: String,
    name: String,
    personal: bool,
}

impl Community {
    /// Creates a community value.
    pub fn new(
        platform: Platform,
        id: impl Into<String>,
        name: impl Into<String>,
        personal: bool,
    ) -> Self {
        Self {
            platform,
            id: id.into(),
            name: name.into(),
            personal,
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Platform-local identifier (stable across renames).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name shown on graph nodes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether membership implies a direct relationship to "me".
    pub fn personal(&self) -> bool {
        self.personal
    }
}

/// Validation error for malformed contact records.
///
/// Raised only on caller contract violations; well-formed records never
/// fail aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// The record's platform has an empty name and cannot be keyed.
    MissingPlatform,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPlatform => write!(f, "contact record has no platform name"),
        }
    }
}

impl Error for RecordValidationError {}

/// One platform's raw view of a person before merging.
///
/// Built incrementally by an ingestion collaborator via the `add_*`
/// mutators, then treated as read-only once passed to
/// [`Aggregator::ingest`](crate::resolve::Aggregator::ingest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    platform: Platform,
    names: BTreeSet<String>,
    phones: BTreeSet<String>,
    communities: BTreeSet<Community>,
    personal: bool,
}

impl ContactRecord {
    /// Creates an empty record for `platform`.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            names: BTreeSet::new(),
            phones: BTreeSet::new(),
            communities: BTreeSet::new(),
            personal: false,
        }
    }

    /// Adds a name alias observed on this platform.
    pub fn add_name(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Adds a phone number observed on this platform.
    pub fn add_phone(&mut self, phone: impl Into<String>) {
        self.phones.insert(phone.into());
    }

    /// Adds a community this person belongs to on this platform.
    pub fn add_community(&mut self, community: Community) {
        self.communities.insert(community);
    }

    /// Marks this record as a direct/personal contact of "me".
    pub fn set_personal(&mut self, personal: bool) {
        self.personal = personal;
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn phones(&self) -> &BTreeSet<String> {
        &self.phones
    }

    pub fn communities(&self) -> &BTreeSet<Community> {
        &self.communities
    }

    pub fn personal(&self) -> bool {
        self.personal
    }

    /// Checks the caller contract for records entering the aggregator.
    ///
    /// # Errors
    /// - [`RecordValidationError::MissingPlatform`] when the platform name
    ///   is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.platform.name().trim().is_empty() {
            return Err(RecordValidationError::MissingPlatform);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactRecord, Platform, RecordValidationError};

    #[test]
    fn platform_equality_is_name_keyed() {
        assert_eq!(Platform::new("telegram"), Platform::new("telegram"));
        assert_ne!(Platform::new("telegram"), Platform::new("signal"));
    }

    #[test]
    fn renamed_community_is_a_distinct_entity() {
        let platform = Platform::new("telegram");
        let before = platform.community("g1", "Climbing Crew", false);
        let after = platform.community("g1", "Climbing Crew 2024", false);
        assert_ne!(before, after);
        assert_eq!(before.id(), after.id());
    }

    #[test]
    fn record_sets_deduplicate() {
        let platform = Platform::new("telegram");
        let mut record = platform.record();
        record.add_name("ada");
        record.add_name("ada");
        record.add_phone("+15550100");
        record.add_phone("+15550100");
        assert_eq!(record.names().len(), 1);
        assert_eq!(record.phones().len(), 1);
    }

    #[test]
    fn validate_rejects_empty_platform_name() {
        let record = ContactRecord::new(Platform::new("  "));
        assert_eq!(
            record.validate(),
            Err(RecordValidationError::MissingPlatform)
        );

        let mut ok = Platform::new("telegram").record();
        ok.add_name("ada");
        assert!(ok.validate().is_ok());
    }
}
