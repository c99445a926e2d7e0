//! Record snapshot use-cases and ingestion-side normalization.
//!
//! # Responsibility
//! - Provide save/load/aggregate entry points over a record repository.
//! - Normalize phone numbers before records reach the store, so phone
//!   matching is not defeated by formatting differences between platforms.
//!
//! # Invariants
//! - Normalization never drops a phone number; numbers that cannot be
//!   normalized are kept verbatim (trimmed).
//! - Aggregation consumes records in stored snapshot order.

use crate::model::contact::ContactRecord;
use crate::repo::record_repo::{RecordRepository, RepoResult};
use crate::resolve::Aggregator;
use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_NOISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^+0-9]").expect("valid phone noise regex"));

/// Minimum digits for a string to count as a phone number.
const MIN_PHONE_DIGITS: usize = 5;

/// Normalizes a phone number to digits with an optional leading `+`.
///
/// Returns `None` when fewer than [`MIN_PHONE_DIGITS`] digits remain after
/// stripping formatting noise.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let stripped = PHONE_NOISE_RE.replace_all(raw.trim(), "");
    let mut normalized = String::with_capacity(stripped.len());
    for (position, ch) in stripped.chars().enumerate() {
        if ch == '+' && position > 0 {
            continue;
        }
        normalized.push(ch);
    }
    let digits = normalized.chars().filter(|ch| ch.is_ascii_digit()).count();
    if digits < MIN_PHONE_DIGITS {
        return None;
    }
    Some(normalized)
}

/// Returns a copy of `record` with normalized phone numbers.
///
/// Aliases, communities and the personal flag pass through unchanged.
pub fn normalize_record(record: &ContactRecord) -> ContactRecord {
    let mut normalized = ContactRecord::new(record.platform().clone());
    for name in record.names() {
        normalized.add_name(name.clone());
    }
    for phone in record.phones() {
        match normalize_phone(phone) {
            Some(clean) => normalized.add_phone(clean),
            None => normalized.add_phone(phone.trim()),
        }
    }
    for community in record.communities() {
        normalized.add_community(community.clone());
    }
    normalized.set_personal(record.personal());
    normalized
}

/// Use-case service wrapper for snapshot persistence and aggregation.
pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a snapshot, preserving record order.
    pub fn save_records(&self, records: &[ContactRecord]) -> RepoResult<()> {
        self.repo.save_records(records)
    }

    /// Loads the stored snapshot in saved order.
    pub fn load_records(&self) -> RepoResult<Vec<ContactRecord>> {
        self.repo.load_records()
    }

    /// Loads the stored snapshot and aggregates it into identities.
    pub fn aggregate(&self) -> RepoResult<Aggregator> {
        let records = self.repo.load_records()?;
        let mut aggregator = Aggregator::new();
        aggregator.ingest(records)?;
        Ok(aggregator)
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_phone, normalize_record};
    use crate::model::contact::Platform;

    #[test]
    fn normalize_phone_strips_formatting_noise() {
        assert_eq!(
            normalize_phone(" +1 (555) 010-0199 ").as_deref(),
            Some("+15550100199")
        );
        assert_eq!(normalize_phone("555.0100").as_deref(), Some("5550100"));
    }

    #[test]
    fn normalize_phone_rejects_short_inputs() {
        assert_eq!(normalize_phone("911"), None);
        assert_eq!(normalize_phone("not a number"), None);
    }

    #[test]
    fn normalize_record_keeps_unparseable_phones_verbatim() {
        let mut record = Platform::new("telegram").record();
        record.add_name("ada");
        record.add_phone("+1 (555) 010-0199");
        record.add_phone(" ext-12 ");
        let normalized = normalize_record(&record);

        assert!(normalized.phones().contains("+15550100199"));
        assert!(normalized.phones().contains("ext-12"));
        assert_eq!(normalized.names(), record.names());
    }
}
