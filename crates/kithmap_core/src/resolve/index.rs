//! Reverse lookup from aliases and phone numbers to identities.
//!
//! # Responsibility
//! - Answer the relatedness query for each incoming record.
//! - Detect intra-platform alias collisions and evict the colliding alias.
//!
//! # Invariants
//! - Every indexed key points at an identity that currently contains it;
//!   the only removals are explicit ambiguity evictions.
//! - Entries are added at identity creation only. Aliases unioned into an
//!   identity during lookup are deliberately NOT indexed.

use crate::model::contact::ContactRecord;
use crate::model::identity::Identity;
use log::debug;
use std::collections::{BTreeSet, HashMap};

/// Arena slot of an identity inside the aggregator.
pub(crate) type Slot = usize;

/// Outcome of one relatedness query.
pub(crate) struct Relatedness {
    /// Identities the record relates to, in deterministic slot order.
    pub(crate) related: BTreeSet<Slot>,
    /// Aliases evicted from the index by this query.
    pub(crate) ambiguous: BTreeSet<String>,
}

/// Name and phone lookup tables over the identity arena.
#[derive(Debug, Default)]
pub(crate) struct IdentityIndex {
    by_name: HashMap<String, Slot>,
    by_phone: HashMap<String, Slot>,
}

impl IdentityIndex {
    /// Finds every identity the record relates to, updating the index and
    /// the related identities' alias sets along the way.
    ///
    /// Names are weak, platform-overloaded evidence: an indexed alias whose
    /// identity already holds a record for the record's own platform is an
    /// intra-platform collision, so the alias is evicted instead of
    /// matched. Phone numbers are strong, platform-independent evidence and
    /// always match. Clean (non-ambiguous) aliases are unioned into every
    /// related identity immediately so later records in the same batch
    /// observe the enlarged alias sets.
    pub(crate) fn find_related(
        &mut self,
        record: &ContactRecord,
        identities: &mut [Identity],
    ) -> Relatedness {
        let mut related = BTreeSet::new();
        let mut ambiguous = BTreeSet::new();

        for name in record.names() {
            if let Some(&slot) = self.by_name.get(name) {
                if identities[slot].has_platform(record.platform()) {
                    self.by_name.remove(name);
                    ambiguous.insert(name.clone());
                } else {
                    related.insert(slot);
                }
            }
        }

        for phone in record.phones() {
            if let Some(&slot) = self.by_phone.get(phone) {
                related.insert(slot);
            }
        }

        if !ambiguous.is_empty() {
            debug!(
                "event=alias_evicted module=resolve status=ok count={}",
                ambiguous.len()
            );
        }

        for &slot in &related {
            identities[slot].adopt_names(
                record
                    .names()
                    .iter()
                    .filter(|name| !ambiguous.contains(*name))
                    .cloned(),
            );
        }

        Relatedness { related, ambiguous }
    }

    /// Indexes every alias and phone number of a freshly created identity.
    ///
    /// Aliases previously evicted as ambiguous are re-registered here,
    /// pointing at the new identity.
    pub(crate) fn register(&mut self, slot: Slot, record: &ContactRecord) {
        for name in record.names() {
            self.by_name.insert(name.clone(), slot);
        }
        for phone in record.phones() {
            self.by_phone.insert(phone.clone(), slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IdentityIndex;
    use crate::model::contact::Platform;
    use crate::model::identity::Identity;
    use std::collections::BTreeSet;

    #[test]
    fn same_platform_alias_collision_evicts_instead_of_matching() {
        let telegram = Platform::new("telegram");
        let mut seed = telegram.record();
        seed.add_name("kim");

        let mut index = IdentityIndex::default();
        let mut identities = vec![Identity::from_record(seed.clone(), BTreeSet::new())];
        index.register(0, &seed);

        let mut incoming = telegram.record();
        incoming.add_name("kim");
        let outcome = index.find_related(&incoming, &mut identities);

        assert!(outcome.related.is_empty());
        assert!(outcome.ambiguous.contains("kim"));
        // The evicted alias no longer matches anything, even cross-platform.
        let mut signal_record = Platform::new("signal").record();
        signal_record.add_name("kim");
        let retry = index.find_related(&signal_record, &mut identities);
        assert!(retry.related.is_empty());
        assert!(retry.ambiguous.is_empty());
    }

    #[test]
    fn cross_platform_alias_matches_and_adopts_clean_names() {
        let telegram = Platform::new("telegram");
        let mut seed = telegram.record();
        seed.add_name("kim");

        let mut index = IdentityIndex::default();
        let mut identities = vec![Identity::from_record(seed.clone(), BTreeSet::new())];
        index.register(0, &seed);

        let mut incoming = Platform::new("signal").record();
        incoming.add_name("kim");
        incoming.add_name("kim-signal");
        let outcome = index.find_related(&incoming, &mut identities);

        assert_eq!(outcome.related.len(), 1);
        assert!(identities[0].names().contains("kim-signal"));
        // Lookup-time alias adoption must not index the adopted alias.
        let mut probe = Platform::new("matrix").record();
        probe.add_name("kim-signal");
        let probe_outcome = index.find_related(&probe, &mut identities);
        assert!(probe_outcome.related.is_empty());
    }

    #[test]
    fn phone_matches_regardless_of_platform_overlap() {
        let telegram = Platform::new("telegram");
        let mut seed = telegram.record();
        seed.add_name("kim");
        seed.add_phone("+15550100");

        let mut index = IdentityIndex::default();
        let mut identities = vec![Identity::from_record(seed.clone(), BTreeSet::new())];
        index.register(0, &seed);

        // Same platform: the alias collides but the phone still matches.
        let mut incoming = telegram.record();
        incoming.add_name("kim");
        incoming.add_phone("+15550100");
        let outcome = index.find_related(&incoming, &mut identities);

        assert_eq!(outcome.related.len(), 1);
        assert!(outcome.ambiguous.contains("kim"));
    }
}
