//! Canonical merged person entity.
//!
//! # Responsibility
//! - Aggregate evidence from one or more platform records under one stable
//!   identity.
//! - Expose read accessors for graph construction and re-display.
//!
//! # Invariants
//! - The platform map holds at most one record per platform; a newer record
//!   for the same platform replaces the older one.
//! - Alias and community sets only grow.
//! - Mutation is restricted to the resolver (`pub(crate)`); collaborators
//!   observe identities read-only.

use crate::model::contact::{Community, ContactRecord, Platform};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use uuid::Uuid;

/// Stable identifier assigned to an identity at creation.
pub type IdentityId = Uuid;

/// A merged person: the union of every platform record resolved to the same
/// real-world contact.
///
/// Identities are created by the aggregator when a record matches nothing in
/// the identity index, mutated in place when later records relate to them,
/// and never deleted. Two identities that both exist are never merged into
/// one, even when later evidence links them (documented resolver
/// limitation).
#[derive(Debug)]
pub struct Identity {
    uuid: IdentityId,
    platforms: HashMap<Platform, ContactRecord>,
    names: BTreeSet<String>,
    communities: BTreeSet<Rc<Community>>,
    personal: bool,
}

impl Identity {
    /// Creates an identity seeded from a record that matched no existing
    /// identity.
    ///
    /// Takes the record's full alias set (including aliases the index just
    /// evicted as ambiguous) together with its pre-interned communities.
    pub(crate) fn from_record(
        record: ContactRecord,
        communities: BTreeSet<Rc<Community>>,
    ) -> Self {
        let names = record.names().clone();
        let personal = record.personal();
        let platform = record.platform().clone();
        let mut platforms = HashMap::new();
        platforms.insert(platform, record);
        Self {
            uuid: Uuid::new_v4(),
            platforms,
            names,
            communities,
            personal,
        }
    }

    /// Merges a related record into this identity.
    ///
    /// Replaces the platform slot for the record's platform, unions the
    /// record's (pre-interned) communities and ORs the personal flag. Alias
    /// adoption is not done here: the index unions clean names at lookup
    /// time, before ambiguous aliases are known to the caller.
    pub(crate) fn absorb(&mut self, record: &ContactRecord, communities: &BTreeSet<Rc<Community>>) {
        self.platforms
            .insert(record.platform().clone(), record.clone());
        self.communities.extend(communities.iter().cloned());
        self.personal |= record.personal();
    }

    /// Unions additional aliases into this identity.
    pub(crate) fn adopt_names<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.names.extend(names);
    }

    /// Whether this identity already holds a record for `platform`.
    pub fn has_platform(&self, platform: &Platform) -> bool {
        self.platforms.contains_key(platform)
    }

    /// Stable identifier assigned at creation.
    pub fn uuid(&self) -> IdentityId {
        self.uuid
    }

    /// Most-recently-seen record per platform.
    pub fn platforms(&self) -> &HashMap<Platform, ContactRecord> {
        &self.platforms
    }

    /// Unioned alias set across all contributing records.
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    /// Unioned communities across all platforms, in deterministic order.
    pub fn communities(&self) -> impl Iterator<Item = &Community> {
        self.communities.iter().map(|community| community.as_ref())
    }

    /// Number of distinct communities this identity belongs to.
    pub fn community_count(&self) -> usize {
        self.communities.len()
    }

    /// Whether any contributing record was flagged personal.
    pub fn personal(&self) -> bool {
        self.personal
    }
}

#[cfg(test)]
mod tests {
    use super::Identity;
    use crate::model::contact::Platform;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    #[test]
    fn absorb_replaces_platform_slot_and_ors_personal() {
        let telegram = Platform::new("telegram");
        let mut first = telegram.record();
        first.add_name("ada");
        let mut identity = Identity::from_record(first, BTreeSet::new());
        assert!(!identity.personal());

        let mut second = telegram.record();
        second.add_name("ada l.");
        second.set_personal(true);
        identity.absorb(&second, &BTreeSet::new());

        assert_eq!(identity.platforms().len(), 1);
        let stored = &identity.platforms()[&telegram];
        assert!(stored.names().contains("ada l."));
        assert!(identity.personal());
    }

    #[test]
    fn community_union_only_grows() {
        let telegram = Platform::new("telegram");
        let mut record = telegram.record();
        record.add_name("ada");

        let g1 = Rc::new(telegram.community("g1", "Group One", false));
        let mut seed = BTreeSet::new();
        seed.insert(Rc::clone(&g1));
        let mut identity = Identity::from_record(record.clone(), seed);

        let mut more = BTreeSet::new();
        more.insert(g1);
        more.insert(Rc::new(telegram.community("g2", "Group Two", false)));
        identity.absorb(&record, &more);

        assert_eq!(identity.community_count(), 2);
    }
}
