//! Sequential merge-or-create aggregation over contact records.
//!
//! # Responsibility
//! - Own the identity arena, the community registry, the identity index and
//!   the community interner.
//! - Apply the documented merge policy record by record.
//!
//! # Invariants
//! - A record is either merged into every related identity or becomes
//!   exactly one new identity.
//! - The community registry only grows.
//! - Identities are never deleted and never merged with each other.

use crate::graph::builder::{build, GraphOptions, SocialGraph};
use crate::model::contact::{Community, ContactRecord, RecordValidationError};
use crate::model::identity::Identity;
use crate::resolve::index::IdentityIndex;
use crate::resolve::interner::CommunityInterner;
use log::{debug, info};
use std::collections::BTreeSet;
use std::rc::Rc;

/// The identity-resolution engine.
///
/// Consumes ordered batches of platform contact records and maintains the
/// merged identity set plus the registry of every community ever seen.
/// Ingestion order matters: a later record can only match identities that
/// earlier records already registered, so re-ordering a batch may change
/// the final grouping. Callers must preserve their source order.
#[derive(Debug, Default)]
pub struct Aggregator {
    identities: Vec<Identity>,
    communities: BTreeSet<Rc<Community>>,
    index: IdentityIndex,
    interner: CommunityInterner,
}

impl Aggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests an ordered sequence of records.
    ///
    /// Per record: its communities join the registry; every related
    /// identity (per the index) absorbs it independently; with no related
    /// identity, the record seeds a new identity whose aliases and phones
    /// are indexed. Related identities are updated independently and never
    /// merged into one — mutually linked evidence can therefore leave
    /// multiple distinct identities behind. That stops short of transitive
    /// closure on purpose; consumers relying on it are relying on the
    /// documented policy, not on an accident.
    ///
    /// # Errors
    /// - [`RecordValidationError`] on the first malformed record (caller
    ///   contract violation). The offending record is not merged, not even
    ///   partially; records before it remain ingested.
    pub fn ingest<I>(&mut self, records: I) -> Result<(), RecordValidationError>
    where
        I: IntoIterator<Item = ContactRecord>,
    {
        let mut ingested = 0usize;
        for record in records {
            record.validate()?;
            self.ingest_one(record);
            ingested += 1;
        }
        info!(
            "event=ingest module=resolve status=ok records={} identities={} communities={}",
            ingested,
            self.identities.len(),
            self.communities.len()
        );
        Ok(())
    }

    fn ingest_one(&mut self, record: ContactRecord) {
        let shared: BTreeSet<Rc<Community>> = record
            .communities()
            .iter()
            .map(|community| self.interner.intern(community))
            .collect();
        self.communities.extend(shared.iter().cloned());

        let outcome = self.index.find_related(&record, &mut self.identities);
        if outcome.related.is_empty() {
            let slot = self.identities.len();
            self.index.register(slot, &record);
            self.identities.push(Identity::from_record(record, shared));
            debug!("event=identity_created module=resolve slot={slot}");
        } else {
            for &slot in &outcome.related {
                self.identities[slot].absorb(&record, &shared);
            }
            debug!(
                "event=identity_merged module=resolve related={} ambiguous={}",
                outcome.related.len(),
                outcome.ambiguous.len()
            );
        }
    }

    /// Builds the exported graph from the current aggregated state.
    ///
    /// Read-only; may be called repeatedly with different options.
    pub fn build_graph(&self, options: &GraphOptions) -> SocialGraph {
        build(self, options)
    }

    /// Finalized identities, in creation order.
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// Registry of every community seen so far, in deterministic order.
    pub fn communities(&self) -> impl Iterator<Item = &Community> {
        self.communities.iter().map(|community| community.as_ref())
    }

    /// Number of distinct communities in the registry.
    pub fn community_count(&self) -> usize {
        self.communities.len()
    }
}
