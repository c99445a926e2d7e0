//! Content-addressed sharing of community values.
//!
//! # Responsibility
//! - Return one shared allocation per distinct community value, so the
//!   registry and every identity's community set reference the same data.
//!
//! # Invariants
//! - The cache lives and dies with its owning aggregator; there is no
//!   process-wide state.
//! - Interning is an optimization only; equality semantics are unchanged.

use crate::model::contact::Community;
use std::collections::HashMap;
use std::rc::Rc;

/// Aggregator-owned cache of shared community values.
///
/// Community values repeat heavily across records (every member of a group
/// carries that group), so equal values are collapsed to one `Rc`
/// allocation. `Rc` is sufficient: the core is single-threaded and the
/// cache never outlives its aggregator.
#[derive(Debug, Default)]
pub(crate) struct CommunityInterner {
    cache: HashMap<Community, Rc<Community>>,
}

impl CommunityInterner {
    /// Returns the shared value for `community`, allocating on first sight.
    pub(crate) fn intern(&mut self, community: &Community) -> Rc<Community> {
        if let Some(shared) = self.cache.get(community) {
            return Rc::clone(shared);
        }
        let shared = Rc::new(community.clone());
        self.cache.insert(community.clone(), Rc::clone(&shared));
        shared
    }
}

#[cfg(test)]
mod tests {
    use super::CommunityInterner;
    use crate::model::contact::Platform;
    use std::rc::Rc;

    #[test]
    fn equal_values_share_one_allocation() {
        let telegram = Platform::new("telegram");
        let mut interner = CommunityInterner::default();

        let first = interner.intern(&telegram.community("g1", "Group One", false));
        let second = interner.intern(&telegram.community("g1", "Group One", false));
        assert!(Rc::ptr_eq(&first, &second));

        let renamed = interner.intern(&telegram.community("g1", "Group 1", false));
        assert!(!Rc::ptr_eq(&first, &renamed));
    }
}
