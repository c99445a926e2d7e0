//! Graph constructor over aggregated identities and communities.
//!
//! # Responsibility
//! - Emit nodes for communities and qualifying identities plus the
//!   distinguished "me" hub.
//! - Apply the personal-only and single-community noise filters.
//!
//! # Invariants
//! - Identities with fewer than two communities never produce a node.
//! - Under `personal_only`, every emitted node except "me" is personal and
//!   membership edges to skipped communities are dropped with the node.
//! - Labels are at most [`MAX_LABEL_CHARS`] characters.

use crate::model::contact::Community;
use crate::model::identity::{Identity, IdentityId};
use crate::resolve::Aggregator;
use log::info;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// Maximum characters of an identity node label.
pub const MAX_LABEL_CHARS: usize = 20;

/// Label for identities with no alias at all.
const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Flags controlling graph derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Label identity nodes with their longest alias instead of leaving
    /// them blank.
    pub usernames: bool,
    /// Restrict the graph to personal communities and identities.
    pub personal_only: bool,
}

/// Node weight of the exported graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialNode {
    /// The distinguished hub for the graph owner.
    Me,
    /// A community, labeled with its display name.
    Community { name: String, personal: bool },
    /// A merged person identity.
    Person {
        id: IdentityId,
        label: String,
        personal: bool,
    },
}

/// Edge weight of the exported graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialEdge {
    /// Identity–community membership.
    Membership,
    /// Direct relationship to "me".
    Personal,
}

/// Undirected labeled graph exported to analysis consumers.
pub type SocialGraph = UnGraph<SocialNode, SocialEdge>;

/// Derives the exported graph from aggregated state.
///
/// "me" is always present and is connected only to personal communities
/// and personal identities. Single-community identities carry no
/// cross-community structural signal and are filtered out regardless of
/// options.
pub fn build(aggregator: &Aggregator, options: &GraphOptions) -> SocialGraph {
    let mut graph = SocialGraph::new_undirected();
    let me = graph.add_node(SocialNode::Me);

    let mut community_nodes: HashMap<&Community, NodeIndex> = HashMap::new();
    for community in aggregator.communities() {
        if options.personal_only && !community.personal() {
            continue;
        }
        let node = graph.add_node(SocialNode::Community {
            name: community.name().to_string(),
            personal: community.personal(),
        });
        community_nodes.insert(community, node);
        if community.personal() {
            graph.add_edge(me, node, SocialEdge::Personal);
        }
    }

    for identity in aggregator.identities() {
        if options.personal_only && !identity.personal() {
            continue;
        }
        if identity.community_count() < 2 {
            continue;
        }
        let label = if options.usernames {
            display_label(identity)
        } else {
            String::new()
        };
        let node = graph.add_node(SocialNode::Person {
            id: identity.uuid(),
            label,
            personal: identity.personal(),
        });
        if identity.personal() {
            graph.add_edge(me, node, SocialEdge::Personal);
        }
        for community in identity.communities() {
            if let Some(&community_node) = community_nodes.get(community) {
                graph.add_edge(node, community_node, SocialEdge::Membership);
            }
        }
    }

    info!(
        "event=graph_built module=graph status=ok nodes={} edges={} usernames={} personal_only={}",
        graph.node_count(),
        graph.edge_count(),
        options.usernames,
        options.personal_only
    );
    graph
}

/// Picks the longest alias, truncated to [`MAX_LABEL_CHARS`] characters.
///
/// Ties break to the lexicographically smallest maximum-length alias: the
/// alias set iterates in ascending order and only strictly longer aliases
/// displace the current pick.
fn display_label(identity: &Identity) -> String {
    let mut best: Option<&str> = None;
    for name in identity.names() {
        let longer = match best {
            Some(current) => name.chars().count() > current.chars().count(),
            None => true,
        };
        if longer {
            best = Some(name);
        }
    }
    match best {
        Some(name) => name.chars().take(MAX_LABEL_CHARS).collect(),
        None => UNKNOWN_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{display_label, MAX_LABEL_CHARS};
    use crate::model::contact::Platform;
    use crate::model::identity::Identity;
    use std::collections::BTreeSet;

    fn identity_with_names(names: &[&str]) -> Identity {
        let mut record = Platform::new("telegram").record();
        for name in names {
            record.add_name(*name);
        }
        Identity::from_record(record, BTreeSet::new())
    }

    #[test]
    fn longest_alias_wins() {
        let identity = identity_with_names(&["ada", "ada lovelace"]);
        assert_eq!(display_label(&identity), "ada lovelace");
    }

    #[test]
    fn length_ties_break_to_lexicographically_smallest() {
        let identity = identity_with_names(&["bb", "aa", "zz"]);
        assert_eq!(display_label(&identity), "aa");
    }

    #[test]
    fn label_truncates_by_characters_not_bytes() {
        let long = "ää".repeat(30);
        let identity = identity_with_names(&[long.as_str()]);
        let label = display_label(&identity);
        assert_eq!(label.chars().count(), MAX_LABEL_CHARS);
    }

    #[test]
    fn aliasless_identity_gets_the_fallback_label() {
        let identity = identity_with_names(&[]);
        assert_eq!(display_label(&identity), "UNKNOWN");
    }
}
