//! DOT serialization for exported graphs.
//!
//! # Responsibility
//! - Serialize a [`SocialGraph`] into Graphviz DOT text for external
//!   analysis and layout tools.

use crate::graph::builder::SocialGraph;
use petgraph::dot::{Config, Dot};

/// Renders the graph as DOT text with node weights as labels.
pub fn to_dot(graph: &SocialGraph) -> String {
    format!("{:?}", Dot::with_config(graph, &[Config::EdgeNoLabel]))
}
