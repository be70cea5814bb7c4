//! Orphan detection: nodes no edge touches.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::domain::entities::{Edge, Node};

/// Ids of nodes that are neither source nor target of any edge.
pub fn detect_orphans(nodes: &[Node], edges: &[Edge]) -> BTreeSet<String> {
    let touched = touched_ids(edges);
    nodes
        .iter()
        .filter(|n| !touched.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect()
}

/// `nodes` without orphans, order preserved.
///
/// Run after reduction to drop nodes whose only edges were dropped or rewired
/// away from them.
pub fn strip_orphans(nodes: &[Node], edges: &[Edge]) -> Vec<Node> {
    let touched = touched_ids(edges);
    let kept: Vec<Node> = nodes
        .iter()
        .filter(|n| touched.contains(n.id.as_str()))
        .cloned()
        .collect();
    debug!("strip_orphans: removed {}", nodes.len() - kept.len());
    kept
}

fn touched_ids(edges: &[Edge]) -> HashSet<&str> {
    edges
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect()
}
