//! Visibility reduction: hide node categories, rewire edges across hidden nodes.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::domain::entities::{Edge, FlowKind, Node, NodeCategory};

/// Result of a visibility reduction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reduction {
    /// Visible nodes, input order preserved
    pub nodes: Vec<Node>,
    /// Kept and rewired edges, one per ordered pair
    pub edges: Vec<Edge>,
}

/// Reduce the graph to the categories in `visible_types`.
///
/// Edges between visible nodes are kept. An edge from a visible node into a
/// hidden node is replaced by one edge to every visible node reachable forward
/// through chains of hidden nodes, carrying the flow kind of the last hop.
/// Edges leaving a hidden node are dropped; there is no backward rewiring.
///
/// Output edges are unique per `source->target`; when several chains reach the
/// same pair, the first one discovered determines the flow kind.
pub fn reduce(nodes: &[Node], edges: &[Edge], visible_types: &HashSet<NodeCategory>) -> Reduction {
    let visible_nodes: Vec<Node> = nodes
        .iter()
        .filter(|n| visible_types.contains(&n.category))
        .cloned()
        .collect();
    let visible: HashSet<&str> = visible_nodes.iter().map(|n| n.id.as_str()).collect();

    let mut outgoing: HashMap<&str, Vec<&Edge>> = HashMap::new();
    for edge in edges {
        outgoing.entry(edge.source.as_str()).or_default().push(edge);
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut reduced: Vec<Edge> = Vec::new();
    let mut push = |edge: Edge| {
        if seen.insert(edge.key()) {
            reduced.push(edge);
        }
    };

    for edge in edges {
        if !visible.contains(edge.source.as_str()) {
            continue;
        }
        if visible.contains(edge.target.as_str()) {
            push(edge.clone());
            continue;
        }

        let path = HashSet::from([edge.target.as_str()]);
        let mut terminals = Vec::new();
        collect_visible_targets(&edge.target, &outgoing, &visible, &path, &mut terminals);
        trace!(
            "rewire {}: {} visible target(s) behind hidden node",
            edge.key(),
            terminals.len()
        );
        for (target, kind) in terminals {
            push(Edge {
                source: edge.source.clone(),
                target: target.to_string(),
                kind,
            });
        }
    }

    debug!(
        "reduce: {}/{} nodes visible, {} -> {} edges",
        visible_nodes.len(),
        nodes.len(),
        edges.len(),
        reduced.len()
    );
    Reduction {
        nodes: visible_nodes,
        edges: reduced,
    }
}

/// Depth-first search from the hidden node `from` for visible nodes.
///
/// `path` holds the hidden nodes on the current chain only; each branch gets
/// its own copy so converging chains are all followed.
fn collect_visible_targets<'a>(
    from: &str,
    outgoing: &HashMap<&str, Vec<&'a Edge>>,
    visible: &HashSet<&str>,
    path: &HashSet<&'a str>,
    terminals: &mut Vec<(&'a str, Option<FlowKind>)>,
) {
    let Some(out) = outgoing.get(from) else {
        return;
    };
    for &edge in out {
        let next = edge.target.as_str();
        if visible.contains(next) {
            terminals.push((next, edge.kind));
        } else if !path.contains(next) {
            let mut branch = path.clone();
            branch.insert(next);
            collect_visible_targets(next, outgoing, visible, &branch, terminals);
        }
    }
}

/// Visible-type set containing every category.
pub fn all_categories() -> HashSet<NodeCategory> {
    NodeCategory::ALL.iter().copied().collect()
}
