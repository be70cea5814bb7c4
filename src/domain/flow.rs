//! Flow tracing: the upstream and downstream neighborhood of a node.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::entities::{edge_key, Edge};

/// Nodes and edges participating in the flow through a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowResult {
    pub node_ids: BTreeSet<String>,
    /// Keys in `"source->target"` form
    pub edge_keys: BTreeSet<String>,
}

impl FlowResult {
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_ids.contains(id)
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edge_keys.contains(&edge.key())
    }
}

/// Trace everything that flows into and out of `start_id`.
///
/// The result holds the downstream chain, the upstream chain, and every
/// downstream branch of each upstream node. `start_id` is always included,
/// even when no edge touches it.
pub fn trace(start_id: &str, edges: &[Edge]) -> FlowResult {
    let mut tracer = Tracer::new(edges);
    tracer.result.node_ids.insert(start_id.to_string());
    tracer.forward(start_id);
    tracer.backward(start_id);
    tracing::trace!(
        "trace {}: {} nodes, {} edges",
        start_id,
        tracer.result.node_ids.len(),
        tracer.result.edge_keys.len()
    );
    tracer.result
}

struct Tracer<'a> {
    outgoing: HashMap<&'a str, Vec<&'a Edge>>,
    incoming: HashMap<&'a str, Vec<&'a Edge>>,
    forward_seen: HashSet<&'a str>,
    backward_seen: HashSet<&'a str>,
    result: FlowResult,
}

impl<'a> Tracer<'a> {
    fn new(edges: &'a [Edge]) -> Self {
        let mut outgoing: HashMap<&str, Vec<&Edge>> = HashMap::new();
        let mut incoming: HashMap<&str, Vec<&Edge>> = HashMap::new();
        for edge in edges {
            outgoing.entry(edge.source.as_str()).or_default().push(edge);
            incoming.entry(edge.target.as_str()).or_default().push(edge);
        }
        Self {
            outgoing,
            incoming,
            forward_seen: HashSet::new(),
            backward_seen: HashSet::new(),
            result: FlowResult::default(),
        }
    }

    fn forward(&mut self, node: &str) {
        // Only ids that occur in some edge can have successors to mark.
        let Some((&id, out)) = self.outgoing.get_key_value(node) else {
            return;
        };
        if !self.forward_seen.insert(id) {
            return;
        }
        for edge in out.clone() {
            self.record(edge, &edge.target);
            self.forward(&edge.target);
        }
    }

    fn backward(&mut self, node: &str) {
        let Some((&id, inc)) = self.incoming.get_key_value(node) else {
            return;
        };
        if !self.backward_seen.insert(id) {
            return;
        }
        for edge in inc.clone() {
            self.record(edge, &edge.source);
            self.backward(&edge.source);
            self.forward(&edge.source);
        }
    }

    fn record(&mut self, edge: &Edge, reached: &str) {
        self.result.node_ids.insert(reached.to_string());
        self.result
            .edge_keys
            .insert(edge_key(&edge.source, &edge.target));
    }
}
