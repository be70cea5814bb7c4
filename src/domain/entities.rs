//! Domain entities: nodes, edges and the graph document they form

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Kind of architecture component a node represents.
///
/// `External` is synthetic: graph builders emit it for components outside the
/// documented system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeCategory {
    #[serde(rename = "API")]
    Api,
    UseCase,
    DomainOp,
    Event,
    EventHandler,
    #[serde(rename = "UI")]
    Ui,
    Custom,
    External,
}

impl NodeCategory {
    pub const ALL: [NodeCategory; 8] = [
        NodeCategory::Api,
        NodeCategory::UseCase,
        NodeCategory::DomainOp,
        NodeCategory::Event,
        NodeCategory::EventHandler,
        NodeCategory::Ui,
        NodeCategory::Custom,
        NodeCategory::External,
    ];

    /// Serialized name, as it appears in graph documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeCategory::Api => "API",
            NodeCategory::UseCase => "UseCase",
            NodeCategory::DomainOp => "DomainOp",
            NodeCategory::Event => "Event",
            NodeCategory::EventHandler => "EventHandler",
            NodeCategory::Ui => "UI",
            NodeCategory::Custom => "Custom",
            NodeCategory::External => "External",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeCategory {
    type Err = DomainError;

    /// Case-insensitive; accepts the serialized names and `-`/`_` separated spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        NodeCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

/// Synchronous or asynchronous call between two components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Sync,
    Async,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::Sync => f.write_str("sync"),
            FlowKind::Async => f.write_str("async"),
        }
    }
}

/// Point in graph space, as assigned by a layout routine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A component of the architecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub category: NodeCategory,
    pub domain: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        category: NodeCategory,
        domain: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            domain: domain.into(),
            name: name.into(),
            x: None,
            y: None,
        }
    }

    /// Copy of this node placed at `position`.
    pub fn at(&self, position: Position) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..self.clone()
        }
    }

    /// Assigned position; `None` until both coordinates are set.
    pub fn position(&self) -> Option<Position> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Position { x, y }),
            _ => None,
        }
    }

    /// Position, or `MissingPosition` naming this node.
    pub fn require_position(&self) -> Result<Position, DomainError> {
        self.position().ok_or_else(|| DomainError::MissingPosition {
            node_id: self.id.clone(),
        })
    }
}

/// Directed call from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default, rename = "flow", skip_serializing_if = "Option::is_none")]
    pub kind: Option<FlowKind>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: FlowKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// `"<source>-><target>"`
    pub fn key(&self) -> String {
        edge_key(&self.source, &self.target)
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Identity of an ordered node pair, used for highlighting and deduplication.
pub fn edge_key(source: &str, target: &str) -> String {
    format!("{source}->{target}")
}

/// Full architecture graph as supplied by the graph source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Distinct domain names, sorted.
pub fn domains(nodes: &[Node]) -> BTreeSet<String> {
    nodes.iter().map(|n| n.domain.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_serialized_names_when_parsing_category_then_matches_case_insensitively() {
        assert_eq!("API".parse::<NodeCategory>().unwrap(), NodeCategory::Api);
        assert_eq!("usecase".parse::<NodeCategory>().unwrap(), NodeCategory::UseCase);
        assert_eq!("event-handler".parse::<NodeCategory>().unwrap(), NodeCategory::EventHandler);
        assert_eq!("ui".parse::<NodeCategory>().unwrap(), NodeCategory::Ui);
    }

    #[test]
    fn given_unknown_name_when_parsing_category_then_fails() {
        let err = "Service".parse::<NodeCategory>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownCategory(s) if s == "Service"));
    }

    #[test]
    fn given_graph_json_when_deserializing_then_reads_types_and_flow() {
        let json = r#"{
            "nodes": [
                {"id": "a", "type": "API", "domain": "orders", "name": "POST /orders", "x": 1.5, "y": 2.0},
                {"id": "b", "type": "UseCase", "domain": "orders", "name": "PlaceOrder"}
            ],
            "edges": [{"source": "a", "target": "b", "flow": "async"}, {"source": "b", "target": "a"}]
        }"#;

        let graph: Graph = serde_json::from_str(json).unwrap();

        assert_eq!(graph.nodes[0].category, NodeCategory::Api);
        assert_eq!(graph.nodes[0].position(), Some(Position::new(1.5, 2.0)));
        assert_eq!(graph.nodes[1].position(), None);
        assert_eq!(graph.edges[0].kind, Some(FlowKind::Async));
        assert_eq!(graph.edges[1].kind, None);
    }

    #[test]
    fn given_node_with_one_coordinate_when_requiring_position_then_names_node() {
        let mut node = Node::new("half", NodeCategory::Event, "billing", "InvoiceSent");
        node.x = Some(10.0);

        let err = node.require_position().unwrap_err();

        assert!(err.to_string().contains("half"));
    }

    #[test]
    fn given_repeated_domains_when_listing_then_distinct_and_sorted() {
        let nodes = vec![
            Node::new("a", NodeCategory::Api, "orders", "a"),
            Node::new("b", NodeCategory::Event, "billing", "b"),
            Node::new("c", NodeCategory::UseCase, "orders", "c"),
        ];

        let listed: Vec<String> = domains(&nodes).into_iter().collect();

        assert_eq!(listed, vec!["billing", "orders"]);
    }

    #[test]
    fn test_edge_key_format() {
        assert_eq!(Edge::new("a", "b").key(), "a->b");
    }
}
