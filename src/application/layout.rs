//! Layout boundary: positions come from an external layout routine.

use std::collections::HashMap;

use crate::domain::{Edge, Node, Position};

/// Assigns a position to node ids of a projected graph.
///
/// Implementations may omit nodes; the viewport calculation then fails for
/// them instead of guessing a position.
pub trait Layout: Send + Sync {
    fn positions(&self, nodes: &[Node], edges: &[Edge]) -> HashMap<String, Position>;
}

/// Layout already carried by the graph document (`x`/`y` on each node).
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredLayout;

impl Layout for StoredLayout {
    fn positions(&self, nodes: &[Node], _edges: &[Edge]) -> HashMap<String, Position> {
        nodes
            .iter()
            .filter_map(|n| n.position().map(|p| (n.id.clone(), p)))
            .collect()
    }
}

/// Copies of `nodes` placed at their layout positions.
///
/// Nodes missing from `positions` keep whatever position they had.
pub fn apply_layout(nodes: &[Node], positions: &HashMap<String, Position>) -> Vec<Node> {
    nodes
        .iter()
        .map(|n| match positions.get(&n.id) {
            Some(p) => n.at(*p),
            None => n.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeCategory;

    #[test]
    fn given_partial_layout_when_applying_then_leaves_unplaced_nodes_unset() {
        let nodes = vec![
            Node::new("a", NodeCategory::Api, "d", "A"),
            Node::new("b", NodeCategory::Api, "d", "B"),
        ];
        let positions = HashMap::from([("a".to_string(), Position::new(3.0, 4.0))]);

        let placed = apply_layout(&nodes, &positions);

        assert_eq!(placed[0].position(), Some(Position::new(3.0, 4.0)));
        assert_eq!(placed[1].position(), None);
        assert_eq!(nodes[0].position(), None, "input must not change");
    }

    #[test]
    fn given_stored_coordinates_when_laying_out_then_reports_only_placed_nodes() {
        let nodes = vec![
            Node::new("a", NodeCategory::Api, "d", "A").at(Position::new(1.0, 2.0)),
            Node::new("b", NodeCategory::Api, "d", "B"),
        ];

        let positions = StoredLayout.positions(&nodes, &[]);

        assert_eq!(positions.len(), 1);
        assert_eq!(positions["a"], Position::new(1.0, 2.0));
    }
}
