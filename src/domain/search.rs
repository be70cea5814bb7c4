//! Search: nodes matching a query plus everything in their flows.

use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::debug;

use crate::domain::entities::{Edge, Node};
use crate::domain::flow::trace;

/// Lowercased, trimmed form of a query, as `matches` expects it.
pub fn needle(query: &str) -> String {
    query.trim().to_lowercase()
}

/// True when `needle` occurs in the node's name, domain or category, ignoring case.
///
/// An empty needle matches every node.
pub fn matches(node: &Node, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [node.name.as_str(), node.domain.as_str(), node.category.as_str()]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Ids of the nodes relevant to `query`.
///
/// Each matching node contributes its whole flow trace. A blank query
/// matches every node.
pub fn search(nodes: &[Node], edges: &[Edge], query: &str) -> BTreeSet<String> {
    let needle = needle(query);
    let relevant: BTreeSet<String> = nodes
        .par_iter()
        .filter(|n| matches(n, &needle))
        .map(|n| trace(&n.id, edges).node_ids)
        .reduce(BTreeSet::new, |mut acc, ids| {
            acc.extend(ids);
            acc
        });
    debug!("search {:?}: {} relevant nodes", query, relevant.len());
    relevant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NodeCategory;

    fn graph() -> (Vec<Node>, Vec<Edge>) {
        let nodes = vec![
            Node::new("api", NodeCategory::Api, "Orders", "POST /orders"),
            Node::new("uc", NodeCategory::UseCase, "Orders", "PlaceOrder"),
            Node::new("inv", NodeCategory::DomainOp, "Billing", "CreateInvoice"),
            Node::new("mail", NodeCategory::EventHandler, "Notify", "SendMail"),
        ];
        let edges = vec![Edge::new("api", "uc"), Edge::new("uc", "inv")];
        (nodes, edges)
    }

    #[test]
    fn given_blank_query_when_searching_then_matches_everything() {
        let (nodes, edges) = graph();

        assert_eq!(search(&nodes, &edges, "   ").len(), 4);
    }

    #[test]
    fn given_name_substring_when_searching_then_includes_flow_of_match() {
        let (nodes, edges) = graph();

        let result = search(&nodes, &edges, "invoice");

        let expected: BTreeSet<String> = ["api", "uc", "inv"].iter().map(|s| s.to_string()).collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn given_category_query_when_searching_then_matches_case_insensitively() {
        let (nodes, edges) = graph();

        let result = search(&nodes, &edges, "EVENTHANDLER");

        assert_eq!(result, BTreeSet::from(["mail".to_string()]));
    }

    #[test]
    fn given_dangling_edge_when_searching_blank_then_covers_any_narrower_query() {
        let nodes = vec![Node::new("a", NodeCategory::Api, "Orders", "Checkout")];
        let edges = vec![Edge::new("a", "ghost")];

        let everything = search(&nodes, &edges, "");
        let narrow = search(&nodes, &edges, "checkout");

        assert!(everything.is_superset(&narrow));
        assert!(everything.contains("ghost"));
    }

    #[test]
    fn given_mixed_case_query_when_normalizing_then_trims_and_lowercases() {
        let node = Node::new("uc", NodeCategory::UseCase, "Orders", "PlaceOrder");

        assert_eq!(needle("  PlaceORDER "), "placeorder");
        assert!(matches(&node, &needle("  PlaceORDER ")));
        assert!(matches(&node, &needle("")));
    }

    #[test]
    fn given_no_match_when_searching_then_returns_empty() {
        let (nodes, edges) = graph();

        assert!(search(&nodes, &edges, "shipping").is_empty());
    }
}
