//! Tests for visibility reduction

use std::collections::HashSet;

use rstest::rstest;

use archview::domain::NodeCategory::*;
use archview::domain::{all_categories, reduce, Edge, FlowKind, Node, NodeCategory};
use archview::util::testing::{edges, flow, init_test_setup, node};

fn visible(types: &[NodeCategory]) -> HashSet<NodeCategory> {
    types.iter().copied().collect()
}

fn ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

/// api -> uc -> op -> ev -> handler -> op2, plus a ui node calling uc
fn pipeline() -> (Vec<Node>, Vec<Edge>) {
    let nodes = vec![
        node("api", Api),
        node("uc", UseCase),
        node("op", DomainOp),
        node("ev", Event),
        node("handler", EventHandler),
        node("op2", DomainOp),
        node("ui", Ui),
    ];
    let edges = vec![
        flow("api", "uc", FlowKind::Sync),
        flow("uc", "op", FlowKind::Sync),
        flow("op", "ev", FlowKind::Async),
        flow("ev", "handler", FlowKind::Async),
        flow("handler", "op2", FlowKind::Sync),
        flow("ui", "uc", FlowKind::Sync),
    ];
    (nodes, edges)
}

// ============================================================
// Invariants
// ============================================================

#[rstest]
#[case::nothing_hidden(vec![Api, UseCase, DomainOp, Event, EventHandler, Ui])]
#[case::use_cases_hidden(vec![Api, DomainOp, Event, EventHandler, Ui])]
#[case::events_hidden(vec![Api, UseCase, DomainOp, Ui])]
#[case::only_api_and_ops(vec![Api, DomainOp])]
#[case::only_ui(vec![Ui])]
#[case::nothing_visible(vec![])]
fn given_any_visible_set_when_reducing_then_edges_stay_within_visible_nodes(
    #[case] types: Vec<NodeCategory>,
) {
    init_test_setup();
    let (nodes, edges) = pipeline();

    let result = reduce(&nodes, &edges, &visible(&types));

    let kept: HashSet<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    let input: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert!(kept.is_subset(&input));
    for edge in &result.edges {
        assert!(kept.contains(edge.source.as_str()), "dangling source in {}", edge.key());
        assert!(kept.contains(edge.target.as_str()), "dangling target in {}", edge.key());
    }
}

#[test]
fn given_all_categories_visible_when_reducing_then_graph_is_unchanged() {
    let (nodes, edges) = pipeline();

    let result = reduce(&nodes, &edges, &all_categories());

    assert_eq!(result.nodes, nodes);
    assert_eq!(result.edges, edges);
}

// ============================================================
// Rewiring
// ============================================================

#[test]
fn given_hidden_use_case_when_reducing_then_rewires_api_to_domain_op() {
    let nodes = vec![node("a", Api), node("b", UseCase), node("c", DomainOp)];
    let edges = vec![
        flow("a", "b", FlowKind::Sync),
        flow("b", "c", FlowKind::Async),
    ];

    let result = reduce(&nodes, &edges, &visible(&[Api, DomainOp]));

    assert_eq!(ids(&result.nodes), vec!["a", "c"]);
    assert_eq!(result.edges, vec![flow("a", "c", FlowKind::Async)]);
}

#[test]
fn given_long_hidden_chain_when_reducing_then_connects_endpoints() {
    let (nodes, edges) = pipeline();

    let result = reduce(&nodes, &edges, &visible(&[Api, DomainOp]));

    assert_eq!(ids(&result.nodes), vec!["api", "op", "op2"]);
    assert_eq!(
        result.edges,
        vec![
            flow("api", "op", FlowKind::Sync),
            flow("op", "op2", FlowKind::Sync),
        ]
    );
}

#[test]
fn given_hidden_cycle_between_source_and_sink_when_reducing_then_finds_sink() {
    // a -> h1 -> h2 -> h3 -> h1 (cycle), h3 -> z
    let nodes = vec![
        node("a", Api),
        node("h1", Event),
        node("h2", Event),
        node("h3", EventHandler),
        node("z", DomainOp),
    ];
    let edges = edges(&[("a", "h1"), ("h1", "h2"), ("h2", "h3"), ("h3", "h1"), ("h3", "z")]);

    let result = reduce(&nodes, &edges, &visible(&[Api, DomainOp]));

    assert_eq!(result.edges, vec![Edge::new("a", "z")]);
}

#[test]
fn given_hidden_source_with_visible_predecessor_when_reducing_then_does_not_rewire_backwards() {
    // h points at both visible nodes, nothing visible points at h
    let nodes = vec![node("x", Api), node("h", UseCase), node("y", DomainOp)];
    let edges = edges(&[("h", "y"), ("h", "x")]);

    let result = reduce(&nodes, &edges, &visible(&[Api, DomainOp]));

    assert!(result.edges.is_empty());
    assert_eq!(ids(&result.nodes), vec!["x", "y"]);
}

#[test]
fn given_visible_node_reachable_directly_and_through_hidden_when_reducing_then_single_edge() {
    let nodes = vec![node("a", Api), node("h", UseCase), node("c", DomainOp)];
    let edges = vec![
        flow("a", "c", FlowKind::Sync),
        Edge::new("a", "h"),
        flow("h", "c", FlowKind::Async),
    ];

    let result = reduce(&nodes, &edges, &visible(&[Api, DomainOp]));

    assert_eq!(result.edges, vec![flow("a", "c", FlowKind::Sync)]);
}

#[test]
fn given_self_edge_on_visible_node_when_reducing_then_keeps_it() {
    let nodes = vec![node("a", Api)];
    let edges = edges(&[("a", "a")]);

    let result = reduce(&nodes, &edges, &all_categories());

    assert_eq!(result.edges, vec![Edge::new("a", "a")]);
}

#[test]
fn given_input_when_reducing_then_input_is_untouched() {
    let (nodes, edges) = pipeline();
    let (nodes_before, edges_before) = (nodes.clone(), edges.clone());

    let _ = reduce(&nodes, &edges, &visible(&[Api]));

    assert_eq!(nodes, nodes_before);
    assert_eq!(edges, edges_before);
}
