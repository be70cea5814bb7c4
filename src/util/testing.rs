//! Test support: one-time tracing setup shared by unit and integration tests.

use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::domain::{Edge, FlowKind, Node, NodeCategory};

static TEST_SETUP: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to tracing this crate only.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("archview=trace"));
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_test_writer()
                .with_filter(filter),
        );
        if let Err(e) = subscriber.try_init() {
            eprintln!("Error: Failed to set up logging: {}", e);
        }
        debug!("Test setup complete");
    });
}

/// Node in domain `core` whose name equals its id.
pub fn node(id: &str, category: NodeCategory) -> Node {
    Node::new(id, category, "core", id)
}

/// Edges from `(source, target)` pairs without flow kind.
pub fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
    pairs.iter().map(|(s, t)| Edge::new(*s, *t)).collect()
}

/// Edge with an explicit flow kind.
pub fn flow(source: &str, target: &str, kind: FlowKind) -> Edge {
    Edge::new(source, target).with_kind(kind)
}
