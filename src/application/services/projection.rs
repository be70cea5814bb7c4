//! Projection service
//!
//! Runs the view pipeline in the required order: visibility reduction, then
//! orphan removal, then layout. Viewport fitting, tracing and search operate
//! on the resulting projection.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{apply_layout, ApplicationResult, Layout};
use crate::config::ViewSettings;
use crate::domain::{
    detect_orphans, fit_all, focus_domain, reduce, search, strip_orphans, trace, Edge, FlowResult,
    Graph, Node, NodeCategory, Viewport, ViewportTransform,
};

/// What the current view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub visible_types: HashSet<NodeCategory>,
    pub strip_orphans: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            visible_types: NodeCategory::ALL.iter().copied().collect(),
            strip_orphans: true,
        }
    }
}

impl From<&ViewSettings> for ViewOptions {
    fn from(view: &ViewSettings) -> Self {
        Self {
            visible_types: view.visible_types.iter().copied().collect(),
            strip_orphans: view.strip_orphans,
        }
    }
}

impl ViewOptions {
    /// Show `show` and hide `hide` on top of the current set; hiding wins.
    pub fn adjust(mut self, show: &[NodeCategory], hide: &[NodeCategory]) -> Self {
        self.visible_types.extend(show.iter().copied());
        for category in hide {
            self.visible_types.remove(category);
        }
        self
    }
}

/// Reduced, orphan-free, positioned view of a graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Visible nodes dropped because no edge touched them after reduction
    pub orphans: BTreeSet<String>,
}

/// Service producing projections and the views derived from them.
pub struct ProjectionService {
    layout: Arc<dyn Layout>,
}

impl ProjectionService {
    pub fn new(layout: Arc<dyn Layout>) -> Self {
        Self { layout }
    }

    /// Reduce `graph` to `options`, strip orphans if requested, then lay it out.
    #[instrument(level = "debug", skip_all)]
    pub fn project(&self, graph: &Graph, options: &ViewOptions) -> Projection {
        let reduction = reduce(&graph.nodes, &graph.edges, &options.visible_types);

        let (nodes, orphans) = if options.strip_orphans {
            let orphans = detect_orphans(&reduction.nodes, &reduction.edges);
            (strip_orphans(&reduction.nodes, &reduction.edges), orphans)
        } else {
            (reduction.nodes, BTreeSet::new())
        };

        let positions = self.layout.positions(&nodes, &reduction.edges);
        let nodes = apply_layout(&nodes, &positions);
        debug!(
            "project: {} nodes, {} edges, {} orphans removed",
            nodes.len(),
            reduction.edges.len(),
            orphans.len()
        );

        Projection {
            nodes,
            edges: reduction.edges,
            orphans,
        }
    }

    /// Transform showing the whole projection.
    pub fn fit_all(
        &self,
        projection: &Projection,
        viewport: Viewport,
        padding: f64,
    ) -> ApplicationResult<ViewportTransform> {
        Ok(fit_all(&projection.nodes, viewport, padding)?)
    }

    /// Transform focusing one domain; `None` when the projection has no node in it.
    pub fn focus_domain(
        &self,
        projection: &Projection,
        domain: &str,
        viewport: Viewport,
    ) -> ApplicationResult<Option<ViewportTransform>> {
        Ok(focus_domain(&projection.nodes, domain, viewport)?)
    }

    /// Flow through `node_id` over the projected edges.
    pub fn trace(&self, projection: &Projection, node_id: &str) -> FlowResult {
        trace(node_id, &projection.edges)
    }

    /// Nodes relevant to `query` within the projection.
    pub fn search(&self, projection: &Projection, query: &str) -> BTreeSet<String> {
        search(&projection.nodes, &projection.edges, query)
    }

    /// Transform fitting the nodes relevant to `query`; identity when nothing matches.
    pub fn fit_search(
        &self,
        projection: &Projection,
        query: &str,
        viewport: Viewport,
        padding: f64,
    ) -> ApplicationResult<ViewportTransform> {
        let relevant = self.search(projection, query);
        let nodes: Vec<Node> = projection
            .nodes
            .iter()
            .filter(|n| relevant.contains(&n.id))
            .cloned()
            .collect();
        Ok(fit_all(&nodes, viewport, padding)?)
    }
}
