//! Viewport fitting: scale and translate that place a node set on screen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::{Node, Position};
use crate::domain::error::DomainError;

/// Largest scale a whole-graph fit may use.
pub const FIT_ALL_MAX_SCALE: f64 = 1.0;
/// Largest scale a domain focus may use; focusing a subset zooms in.
pub const FOCUS_MAX_SCALE: f64 = 2.5;
/// Margin around a focused domain, in graph units per side.
pub const FOCUS_MARGIN: f64 = 100.0;

/// Screen area in pixels. Both dimensions are positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, DomainError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(DomainError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Maps graph coordinates to viewport pixels: `screen = graph * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl ViewportTransform {
    pub const IDENTITY: ViewportTransform = ViewportTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Screen position of a graph-space point.
    pub fn apply(&self, p: Position) -> Position {
        Position {
            x: p.x * self.scale + self.translate_x,
            y: p.y * self.scale + self.translate_y,
        }
    }
}

/// Axis-aligned bounding box in graph space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box containing every point; `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = Position>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => BoundingBox {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(b) => BoundingBox {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    /// Grow by `margin` on every side.
    #[must_use]
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Position {
        Position {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Transform centering this box in `viewport`, scaled to fit but never above `max_scale`.
    fn fit(&self, viewport: Viewport, max_scale: f64) -> ViewportTransform {
        // A zero-extent axis yields +inf here, which `min` discards.
        let scale = (viewport.width / self.width())
            .min(viewport.height / self.height())
            .min(max_scale);
        let center = self.center();
        ViewportTransform {
            translate_x: viewport.width / 2.0 - center.x * scale,
            translate_y: viewport.height / 2.0 - center.y * scale,
            scale,
        }
    }
}

/// Fit every node into the viewport with `padding` around the graph.
///
/// No nodes gives the identity transform. Scale never exceeds 1.
pub fn fit_all(nodes: &[Node], viewport: Viewport, padding: f64) -> Result<ViewportTransform, DomainError> {
    let positions = nodes
        .iter()
        .map(Node::require_position)
        .collect::<Result<Vec<_>, _>>()?;
    let Some(bounds) = BoundingBox::from_points(positions) else {
        return Ok(ViewportTransform::IDENTITY);
    };
    let transform = bounds.expand(padding.max(0.0)).fit(viewport, FIT_ALL_MAX_SCALE);
    debug!("fit_all: {} nodes -> {:?}", nodes.len(), transform);
    Ok(transform)
}

/// Fit the nodes of `domain` into the viewport.
///
/// `Ok(None)` when no node belongs to the domain. Only member nodes need
/// positions. Scale never exceeds 2.5.
pub fn focus_domain(
    nodes: &[Node],
    domain: &str,
    viewport: Viewport,
) -> Result<Option<ViewportTransform>, DomainError> {
    let positions = nodes
        .iter()
        .filter(|n| n.domain == domain)
        .map(Node::require_position)
        .collect::<Result<Vec<_>, _>>()?;
    let Some(bounds) = BoundingBox::from_points(positions) else {
        debug!("focus_domain: no nodes in domain {:?}", domain);
        return Ok(None);
    };
    let transform = bounds.expand(FOCUS_MARGIN).fit(viewport, FOCUS_MAX_SCALE);
    debug!("focus_domain {:?} -> {:?}", domain, transform);
    Ok(Some(transform))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NodeCategory;

    fn placed(id: &str, domain: &str, x: f64, y: f64) -> Node {
        Node::new(id, NodeCategory::UseCase, domain, id).at(Position::new(x, y))
    }

    fn viewport(w: f64, h: f64) -> Viewport {
        Viewport::new(w, h).unwrap()
    }

    #[test]
    fn given_no_nodes_when_fitting_all_then_returns_identity() {
        let t = fit_all(&[], viewport(800.0, 600.0), 50.0).unwrap();
        assert_eq!(t, ViewportTransform::IDENTITY);
    }

    #[test]
    fn given_large_graph_when_fitting_all_then_scales_down_and_centers() {
        // box 0..1900 x 0..900, padded by 50 -> 2000 x 1000
        let nodes = vec![placed("a", "d", 0.0, 0.0), placed("b", "d", 1900.0, 900.0)];

        let t = fit_all(&nodes, viewport(1000.0, 1000.0), 50.0).unwrap();

        assert!((t.scale - 0.5).abs() < 1e-9);
        let center = t.apply(Position::new(950.0, 450.0));
        assert!((center.x - 500.0).abs() < 1e-9);
        assert!((center.y - 500.0).abs() < 1e-9);
    }

    #[test]
    fn given_small_graph_when_fitting_all_then_caps_scale_at_one() {
        let nodes = vec![placed("a", "d", 10.0, 10.0), placed("b", "d", 20.0, 20.0)];

        let t = fit_all(&nodes, viewport(1000.0, 1000.0), 0.0).unwrap();

        assert_eq!(t.scale, 1.0);
        assert_eq!(t.translate_x, 485.0);
    }

    #[test]
    fn given_single_node_without_padding_when_fitting_all_then_scale_is_finite() {
        let t = fit_all(&[placed("a", "d", 5.0, 5.0)], viewport(400.0, 300.0), 0.0).unwrap();

        assert_eq!(t.scale, 1.0);
        assert_eq!(t.apply(Position::new(5.0, 5.0)), Position::new(200.0, 150.0));
    }

    #[test]
    fn given_unplaced_node_when_fitting_all_then_fails_naming_it() {
        let nodes = vec![
            placed("a", "d", 0.0, 0.0),
            Node::new("ghost", NodeCategory::Event, "d", "Ghost"),
        ];

        let err = fit_all(&nodes, viewport(100.0, 100.0), 10.0).unwrap_err();

        assert_eq!(
            err,
            DomainError::MissingPosition {
                node_id: "ghost".into()
            }
        );
    }

    #[test]
    fn given_unknown_domain_when_focusing_then_returns_none() {
        let nodes = vec![placed("a", "orders", 0.0, 0.0)];

        let t = focus_domain(&nodes, "billing", viewport(800.0, 600.0)).unwrap();

        assert_eq!(t, None);
    }

    #[test]
    fn given_tight_domain_when_focusing_then_zooms_in_up_to_cap() {
        let nodes = vec![
            placed("a", "orders", 0.0, 0.0),
            placed("b", "orders", 10.0, 10.0),
            placed("far", "billing", 5000.0, 5000.0),
        ];

        let t = focus_domain(&nodes, "orders", viewport(1000.0, 1000.0))
            .unwrap()
            .unwrap();

        // box 210 x 210 -> 1000/210 > 2.5
        assert_eq!(t.scale, FOCUS_MAX_SCALE);
        let center = t.apply(Position::new(5.0, 5.0));
        assert!((center.x - 500.0).abs() < 1e-9);
        assert!((center.y - 500.0).abs() < 1e-9);
    }

    #[test]
    fn given_unplaced_node_outside_domain_when_focusing_then_ignores_it() {
        let nodes = vec![
            placed("a", "orders", 0.0, 0.0),
            Node::new("b", NodeCategory::Api, "billing", "B"),
        ];

        assert!(focus_domain(&nodes, "orders", viewport(500.0, 500.0)).is_ok());
    }

    #[test]
    fn given_non_positive_dimension_when_creating_viewport_then_fails() {
        assert!(Viewport::new(0.0, 100.0).is_err());
        assert!(Viewport::new(100.0, -1.0).is_err());
        assert!(Viewport::new(f64::NAN, 100.0).is_err());
    }
}
