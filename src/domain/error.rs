//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violated preconditions of the projection engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("node has no assigned position: {node_id}")]
    MissingPosition { node_id: String },

    #[error("invalid viewport: {width}x{height} (dimensions must be positive)")]
    InvalidViewport { width: f64, height: f64 },

    #[error("unknown node category: {0}")]
    UnknownCategory(String),
}
