//! Graph source service
//!
//! Loads graph documents produced by the graph builder. Documents are read,
//! never written.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Graph;
use crate::infrastructure::traits::FileSystem;

/// Service for reading graph documents.
pub struct GraphService {
    fs: Arc<dyn FileSystem>,
}

impl GraphService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load a graph document from `path`.
    ///
    /// Edge endpoints are not validated; dangling ids are kept and simply
    /// never match a node.
    pub fn load(&self, path: &Path) -> ApplicationResult<Graph> {
        debug!("load: path={}", path.display());
        if !self.fs.exists(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("graph file not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read graph", path)?;
        let graph = Self::parse(&content, path)?;
        debug!(
            "load: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    /// Parse a JSON graph document; `path` is used for error messages only.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Graph> {
        serde_json::from_str(content).map_err(|e| ApplicationError::GraphFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
