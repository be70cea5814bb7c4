//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{GraphService, ProjectionService, ViewOptions};
use crate::application::{Layout, StoredLayout};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Layout routine positioning projected nodes
    pub layout: Arc<dyn Layout>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(StoredLayout))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>, layout: Arc<dyn Layout>) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            layout,
        }
    }

    pub fn graph_service(&self) -> GraphService {
        GraphService::new(Arc::clone(&self.fs))
    }

    pub fn projection_service(&self) -> ProjectionService {
        ProjectionService::new(Arc::clone(&self.layout))
    }

    /// View options from settings.
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions::from(&self.settings.view)
    }
}
