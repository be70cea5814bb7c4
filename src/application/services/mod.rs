//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Layout)
//! but are themselves concrete structs, not traits.

mod graph;
mod projection;

pub use graph::GraphService;
pub use projection::{Projection, ProjectionService, ViewOptions};
