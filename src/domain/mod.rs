//! Domain layer: graph entities and the projection engine
//!
//! Every function here is pure: it borrows its inputs and returns new
//! collections. No I/O, no shared state.

pub mod entities;
pub mod error;
pub mod flow;
pub mod orphans;
pub mod reduce;
pub mod search;
pub mod viewport;

pub use entities::*;
pub use error::DomainError;
pub use flow::{trace, FlowResult};
pub use orphans::{detect_orphans, strip_orphans};
pub use reduce::{all_categories, reduce, Reduction};
pub use search::search;
pub use viewport::{fit_all, focus_domain, BoundingBox, Viewport, ViewportTransform};
