//! archview: projection engine for architecture graphs.
//!
//! The [`domain`] layer holds the pure engine (visibility reduction, flow
//! tracing, orphan detection, viewport fitting). [`application`] wires it to
//! graph documents and layouts, [`cli`] exposes it on the command line.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
