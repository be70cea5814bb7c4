//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::NodeCategory;

/// Explore an architecture graph: reduce by category, trace flows, find orphans, fit viewports
#[derive(Parser, Debug)]
#[command(name = "archview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Graph document (default: graph_file from config)
    #[arg(short, long, global = true, env = "ARCHVIEW_GRAPH", value_hint = ValueHint::FilePath)]
    pub graph: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Category filter applied before any other step.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Show a category in addition to the configured ones (repeatable)
    #[arg(long, value_name = "CATEGORY")]
    pub show: Vec<NodeCategory>,

    /// Hide a category (repeatable, wins over --show)
    #[arg(long, value_name = "CATEGORY")]
    pub hide: Vec<NodeCategory>,

    /// Keep nodes left without edges after reduction
    #[arg(long)]
    pub keep_orphans: bool,
}

/// Viewport size overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewportArgs {
    /// Viewport width in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Viewport height in pixels
    #[arg(long)]
    pub height: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the reduced graph
    Reduce {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Trace the upstream and downstream flow of a node
    Trace {
        /// Node id
        node: String,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// List nodes without edges (after reduction)
    Orphans {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Compute the transform fitting the whole view
    Fit {
        #[command(flatten)]
        view: ViewArgs,
        #[command(flatten)]
        viewport: ViewportArgs,
        /// Padding around the graph in pixels
        #[arg(long)]
        padding: Option<f64>,
    },

    /// Compute the transform focusing one domain
    Focus {
        /// Domain name
        domain: String,
        #[command(flatten)]
        view: ViewArgs,
        #[command(flatten)]
        viewport: ViewportArgs,
    },

    /// Find nodes by name, domain or category, including their flows
    Search {
        /// Case-insensitive substring; empty matches everything
        #[arg(default_value = "")]
        query: String,
        #[command(flatten)]
        view: ViewArgs,
        /// Also print the transform fitting the result
        #[arg(long)]
        fit: bool,
        #[command(flatten)]
        viewport: ViewportArgs,
    },

    /// List domains with node counts
    Domains {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show config file locations
    Path,
}
