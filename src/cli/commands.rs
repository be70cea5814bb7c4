//! Command dispatch: load graph and settings, run the projection, print results

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use serde_json::json;
use tracing::{debug, instrument};

use crate::application::services::{Projection, ViewOptions};
use crate::cli::args::{Cli, Commands, ConfigCommands, ViewArgs, ViewportArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{detect_orphans, domains, reduce, Viewport};
use crate::infrastructure::di::ServiceContainer;
use crate::util::path::graph_dir;

/// Execute the parsed CLI command, writing machine output to stdout.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    execute_command_with(cli, &mut io::stdout().lock())
}

/// Execute the parsed CLI command, writing `--json` documents and shell
/// completions to `out`.
pub fn execute_command_with(cli: &Cli, out: &mut dyn Write) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };

    match command {
        Commands::Config { command } => return cmd_config(cli, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "archview", out);
            return Ok(());
        }
        _ => {}
    }

    let settings = load_settings(cli.graph.as_deref())?;
    let graph_path = resolve_graph_path(cli, &settings)?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Reduce { view } => cmd_reduce(cli, out, &container, &graph_path, view),
        Commands::Trace { node, view } => {
            cmd_trace(cli, out, &container, &graph_path, node, view)
        }
        Commands::Orphans { view } => cmd_orphans(cli, out, &container, &graph_path, view),
        Commands::Fit {
            view,
            viewport,
            padding,
        } => cmd_fit(cli, out, &container, &graph_path, view, viewport, *padding),
        Commands::Focus {
            domain,
            view,
            viewport,
        } => cmd_focus(cli, out, &container, &graph_path, domain, view, viewport),
        Commands::Search {
            query,
            view,
            fit,
            viewport,
        } => cmd_search(cli, out, &container, &graph_path, query, view, *fit, viewport),
        Commands::Domains { view } => cmd_domains(cli, out, &container, &graph_path, view),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn load_settings(graph: Option<&Path>) -> CliResult<Settings> {
    let local_dir = graph.map(graph_dir);
    Ok(Settings::load(local_dir.as_deref())?)
}

fn resolve_graph_path(cli: &Cli, settings: &Settings) -> CliResult<PathBuf> {
    cli.graph
        .clone()
        .or_else(|| settings.graph_file.clone())
        .ok_or_else(|| {
            CliError::Usage(
                "no graph document: pass --graph or set graph_file in config".to_string(),
            )
        })
}

fn view_options(container: &ServiceContainer, view: &ViewArgs) -> ViewOptions {
    let mut options = container.view_options().adjust(&view.show, &view.hide);
    if view.keep_orphans {
        options.strip_orphans = false;
    }
    options
}

fn viewport(container: &ServiceContainer, args: &ViewportArgs) -> CliResult<Viewport> {
    let configured = &container.settings.viewport;
    Ok(Viewport::new(
        args.width.unwrap_or(configured.width),
        args.height.unwrap_or(configured.height),
    )?)
}

fn project(container: &ServiceContainer, graph_path: &Path, view: &ViewArgs) -> CliResult<Projection> {
    let graph = container.graph_service().load(graph_path)?;
    let options = view_options(container, view);
    debug!("project: options={:?}", options);
    Ok(container.projection_service().project(&graph, &options))
}

fn print_json(out: &mut dyn Write, value: &serde_json::Value) -> CliResult<()> {
    Ok(output::json(out, value)?)
}

#[instrument(skip(cli, out, container))]
fn cmd_reduce(
    cli: &Cli,
    out: &mut dyn Write,
    container: &ServiceContainer,
    graph_path: &Path,
    view: &ViewArgs,
) -> CliResult<()> {
    let projection = project(container, graph_path, view)?;
    if cli.json {
        return print_json(out, &json!({
            "nodes": projection.nodes,
            "edges": projection.edges,
            "orphans": projection.orphans,
        }));
    }

    output::header(&format!("Nodes ({})", projection.nodes.len()));
    projection.nodes.iter().for_each(output::node);
    output::header(&format!("Edges ({})", projection.edges.len()));
    projection.edges.iter().for_each(output::edge);
    if !projection.orphans.is_empty() {
        output::warning(&format!(
            "removed orphans: {}",
            projection.orphans.iter().join(", ")
        ));
    }
    Ok(())
}

#[instrument(skip(cli, out, container))]
fn cmd_trace(
    cli: &Cli,
    out: &mut dyn Write,
    container: &ServiceContainer,
    graph_path: &Path,
    node: &str,
    view: &ViewArgs,
) -> CliResult<()> {
    let projection = project(container, graph_path, view)?;
    if !projection.nodes.iter().any(|n| n.id == node) {
        output::warning(&format!("node not in view: {node}"));
    }
    let flow = container.projection_service().trace(&projection, node);
    if cli.json {
        return print_json(out, &json!({
            "nodeIds": flow.node_ids,
            "edgeKeys": flow.edge_keys,
        }));
    }

    output::header(&format!("Flow through {} ({} nodes)", node, flow.node_ids.len()));
    projection
        .nodes
        .iter()
        .filter(|n| flow.contains_node(&n.id))
        .for_each(output::node);
    output::header(&format!("Edges ({})", flow.edge_keys.len()));
    projection
        .edges
        .iter()
        .filter(|e| flow.contains_edge(e))
        .for_each(output::edge);
    Ok(())
}

#[instrument(skip(cli, out, container))]
fn cmd_orphans(
    cli: &Cli,
    out: &mut dyn Write,
    container: &ServiceContainer,
    graph_path: &Path,
    view: &ViewArgs,
) -> CliResult<()> {
    let graph = container.graph_service().load(graph_path)?;
    let options = view_options(container, view);
    let reduction = reduce(&graph.nodes, &graph.edges, &options.visible_types);
    let orphans = detect_orphans(&reduction.nodes, &reduction.edges);
    if cli.json {
        return print_json(out, &json!(orphans));
    }

    if orphans.is_empty() {
        output::success("no orphans");
    } else {
        output::header(&format!("Orphans ({})", orphans.len()));
        orphans.iter().for_each(|id| output::detail(id));
    }
    Ok(())
}

#[instrument(skip(cli, out, container))]
fn cmd_fit(
    cli: &Cli,
    out: &mut dyn Write,
    container: &ServiceContainer,
    graph_path: &Path,
    view: &ViewArgs,
    viewport_args: &ViewportArgs,
    padding: Option<f64>,
) -> CliResult<()> {
    let projection = project(container, graph_path, view)?;
    let viewport = viewport(container, viewport_args)?;
    let padding = padding.unwrap_or(container.settings.viewport.padding);
    let transform = container
        .projection_service()
        .fit_all(&projection, viewport, padding)?;
    if cli.json {
        return print_json(out, &json!(transform));
    }
    output::transform(&transform);
    Ok(())
}

#[instrument(skip(cli, out, container))]
fn cmd_focus(
    cli: &Cli,
    out: &mut dyn Write,
    container: &ServiceContainer,
    graph_path: &Path,
    domain: &str,
    view: &ViewArgs,
    viewport_args: &ViewportArgs,
) -> CliResult<()> {
    let projection = project(container, graph_path, view)?;
    let viewport = viewport(container, viewport_args)?;
    let transform = container
        .projection_service()
        .focus_domain(&projection, domain, viewport)?;
    if cli.json {
        return print_json(out, &json!(transform));
    }
    match transform {
        Some(t) => output::transform(&t),
        None => output::warning(&format!("no nodes in domain: {domain}")),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(cli, out, container))]
fn cmd_search(
    cli: &Cli,
    out: &mut dyn Write,
    container: &ServiceContainer,
    graph_path: &Path,
    query: &str,
    view: &ViewArgs,
    fit: bool,
    viewport_args: &ViewportArgs,
) -> CliResult<()> {
    let projection = project(container, graph_path, view)?;
    let service = container.projection_service();
    let relevant = service.search(&projection, query);
    let transform = if fit {
        let viewport = viewport(container, viewport_args)?;
        let padding = container.settings.viewport.padding;
        Some(service.fit_search(&projection, query, viewport, padding)?)
    } else {
        None
    };
    if cli.json {
        return print_json(out, &json!({
            "nodeIds": relevant,
            "transform": transform,
        }));
    }

    output::header(&format!("Relevant to {:?} ({})", query, relevant.len()));
    projection
        .nodes
        .iter()
        .filter(|n| relevant.contains(&n.id))
        .for_each(output::node);
    if let Some(t) = transform {
        output::transform(&t);
    }
    Ok(())
}

#[instrument(skip(cli, out, container))]
fn cmd_domains(
    cli: &Cli,
    out: &mut dyn Write,
    container: &ServiceContainer,
    graph_path: &Path,
    view: &ViewArgs,
) -> CliResult<()> {
    let projection = project(container, graph_path, view)?;
    let counts = projection.nodes.iter().counts_by(|n| n.domain.as_str());
    let sorted: Vec<(String, usize)> = domains(&projection.nodes)
        .into_iter()
        .map(|d| {
            let count = counts[d.as_str()];
            (d, count)
        })
        .collect();
    if cli.json {
        let map: serde_json::Map<String, serde_json::Value> = sorted
            .iter()
            .map(|(d, c)| (d.clone(), json!(c)))
            .collect();
        return print_json(out, &serde_json::Value::Object(map));
    }
    for (domain, count) in sorted {
        output::detail(&format!("{domain} ({count})"));
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli.graph.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::detail(&format!("global: {}", p.display())),
                None => output::warning("no config directory for this platform"),
            }
            if let Some(graph) = &cli.graph {
                let local = local_config_path(&graph_dir(graph));
                output::detail(&format!("local:  {}", local.display()));
            }
        }
    }
    Ok(())
}
