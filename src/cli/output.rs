//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::io::Write;

use colored::Colorize;

use crate::domain::{Edge, Node, ViewportTransform};
use crate::infrastructure::{InfraError, InfraResult};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// One node per line: `id [Category] domain / name`
pub fn node(n: &Node) {
    println!(
        "  {} [{}] {} / {}",
        n.id.bold(),
        n.category.to_string().cyan(),
        n.domain,
        n.name
    );
}

/// One edge per line, flow kind dimmed when present
pub fn edge(e: &Edge) {
    match e.kind {
        Some(kind) => println!("  {} -> {} {}", e.source, e.target, format!("({kind})").dimmed()),
        None => println!("  {} -> {}", e.source, e.target),
    }
}

/// Viewport transform as `translateX translateY scale`
pub fn transform(t: &ViewportTransform) {
    println!(
        "{}={:.3} {}={:.3} {}={:.4}",
        "translateX".green(),
        t.translate_x,
        "translateY".green(),
        t.translate_y,
        "scale".green(),
        t.scale
    );
}

/// Pretty-printed JSON document followed by a newline
pub fn json(out: &mut dyn Write, value: &serde_json::Value) -> InfraResult<()> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{text}").map_err(|e| InfraError::io("write json output", e))
}
