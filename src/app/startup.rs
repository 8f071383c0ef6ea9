//! Startup banner and planner health lines.

use crossterm::style::{Color, Stylize};
use pcdoctor::build_info;
use pcdoctor::types::HealthStatus;

/// Plain text of the first banner line.
pub(crate) fn banner_message(planner_url: &str, shell: &str) -> String {
    format!("pcdoctor talking to {planner_url} via {shell}")
}

/// One-line summary of a health probe.
pub(crate) fn health_message(health: &Result<HealthStatus, String>) -> String {
    match health {
        Ok(status) if status.is_online() => format!("planner online ({})", status.service),
        Ok(status) => format!("planner reports status \"{}\"", status.status),
        Err(err) => format!("planner unreachable: {err}"),
    }
}

/// Render the interactive banner to stderr.
pub(crate) fn render_startup_banner(
    color: bool,
    planner_url: &str,
    shell: &str,
    transcripts: Option<&std::path::Path>,
) {
    if color {
        eprintln!(
            "{} {} talking to {} via {}",
            "•".with(Color::DarkGrey),
            "pcdoctor".with(Color::Green).bold(),
            planner_url.with(Color::White).bold(),
            shell.with(Color::Yellow).bold(),
        );
        eprintln!(
            "  {}",
            build_info::startup_metadata_line().with(Color::DarkGrey)
        );
    } else {
        eprintln!("• {}", banner_message(planner_url, shell));
        eprintln!("  {}", build_info::startup_metadata_line());
    }
    if let Some(dir) = transcripts {
        eprintln!("  transcripts: {}", dir.display());
    }
    eprintln!("  type /help for commands");
    eprintln!();
}
