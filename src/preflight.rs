//! Startup preflight checks.
//!
//! Run after config resolution and before the first planner request, so a
//! typo in the planner URL or a missing shell surfaces as one actionable
//! message instead of a transport error mid-session.

use crate::config::Config;
use crate::exec::ShellSpec;
use crate::planner::Planner;
use crate::types::HealthStatus;
use std::env;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Validate everything that can be checked without the network.
pub fn validate_ready(config: &Config) -> Result<(), String> {
    validate_planner_url(&config.planner.base_url)?;
    validate_shell(&config.exec.shell_spec())?;
    Ok(())
}

/// Check that `base_url` is an absolute http(s) URL with a host.
pub fn validate_planner_url(base_url: &str) -> Result<reqwest::Url, String> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(
            "No planner URL configured. Set planner.base_url in pcdoctor.toml or PCDOCTOR_PLANNER_URL."
                .to_string(),
        );
    }

    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|err| format!("invalid planner URL `{trimmed}`: {err}"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(format!(
                "invalid planner URL `{trimmed}`: unsupported scheme `{other}` (expected http or https)"
            ));
        }
    }
    if parsed.host_str().is_none() {
        return Err(format!("invalid planner URL `{trimmed}`: missing host"));
    }
    if parsed.scheme() == "http" && !is_localhost_url(&parsed) {
        tracing::warn!(url = %trimmed, "planner URL is plain http on a non-local host");
    }
    Ok(parsed)
}

/// Check that the shell program can be found.
pub fn validate_shell(shell: &ShellSpec) -> Result<(), String> {
    let program = shell.program.trim();
    if program.is_empty() {
        return Err("exec.shell must not be empty".to_string());
    }
    if resolve_program(program).is_none() {
        return Err(format!(
            "shell `{program}` was not found. Set exec.shell in pcdoctor.toml or PCDOCTOR_SHELL."
        ));
    }
    Ok(())
}

/// Ask the planner whether it is up.
///
/// An unreachable planner is an error; a reachable one reporting anything
/// other than `online` is returned as-is so the caller can warn and go on.
pub async fn check_planner_health(planner: &dyn Planner) -> Result<HealthStatus, String> {
    planner
        .health()
        .await
        .map_err(|err| format!("planner is not reachable: {err}"))
}

fn is_localhost_url(url: &reqwest::Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok_and(|ip| ip.is_loopback())
}

/// Resolve `program` the way the OS would when spawning it: paths are used
/// as given, bare names are looked up on `PATH`.
fn resolve_program(program: &str) -> Option<PathBuf> {
    let as_path = Path::new(program);
    if as_path.components().count() > 1 {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }
    let search = env::var_os("PATH")?;
    env::split_paths(&search).find_map(|dir| {
        executable_candidates(program)
            .into_iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

#[cfg(windows)]
fn executable_candidates(program: &str) -> Vec<String> {
    if Path::new(program).extension().is_some() {
        return vec![program.to_string()];
    }
    vec![program.to_string(), format!("{program}.exe")]
}

#[cfg(not(windows))]
fn executable_candidates(program: &str) -> Vec<String> {
    vec![program.to_string()]
}
