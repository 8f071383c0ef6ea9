//! Configuration data model.
//!
//! The file format maps one-to-one onto these structs; unknown keys are
//! rejected so typos surface at startup.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::{
    DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_LOG_FILTER, DEFAULT_PLANNER_TIMEOUT_SECS,
    DEFAULT_PLANNER_URL,
};
use crate::exec::ShellSpec;

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub planner: PlannerConfig,
    pub exec: ExecConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
    pub transcripts: TranscriptConfig,
}

/// Where and how to reach the planner service.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PLANNER_URL.to_string(),
            timeout_secs: DEFAULT_PLANNER_TIMEOUT_SECS,
        }
    }
}

impl PlannerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Command execution settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ExecConfig {
    /// Interpreter program; `None` selects the platform default.
    pub shell: Option<String>,
    /// Arguments placed before the command line. `None` keeps the default
    /// for the chosen interpreter.
    pub shell_args: Option<Vec<String>>,
    pub default_timeout_secs: u64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            shell: None,
            shell_args: None,
            default_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

impl ExecConfig {
    /// Resolve the interpreter used by the process runner.
    pub fn shell_spec(&self) -> ShellSpec {
        let platform = ShellSpec::platform_default();
        let program = self
            .shell
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        match (program, &self.shell_args) {
            (None, None) => platform,
            (None, Some(args)) => ShellSpec::new(platform.program, args.clone()),
            (Some(program), Some(args)) => ShellSpec::new(program, args.clone()),
            (Some(program), None) => ShellSpec::new(program, default_args_for(program)),
        }
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}

/// Conventional "run this string" flag for well-known interpreters.
fn default_args_for(program: &str) -> Vec<String> {
    let name = std::path::Path::new(program)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match name.as_str() {
        "powershell" | "pwsh" => vec!["-NoProfile".into(), "-Command".into()],
        "cmd" => vec!["/C".into()],
        _ => vec!["-c".into()],
    }
}

/// Display / rendering preferences.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub color: bool,
    /// Print command output live as it arrives.
    pub stream_output: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            stream_output: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when no env filter is set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Session transcript persistence.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TranscriptConfig {
    pub enabled: bool,
    /// Output directory; defaults to `<config root>/pcdoctor/transcripts`.
    pub dir: Option<PathBuf>,
}

/// Loaded config plus the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when built-in defaults were used.
    pub source: Option<PathBuf>,
}
