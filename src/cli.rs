//! CLI argument parsing via clap.

use clap::Parser;
use pcdoctor::build_info;
use std::path::PathBuf;

/// Diagnose this machine with a remote planner: it proposes shell commands,
/// pcdoctor runs them here and reports back until the problem is explained.
#[derive(Debug, Parser)]
#[command(
    name = "pcdoctor",
    version = build_info::VERSION,
    long_version = build_info::LONG_VERSION,
    after_help = build_info::HELP_BUILD_METADATA
)]
pub struct Args {
    /// Problem description. If provided, runs one diagnosis and exits.
    pub prompt: Option<String>,

    /// Path to config file (default: ./pcdoctor.toml or ~/.config/pcdoctor/pcdoctor.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Override the planner base URL.
    #[arg(long = "planner-url", value_name = "URL")]
    pub planner_url: Option<String>,

    /// Shell program used to run proposed commands.
    #[arg(long = "shell", value_name = "PROGRAM")]
    pub shell: Option<String>,

    /// Default command timeout in seconds, for proposals that carry none.
    #[arg(long = "timeout", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Show command output only after each command finishes.
    #[arg(long = "no-stream")]
    pub no_stream: bool,

    /// One-shot mode: reject every proposal that needs approval instead of asking.
    #[arg(long = "auto-reject")]
    pub auto_reject: bool,

    /// Write JSON transcripts to this directory (enables transcripts).
    #[arg(long = "transcript-dir", value_name = "DIR")]
    pub transcript_dir: Option<PathBuf>,

    /// Do not probe the planner before starting.
    #[arg(long = "skip-health-check")]
    pub skip_health_check: bool,

    /// Log debug diagnostics to stderr.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn prompt_and_overrides_parse() {
        let args = Args::parse_from([
            "pcdoctor",
            "--planner-url",
            "http://10.0.0.2:8000",
            "--timeout",
            "5",
            "--auto-reject",
            "-c",
            "/tmp/pc.toml",
            "my disk is full",
        ]);
        assert_eq!(args.prompt.as_deref(), Some("my disk is full"));
        assert_eq!(args.planner_url.as_deref(), Some("http://10.0.0.2:8000"));
        assert_eq!(args.timeout, Some(5));
        assert!(args.auto_reject);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/pc.toml")));
    }

    #[test]
    fn interactive_mode_has_no_prompt() {
        let args = Args::parse_from(["pcdoctor", "--no-color", "--no-stream", "-v"]);
        assert!(args.prompt.is_none());
        assert!(args.no_color && args.no_stream && args.verbose);
        assert!(!args.skip_health_check);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Args::try_parse_from(["pcdoctor", "--timeout", "0"]).is_err());
    }

    #[test]
    fn version_flag_is_handled_by_clap() {
        let err = Args::try_parse_from(["pcdoctor", "--version"]).expect_err("version exits");
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
