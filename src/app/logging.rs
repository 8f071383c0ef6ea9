//! Diagnostic tracing setup.
//!
//! Tracing is for debugging pcdoctor itself and always goes to stderr. It is
//! separate from transcripts, which are product output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable with the highest filter precedence.
pub(crate) const LOG_ENV: &str = "PCDOCTOR_LOG";

/// Install the global subscriber. Safe to call more than once.
pub(crate) fn init(config_filter: &str, verbose: bool) {
    let directives = resolve_filter(
        std::env::var(LOG_ENV).ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
        config_filter,
        verbose,
    );
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("warning: ignoring log filter `{directives}`: {err}");
        EnvFilter::new("warn")
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

/// `PCDOCTOR_LOG`, then `RUST_LOG`, then `--verbose`, then the config value.
fn resolve_filter(
    pcdoctor_log: Option<&str>,
    rust_log: Option<&str>,
    config_filter: &str,
    verbose: bool,
) -> String {
    let from_env = [pcdoctor_log, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty());
    if let Some(value) = from_env {
        return value.to_string();
    }
    if verbose {
        return "debug".to_string();
    }
    match config_filter.trim() {
        "" => "warn".to_string(),
        value => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_beats_verbose_and_config() {
        assert_eq!(
            resolve_filter(Some("pcdoctor=trace"), Some("info"), "warn", true),
            "pcdoctor=trace"
        );
        assert_eq!(resolve_filter(None, Some("info"), "warn", true), "info");
        assert_eq!(resolve_filter(Some("  "), None, "error", false), "error");
    }

    #[test]
    fn verbose_raises_the_config_filter() {
        assert_eq!(resolve_filter(None, None, "warn", true), "debug");
        assert_eq!(resolve_filter(None, None, "", false), "warn");
    }
}
