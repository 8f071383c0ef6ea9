//! Top-level config loading pipeline.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::env::apply_env_overrides;
use super::init::config_root_dir;
use super::sources::read_config_text_with_sources;
use super::{Config, LoadedConfig};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from `--config`).
pub fn load_config(path_override: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(super) fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&Path>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&text)?;
    apply_env_overrides(&mut config, &env_lookup)?;
    validate(&config)?;
    tracing::debug!(source = ?source.path(), "configuration loaded");
    Ok(LoadedConfig {
        config,
        source: source.path().map(Path::to_path_buf),
    })
}

/// Reject values that would make the runtime misbehave.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.planner.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("planner.base_url must not be empty".into()));
    }
    if config.planner.timeout_secs == 0 {
        return Err(ConfigError::Invalid("planner.timeout_secs must be at least 1".into()));
    }
    if config.exec.default_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "exec.default_timeout_secs must be at least 1".into(),
        ));
    }
    if config
        .exec
        .shell
        .as_deref()
        .is_some_and(|shell| shell.trim().is_empty())
    {
        return Err(ConfigError::Invalid("exec.shell must not be empty".into()));
    }
    Ok(())
}
