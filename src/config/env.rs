//! Environment overrides applied on top of the parsed file.

use crate::error::ConfigError;

use super::Config;

pub(super) const ENV_PLANNER_URL: &str = "PCDOCTOR_PLANNER_URL";
pub(super) const ENV_PLANNER_TIMEOUT: &str = "PCDOCTOR_PLANNER_TIMEOUT_SECS";
pub(super) const ENV_SHELL: &str = "PCDOCTOR_SHELL";
pub(super) const ENV_COMMAND_TIMEOUT: &str = "PCDOCTOR_COMMAND_TIMEOUT_SECS";

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(env_lookup(ENV_PLANNER_URL)) {
        config.planner.base_url = url;
    }
    if let Some(timeout) = non_empty(env_lookup(ENV_PLANNER_TIMEOUT)) {
        config.planner.timeout_secs = parse_secs(ENV_PLANNER_TIMEOUT, &timeout)?;
    }
    if let Some(shell) = non_empty(env_lookup(ENV_SHELL)) {
        // A new interpreter gets its own conventional arguments.
        config.exec.shell = Some(shell);
        config.exec.shell_args = None;
    }
    if let Some(timeout) = non_empty(env_lookup(ENV_COMMAND_TIMEOUT)) {
        config.exec.default_timeout_secs = parse_secs(ENV_COMMAND_TIMEOUT, &timeout)?;
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse whole seconds, clamped to at least 1 so "no timeout" cannot slip in.
fn parse_secs(name: &str, raw: &str) -> Result<u64, ConfigError> {
    let parsed = raw.parse::<u64>().map_err(|_| {
        ConfigError::Invalid(format!(
            "invalid {name} value `{raw}`: expected positive integer seconds"
        ))
    })?;
    Ok(parsed.max(1))
}
