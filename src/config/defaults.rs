//! Default configuration constants.

/// Embedded default `pcdoctor.toml` written on first run.
pub(super) const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../templates/pcdoctor.toml");
/// Config file name used for local and global lookups.
pub(super) const CONFIG_FILE_NAME: &str = "pcdoctor.toml";
/// Directory under the config root holding pcdoctor files.
pub(super) const CONFIG_DIR_NAME: &str = "pcdoctor";
pub(super) const DEFAULT_PLANNER_URL: &str = "http://127.0.0.1:8000";
/// Planner HTTP request timeout.
pub(super) const DEFAULT_PLANNER_TIMEOUT_SECS: u64 = 120;
/// Limit for proposals that carry no usable timeout.
pub(super) const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
pub(super) const DEFAULT_LOG_FILTER: &str = "warn";
