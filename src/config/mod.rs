//! Configuration loading from TOML files and environment variables.
//!
//! Precedence (highest wins):
//! 1. CLI flags (applied by the binary)
//! 2. Environment variables (`PCDOCTOR_PLANNER_URL`,
//!    `PCDOCTOR_PLANNER_TIMEOUT_SECS`, `PCDOCTOR_SHELL`,
//!    `PCDOCTOR_COMMAND_TIMEOUT_SECS`)
//! 3. TOML file given via `--config`
//! 4. `./pcdoctor.toml`
//! 5. `$XDG_CONFIG_HOME/pcdoctor/pcdoctor.toml` (or `~/.config/...`)
//! 6. Built-in defaults

mod defaults;
mod env;
mod init;
mod loader;
mod sources;
mod types;

pub use init::{
    config_root_dir, default_global_config_path, default_transcript_dir,
    ensure_default_global_config,
};
pub use loader::{load_config, validate};
pub use types::{
    Config, DisplayConfig, ExecConfig, LoadedConfig, LoggingConfig, PlannerConfig,
    TranscriptConfig,
};

#[cfg(test)]
mod tests {
    use super::defaults::DEFAULT_CONFIG_TEMPLATE;
    use super::init::ensure_default_config_at_path;
    use super::loader::load_config_from_sources;
    use super::*;
    use crate::error::ConfigError;
    use crate::exec::ShellSpec;
    use crate::testsupport::TestTempDir;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn load_with(
        files: &[(&str, &str)],
        env: &[(&str, &str)],
        path_override: Option<&str>,
    ) -> Result<LoadedConfig, ConfigError> {
        let files: HashMap<PathBuf, String> = files
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect();
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_config_from_sources(
            path_override.map(Path::new),
            |path| {
                files.get(path).cloned().ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::NotFound, "missing")
                })
            },
            |name| env.get(name).cloned(),
            || Some(PathBuf::from("/cfg")),
        )
    }

    #[test]
    fn defaults_when_no_file_exists() {
        let loaded = load_with(&[], &[], None).unwrap();
        assert_eq!(loaded.source, None);
        let config = loaded.config;
        assert_eq!(config.planner.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.planner.timeout(), Duration::from_secs(120));
        assert_eq!(config.exec.default_timeout(), Duration::from_secs(30));
        assert_eq!(config.exec.shell_spec(), ShellSpec::platform_default());
        assert_eq!(config.logging.filter, "warn");
        assert!(config.display.stream_output);
        assert!(!config.transcripts.enabled);
    }

    #[test]
    fn bundled_template_parses_to_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn local_file_beats_global_file() {
        let loaded = load_with(
            &[
                ("pcdoctor.toml", "[planner]\nbase_url = \"http://local:1\"\n"),
                (
                    "/cfg/pcdoctor/pcdoctor.toml",
                    "[planner]\nbase_url = \"http://global:1\"\n",
                ),
            ],
            &[],
            None,
        )
        .unwrap();
        assert_eq!(loaded.config.planner.base_url, "http://local:1");
        assert_eq!(loaded.source, Some(PathBuf::from("pcdoctor.toml")));
    }

    #[test]
    fn global_file_is_used_when_local_is_missing() {
        let loaded = load_with(
            &[(
                "/cfg/pcdoctor/pcdoctor.toml",
                "[exec]\ndefault_timeout_secs = 45\n",
            )],
            &[],
            None,
        )
        .unwrap();
        assert_eq!(loaded.config.exec.default_timeout_secs, 45);
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_with(&[], &[], Some("/nope.toml")).unwrap_err();
        assert!(err.to_string().contains("/nope.toml"), "{err}");
    }

    #[test]
    fn env_overrides_file_values() {
        let loaded = load_with(
            &[("custom.toml", "[planner]\nbase_url = \"http://file:1\"\n")],
            &[
                ("PCDOCTOR_PLANNER_URL", "http://env:2"),
                ("PCDOCTOR_COMMAND_TIMEOUT_SECS", "0"),
                ("PCDOCTOR_SHELL", "bash"),
            ],
            Some("custom.toml"),
        )
        .unwrap();
        let config = loaded.config;
        assert_eq!(config.planner.base_url, "http://env:2");
        // Clamped so a zero cannot disable the limit.
        assert_eq!(config.exec.default_timeout_secs, 1);
        assert_eq!(
            config.exec.shell_spec(),
            ShellSpec::new("bash", vec!["-c".into()])
        );
    }

    #[test]
    fn invalid_env_timeout_is_reported() {
        let err = load_with(&[], &[("PCDOCTOR_PLANNER_TIMEOUT_SECS", "soon")], None).unwrap_err();
        assert!(err.to_string().contains("PCDOCTOR_PLANNER_TIMEOUT_SECS"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = load_with(
            &[("pcdoctor.toml", "[planner]\nbase_uri = \"http://x\"\n")],
            &[],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)), "{err}");
    }

    #[test]
    fn zero_timeout_in_file_is_invalid() {
        let err = load_with(
            &[("pcdoctor.toml", "[exec]\ndefault_timeout_secs = 0\n")],
            &[],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn shell_args_follow_the_interpreter() {
        let exec = ExecConfig {
            shell: Some("pwsh".into()),
            ..ExecConfig::default()
        };
        assert_eq!(exec.shell_spec().args, vec!["-NoProfile", "-Command"]);

        let exec = ExecConfig {
            shell: Some("/bin/zsh".into()),
            shell_args: Some(vec!["-lc".into()]),
            ..ExecConfig::default()
        };
        assert_eq!(exec.shell_spec(), ShellSpec::new("/bin/zsh", vec!["-lc".into()]));
    }

    #[test]
    fn first_run_writes_template_once() {
        let tmp = TestTempDir::new("config-init");
        let path = tmp.child("pcdoctor/pcdoctor.toml");
        assert!(ensure_default_config_at_path(&path).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            DEFAULT_CONFIG_TEMPLATE
        );

        std::fs::write(&path, "# edited\n").unwrap();
        assert!(!ensure_default_config_at_path(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited\n");
    }
}
