//! Application entry orchestration for the pcdoctor CLI.

use crate::app::context::App;
use crate::app::exec_mode::{run_exec_mode, EXIT_ERROR};
use crate::app::repl::run_repl;
use crate::app::startup::{health_message, render_startup_banner};
use crate::app::transcripts::TranscriptWriter;
use crate::app::logging;
use crate::app::view::EventView;
use crate::cli::Args;
use pcdoctor::config::{
    default_transcript_dir, ensure_default_global_config, load_config, validate, Config,
};
use pcdoctor::exec::ProcessRunner;
use pcdoctor::planner::PlannerClient;
use pcdoctor::preflight::{check_planner_health, validate_ready};
use pcdoctor::session::SessionController;
use pcdoctor::tui::{set_progress_enabled, Renderer};
use tokio::io::{AsyncBufReadExt, BufReader};

pub(crate) async fn run(args: Args) -> i32 {
    // Entrypoint walkthrough:
    // 1) load config and apply CLI overrides,
    // 2) validate planner URL and shell, probe the planner,
    // 3) dispatch into one-shot mode or the interactive prompt.
    let bootstrap_renderer = Renderer::new(!args.no_color);
    let config = match load_config_state(&args) {
        Ok(config) => config,
        Err(msg) => {
            bootstrap_renderer.error(&msg);
            return EXIT_ERROR;
        }
    };

    logging::init(&config.logging.filter, args.verbose);
    let renderer = Renderer::new(config.display.color);
    set_progress_enabled(config.display.stream_output);

    if let Err(msg) = validate_ready(&config) {
        renderer.error(&msg);
        return EXIT_ERROR;
    }

    let shell = config.exec.shell_spec();
    let shell_display = shell.display();
    let planner = match PlannerClient::new(&config.planner.base_url, config.planner.timeout()) {
        Ok(planner) => planner,
        Err(err) => {
            renderer.error(&format!("failed to set up the planner client: {err}"));
            return EXIT_ERROR;
        }
    };
    let planner_url = planner.base_url().to_string();

    let interactive = args.prompt.is_none();
    if interactive {
        render_startup_banner(
            config.display.color,
            &planner_url,
            &shell_display,
            transcript_dir(&config).as_deref(),
        );
    }
    if !args.skip_health_check {
        let health = check_planner_health(&planner).await;
        let line = health_message(&health);
        match &health {
            Ok(status) if status.is_online() => {
                tracing::info!(service = %status.service, "planner online");
                if interactive {
                    renderer.activity(&line);
                }
            }
            _ => renderer.warn(&line),
        }
    }

    let controller = SessionController::new(
        Box::new(planner),
        Box::new(ProcessRunner::new(shell.clone())),
        config.exec.default_timeout(),
    );
    let transcripts = match transcript_dir(&config) {
        Some(dir) => TranscriptWriter::open(&dir, &renderer),
        None => TranscriptWriter::disabled(),
    };
    let view = EventView::new(&renderer, config.display.stream_output, shell.program.clone());
    let mut app = App::new(&renderer, controller, view, transcripts, planner_url);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    match args.prompt.as_deref() {
        Some(prompt) => run_exec_mode(&mut app, prompt, args.auto_reject, &mut input).await,
        None => {
            run_repl(&mut app, &mut input).await;
            0
        }
    }
}

/// Load config and apply CLI overrides on top of it.
fn load_config_state(args: &Args) -> Result<Config, String> {
    if let Err(err) = ensure_default_global_config() {
        eprintln!("warning: failed to initialize ~/.config/pcdoctor/pcdoctor.toml: {err}");
    }

    let loaded = load_config(args.config.as_deref()).map_err(|err| err.to_string())?;
    let mut config = loaded.config;
    apply_cli_overrides(args, &mut config);
    validate(&config).map_err(|err| err.to_string())?;
    if let Some(source) = &loaded.source {
        tracing::debug!(path = %source.display(), "loaded config");
    }
    Ok(config)
}

/// Apply CLI runtime overrides that intentionally outrank config files.
fn apply_cli_overrides(args: &Args, config: &mut Config) {
    if let Some(url) = &args.planner_url {
        config.planner.base_url = url.clone();
    }
    if let Some(shell) = &args.shell {
        config.exec.shell = Some(shell.clone());
        // Arguments configured for another interpreter would not fit.
        config.exec.shell_args = None;
    }
    if let Some(secs) = args.timeout {
        config.exec.default_timeout_secs = secs;
    }
    if args.no_color {
        config.display.color = false;
    }
    if args.no_stream {
        config.display.stream_output = false;
    }
    if let Some(dir) = &args.transcript_dir {
        config.transcripts.enabled = true;
        config.transcripts.dir = Some(dir.clone());
    }
}

/// Transcript directory when transcripts are on.
fn transcript_dir(config: &Config) -> Option<std::path::PathBuf> {
    if !config.transcripts.enabled {
        return None;
    }
    config.transcripts.dir.clone().or_else(default_transcript_dir)
}
