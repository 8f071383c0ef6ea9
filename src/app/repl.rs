//! Interactive prompt loop.

use crate::app::approval::{self, Decision};
use crate::app::context::{render_outcome, App};
use crate::app::input::{read_line, LineRead};
use pcdoctor::session::{ChatMessage, RunSlot, Sender};
use pcdoctor::tui::{
    parse_approval_answer, parse_slash_command, text, SlashCommandAction, SLASH_COMMANDS,
};
use tokio::io::{AsyncBufRead, Lines};

/// Width used when previewing long log entries.
const LOG_PREVIEW_CHARS: usize = 160;

/// Read lines from `input` until EOF, Ctrl-C at the prompt, or `/quit`.
pub(crate) async fn run_repl<R>(app: &mut App<'_>, input: &mut Lines<R>)
where
    R: AsyncBufRead + Unpin,
{
    loop {
        if app.controller.pending_proposal().is_some() {
            app.renderer.approval_prompt();
        } else {
            app.renderer.prompt();
        }

        let line = match read_line(input).await {
            LineRead::Line(line) => line,
            LineRead::Eof | LineRead::Interrupted => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if app.controller.pending_proposal().is_some() {
            if let Some(approved) = parse_approval_answer(trimmed) {
                let decision = if approved {
                    Decision::Approve
                } else {
                    Decision::Reject
                };
                let step = approval::apply(app, decision).await;
                render_outcome(app, &step);
                continue;
            }
        }

        if let Some(action) = parse_slash_command(trimmed) {
            if !handle_slash_command(app, action).await {
                break;
            }
            continue;
        }

        let step = app.send(trimmed).await;
        render_outcome(app, &step);
    }
    tracing::debug!("interactive loop finished");
}

/// Returns `false` when the loop should exit.
async fn handle_slash_command(app: &mut App<'_>, action: SlashCommandAction) -> bool {
    match action {
        SlashCommandAction::Approve => {
            let step = approval::apply(app, Decision::Approve).await;
            render_outcome(app, &step);
        }
        SlashCommandAction::Reject => {
            let step = approval::apply(app, Decision::Reject).await;
            render_outcome(app, &step);
        }
        SlashCommandAction::Status => render_status(app),
        SlashCommandAction::Log(count) => render_log(app, count),
        SlashCommandAction::New => {
            app.reset();
            app.renderer.activity("started a new session");
        }
        SlashCommandAction::Help => render_help(app),
        SlashCommandAction::Quit => return false,
        SlashCommandAction::Unknown(command) => {
            app.renderer
                .warn(&format!("unknown command `{command}`; try /help"));
        }
    }
    true
}

fn render_status(app: &App<'_>) {
    let renderer = app.renderer;
    let controller = &app.controller;
    renderer.section("status");
    renderer.field("planner", &app.planner_url);
    renderer.field("session", controller.session().id().unwrap_or("(none yet)"));
    renderer.field("loop", controller.loop_status().as_str());
    renderer.field("iterations", &controller.iteration_count().to_string());
    match controller.pending_proposal() {
        Some(proposal) => renderer.field(
            "pending",
            &format!("{} [{}]", proposal.command, proposal.severity),
        ),
        None => renderer.field("pending", "none"),
    }
    match app.transcript_dir() {
        Some(dir) => renderer.field("transcripts", &dir.display().to_string()),
        None => renderer.field("transcripts", "off"),
    }
}

fn render_log(app: &App<'_>, count: Option<usize>) {
    let entries = app.controller.log().entries();
    if entries.is_empty() {
        app.renderer.activity("the session log is empty");
        return;
    }
    let skip = count.map_or(0, |count| entries.len().saturating_sub(count));
    app.renderer.section("session log");
    for (index, message) in entries.iter().enumerate().skip(skip) {
        app.renderer.detail(&log_line(index, message));
        if let Some(proposal) = &message.proposal {
            app.renderer.detail(&format!(
                "    $ {} [{}]{}",
                text::truncate_single_line(&proposal.command, LOG_PREVIEW_CHARS),
                proposal.severity,
                proposal_state(message),
            ));
        }
    }
}

fn log_line(index: usize, message: &ChatMessage) -> String {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Agent if message.failure => "error",
        Sender::Agent => "planner",
    };
    format!(
        "{index:>3} {who}: {}",
        text::truncate_single_line(&message.text, LOG_PREVIEW_CHARS)
    )
}

fn proposal_state(message: &ChatMessage) -> String {
    if message.rejected {
        return " rejected".to_string();
    }
    if message.approval_pending {
        return " awaiting approval".to_string();
    }
    match &message.result {
        Some(RunSlot::InProgress) => " running".to_string(),
        Some(RunSlot::Done(result)) => format!(" {}", result.summary()),
        None => String::new(),
    }
}

fn render_help(app: &App<'_>) {
    app.renderer.section("commands");
    for command in SLASH_COMMANDS {
        app.renderer.field(command.name, command.description);
    }
    app.renderer
        .detail("answer y or n at the approval prompt; anything else is sent to the planner");
}
