//! One-shot mode: diagnose a single problem description and exit.
//!
//! Kept out of `app::entry::run` so the entrypoint only does setup and
//! dispatch.

use crate::app::approval::{self, Decision};
use crate::app::context::{render_outcome, App, Step};
use pcdoctor::types::LoopStatus;
use tokio::io::{AsyncBufRead, Lines};

/// Exit code once the planner declares the diagnosis done.
pub(crate) const EXIT_DONE: i32 = 0;
/// Exit code for local refusals and setup problems.
pub(crate) const EXIT_ERROR: i32 = 1;
/// Exit code when the loop stopped without a diagnosis.
pub(crate) const EXIT_UNFINISHED: i32 = 2;

/// Run `prompt` to a halt, asking on `input` for approvals unless
/// `auto_reject` is set.
pub(crate) async fn run_exec_mode<R>(
    app: &mut App<'_>,
    prompt: &str,
    auto_reject: bool,
    input: &mut Lines<R>,
) -> i32
where
    R: AsyncBufRead + Unpin,
{
    let mut step = app.send(prompt).await;
    while matches!(step, Step::Status(LoopStatus::Blocked)) {
        let Some(command) = app.controller.pending_proposal().map(|p| p.command.clone()) else {
            break;
        };
        let decision = if auto_reject {
            app.renderer
                .warn(&format!("--auto-reject: not running `{command}`"));
            Decision::Reject
        } else {
            match approval::ask_once(app, input).await {
                Some(decision) => decision,
                None => {
                    step = Step::Interrupted;
                    break;
                }
            }
        };
        step = approval::apply(app, decision).await;
        if decision == Decision::Reject {
            // The planner only hears about a rejection with the next message,
            // and nobody is here to type one.
            break;
        }
    }
    render_outcome(app, &step);
    exit_code(&step)
}

pub(crate) fn exit_code(step: &Step) -> i32 {
    match step {
        Step::Status(LoopStatus::Done) => EXIT_DONE,
        Step::Refused(_) => EXIT_ERROR,
        _ => EXIT_UNFINISHED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::context::tests::{app_with, canned, CannedPlanner};
    use crate::app::view::tests::RecordingSink;
    use pcdoctor::error::SessionError;
    use pcdoctor::types::Severity;
    use tokio::io::{AsyncBufReadExt, BufReader};

    fn no_input() -> Lines<BufReader<&'static [u8]>> {
        BufReader::new(&b""[..]).lines()
    }

    #[tokio::test]
    async fn finished_diagnosis_exits_zero() {
        let sink = RecordingSink::default();
        let mut app = app_with(
            &sink,
            CannedPlanner::new(vec![
                canned("Checking uptime", LoopStatus::Continue, 1, Some(("uptime", Severity::Low))),
                canned("Load is normal.", LoopStatus::Done, 2, None),
            ]),
        );

        let code = run_exec_mode(&mut app, "is it slow?", false, &mut no_input()).await;

        assert_eq!(code, EXIT_DONE);
        assert!(sink.saw("activity", "diagnosis finished"));
    }

    #[tokio::test]
    async fn auto_reject_never_runs_high_severity_commands() {
        let sink = RecordingSink::default();
        let mut app = app_with(
            &sink,
            CannedPlanner::new(vec![canned(
                "Reinstalling driver",
                LoopStatus::Continue,
                1,
                Some(("apt-get install --reinstall cups", Severity::High)),
            )]),
        );

        let code = run_exec_mode(&mut app, "printer", true, &mut no_input()).await;

        assert_eq!(code, EXIT_UNFINISHED);
        assert!(sink.saw("warn", "--auto-reject"));
        assert!(!sink.saw("run", "apt-get"));
        assert!(!sink.saw("approval_prompt", ""));
    }

    #[tokio::test]
    async fn approved_command_runs_and_loop_continues() {
        let sink = RecordingSink::default();
        let mut app = app_with(
            &sink,
            CannedPlanner::new(vec![
                canned("Flushing DNS", LoopStatus::Continue, 1, Some(("resolvectl flush-caches", Severity::High))),
                canned("Resolved.", LoopStatus::Done, 2, None),
            ]),
        );
        let mut input = BufReader::new(&b"y\n"[..]).lines();

        let code = run_exec_mode(&mut app, "dns broken", false, &mut input).await;

        assert_eq!(code, EXIT_DONE);
        assert!(sink.saw("run", "resolvectl flush-caches"));
    }

    #[test]
    fn exit_codes_follow_the_final_step() {
        assert_eq!(exit_code(&Step::Status(LoopStatus::Done)), EXIT_DONE);
        assert_eq!(exit_code(&Step::Status(LoopStatus::Blocked)), EXIT_UNFINISHED);
        assert_eq!(exit_code(&Step::Status(LoopStatus::Idle)), EXIT_UNFINISHED);
        assert_eq!(exit_code(&Step::Interrupted), EXIT_UNFINISHED);
        assert_eq!(
            exit_code(&Step::Refused(SessionError::NoPendingApproval)),
            EXIT_ERROR
        );
    }
}
