//! Approval decisions for pending proposals.

use crate::app::context::{App, Step};
use crate::app::input::{read_line, LineRead};
use pcdoctor::tui::parse_approval_answer;
use tokio::io::{AsyncBufRead, Lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Approve,
    Reject,
}

/// Apply `decision` to the pending proposal.
pub(crate) async fn apply(app: &mut App<'_>, decision: Decision) -> Step {
    match decision {
        Decision::Approve => app.approve().await,
        Decision::Reject => app.reject(),
    }
}

/// One-shot prompt: anything but an explicit yes rejects.
///
/// Returns `None` when the user interrupted instead of answering.
pub(crate) async fn ask_once<R>(app: &App<'_>, input: &mut Lines<R>) -> Option<Decision>
where
    R: AsyncBufRead + Unpin,
{
    app.renderer.approval_prompt();
    match read_line(input).await {
        LineRead::Line(line) => Some(match parse_approval_answer(&line) {
            Some(true) => Decision::Approve,
            _ => Decision::Reject,
        }),
        LineRead::Eof => Some(Decision::Reject),
        LineRead::Interrupted => None,
    }
}
