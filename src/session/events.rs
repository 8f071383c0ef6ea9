//! Ordered stream of session-level events for a UI.

use super::log::ChatMessage;
use crate::exec::{ExecutionResult, OutputEvent, OutputSink};
use crate::types::{CommandProposal, LoopStatus};
use tokio::sync::mpsc;

/// Everything an observer needs to render a session live.
///
/// Output chunks travel on the same channel as the transitions around them,
/// so a consumer sees `RunStarted`, the run's output, its final event, and
/// `RunFinished` in that order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A chat log entry was appended at `index`.
    ///
    /// Carries a snapshot so observers can render without borrowing the
    /// controller while it is still driving.
    Message { index: usize, message: ChatMessage },
    /// The proposal on entry `index` started executing.
    RunStarted { index: usize, command: String },
    Output(OutputEvent),
    RunFinished {
        index: usize,
        result: ExecutionResult,
    },
    /// Published after every planner round trip and local transition.
    Status {
        loop_status: LoopStatus,
        iteration_count: u32,
    },
    /// The proposal on entry `index` waits for approve/reject.
    ApprovalRequired {
        index: usize,
        proposal: CommandProposal,
    },
}

impl OutputSink for mpsc::UnboundedSender<SessionEvent> {
    fn emit(&self, event: OutputEvent) {
        let _ = self.send(SessionEvent::Output(event));
    }
}
