//! Session iteration controller: the proposal / execute / report loop.

use super::events::SessionEvent;
use super::log::{ChatLog, ChatMessage};
use super::state::Session;
use crate::error::{PlannerError, SessionError};
use crate::exec::{CommandRunner, ExecutionResult, NullSink};
use crate::planner::Planner;
use crate::types::{AgentResponse, ChatRequest, CommandProposal, IterateRequest, LoopStatus};
use std::time::Duration;
use tokio::sync::mpsc;

/// A high-severity (or planner-blocked) proposal waiting for a human.
#[derive(Debug, Clone)]
struct PendingApproval {
    index: usize,
    proposal: CommandProposal,
}

/// Drives one planner session.
///
/// All state mutation happens through `&mut self`, so approval handling and
/// autonomous continuation can never interleave.
pub struct SessionController {
    planner: Box<dyn Planner>,
    runner: Box<dyn CommandRunner>,
    session: Session,
    log: ChatLog,
    pending: Option<PendingApproval>,
    default_timeout: Duration,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl SessionController {
    /// `default_timeout` applies to proposals that omit a usable timeout.
    pub fn new(
        planner: Box<dyn Planner>,
        runner: Box<dyn CommandRunner>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            planner,
            runner,
            session: Session::default(),
            log: ChatLog::new(),
            pending: None,
            default_timeout,
            events: None,
        }
    }

    /// Publish [`SessionEvent`]s (including live command output) to `sink`.
    pub fn with_events(mut self, sink: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn set_event_sink(&mut self, sink: Option<mpsc::UnboundedSender<SessionEvent>>) {
        self.events = sink;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn loop_status(&self) -> LoopStatus {
        self.session.loop_status()
    }

    pub fn iteration_count(&self) -> u32 {
        self.session.iteration_count()
    }

    /// Proposal awaiting approve/reject, if any.
    pub fn pending_proposal(&self) -> Option<&CommandProposal> {
        self.pending.as_ref().map(|pending| &pending.proposal)
    }

    /// Drop the session and its log; the next message starts a new planner
    /// conversation.
    pub fn reset(&mut self) {
        self.session = Session::default();
        self.log = ChatLog::new();
        self.pending = None;
        tracing::info!("session reset");
        self.publish_status();
    }

    /// Send a top-level user message and drive the loop until it halts.
    ///
    /// Fails only on a precondition: a proposal still awaits a decision.
    /// Planner failures are reported in the log and leave the loop `blocked`.
    pub async fn send_message(&mut self, text: &str) -> Result<LoopStatus, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::ApprovalPending);
        }
        self.append(ChatMessage::user(text));
        self.set_status(LoopStatus::Idle);

        let request = ChatRequest {
            message: text.to_string(),
            session_id: self.session.id().map(str::to_string),
        };
        match self.planner.chat(&request).await {
            Ok(response) => self.drive(response).await,
            Err(err) => Ok(self.transport_failure(err)),
        }
    }

    /// Execute the pending proposal, report it, and keep driving.
    pub async fn approve(&mut self) -> Result<LoopStatus, SessionError> {
        let pending = self.pending.take().ok_or(SessionError::NoPendingApproval)?;
        tracing::info!(command = %pending.proposal.command, "proposal approved");
        self.set_status(LoopStatus::Continue);
        match self.execute_and_report(pending.index, &pending.proposal).await? {
            Some(next) => self.drive(next).await,
            None => Ok(self.loop_status()),
        }
    }

    /// Decline the pending proposal. Nothing runs and the planner is not
    /// contacted; the loop stays `blocked` until the next user message.
    pub fn reject(&mut self) -> Result<LoopStatus, SessionError> {
        let pending = self.pending.take().ok_or(SessionError::NoPendingApproval)?;
        self.log.reject(pending.index)?;
        tracing::info!(command = %pending.proposal.command, "proposal rejected");
        Ok(self.set_status(LoopStatus::Blocked))
    }

    /// Apply planner replies until one halts the loop.
    async fn drive(&mut self, mut response: AgentResponse) -> Result<LoopStatus, SessionError> {
        loop {
            self.session.absorb(&response);
            let proposal = response.proposal.take();
            let index = self.append(ChatMessage {
                proposal: proposal.clone(),
                iteration: Some(response.iteration_count),
                loop_status: Some(response.loop_status),
                blocker_reason: response.blocker_reason.take(),
                ..ChatMessage::agent(std::mem::take(&mut response.message))
            });

            let proposal = match (response.loop_status, proposal) {
                (LoopStatus::Done, _) => return Ok(self.set_status(LoopStatus::Done)),
                (LoopStatus::Blocked, Some(proposal)) => {
                    return self.await_approval(index, proposal);
                }
                (LoopStatus::Blocked, None) => return Ok(self.set_status(LoopStatus::Blocked)),
                // Any planner reply moves the loop out of `idle`.
                (LoopStatus::Idle | LoopStatus::Continue, None) => {
                    return Ok(self.set_status(LoopStatus::Continue));
                }
                (_, Some(proposal)) if proposal.severity.requires_approval() => {
                    return self.await_approval(index, proposal);
                }
                (_, Some(proposal)) => proposal,
            };

            self.set_status(LoopStatus::Continue);
            match self.execute_and_report(index, &proposal).await? {
                Some(next) => response = next,
                None => return Ok(self.loop_status()),
            }
        }
    }

    fn await_approval(
        &mut self,
        index: usize,
        proposal: CommandProposal,
    ) -> Result<LoopStatus, SessionError> {
        self.log.mark_pending(index)?;
        tracing::info!(
            command = %proposal.command,
            severity = %proposal.severity,
            "proposal awaiting approval"
        );
        self.pending = Some(PendingApproval {
            index,
            proposal: proposal.clone(),
        });
        let status = self.set_status(LoopStatus::Blocked);
        self.publish(SessionEvent::ApprovalRequired { index, proposal });
        Ok(status)
    }

    /// Run the proposal on entry `index` and send the report.
    ///
    /// Returns the planner's next reply, or `None` when the report could not
    /// be delivered (the loop is then already `blocked`).
    async fn execute_and_report(
        &mut self,
        index: usize,
        proposal: &CommandProposal,
    ) -> Result<Option<AgentResponse>, SessionError> {
        let timeout = proposal.effective_timeout(self.default_timeout);
        self.log.begin_run(index)?;
        self.publish(SessionEvent::RunStarted {
            index,
            command: proposal.command.clone(),
        });

        let result = match &self.events {
            Some(sink) => self.runner.run(&proposal.command, timeout, sink).await,
            None => self.runner.run(&proposal.command, timeout, &NullSink).await,
        };
        tracing::info!(
            run_id = result.run_id(),
            outcome = %result.summary(),
            "command finished"
        );
        self.log.finish_run(index, result.clone())?;
        self.publish(SessionEvent::RunFinished {
            index,
            result: result.clone(),
        });

        let Some(session_id) = self.session.id() else {
            self.transport_failure(PlannerError::MissingSession);
            return Ok(None);
        };
        let request = report_for(session_id, &proposal.command, &result);
        match self.planner.iterate(&request).await {
            Ok(mut next) => {
                // A shell that cannot start will not start next time either.
                if result.is_launch_failure() && next.loop_status != LoopStatus::Done {
                    next.loop_status = LoopStatus::Blocked;
                }
                Ok(Some(next))
            }
            Err(err) => {
                self.transport_failure(err);
                Ok(None)
            }
        }
    }

    fn transport_failure(&mut self, err: PlannerError) -> LoopStatus {
        tracing::warn!(error = %err, "planner request failed");
        self.append(ChatMessage::failure(format!(
            "Lost contact with the planner: {err}"
        )));
        self.set_status(LoopStatus::Blocked)
    }

    fn append(&mut self, message: ChatMessage) -> usize {
        let snapshot = self.events.is_some().then(|| message.clone());
        let index = self.log.push(message);
        if let Some(message) = snapshot {
            self.publish(SessionEvent::Message { index, message });
        }
        index
    }

    fn set_status(&mut self, status: LoopStatus) -> LoopStatus {
        if self.session.loop_status() != status {
            tracing::debug!(from = %self.session.loop_status(), to = %status, "loop status");
        }
        self.session.set_status(status);
        self.publish_status();
        status
    }

    fn publish_status(&self) {
        self.publish(SessionEvent::Status {
            loop_status: self.session.loop_status(),
            iteration_count: self.session.iteration_count(),
        });
    }

    fn publish(&self, event: SessionEvent) {
        if let Some(sink) = &self.events {
            let _ = sink.send(event);
        }
    }
}

fn report_for(session_id: &str, command: &str, result: &ExecutionResult) -> IterateRequest {
    IterateRequest {
        session_id: session_id.to_string(),
        command: command.to_string(),
        output: result.output().to_string(),
        error: result.error_text().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::log::Sender;
    use crate::testsupport::{
        proposal, reply, PlannerCall, RecordingRunner, ScriptedPlanner,
    };
    use crate::types::Severity;
    use std::sync::Arc;

    const DEFAULT: Duration = Duration::from_secs(30);

    fn controller(
        planner: &Arc<ScriptedPlanner>,
        runner: &RecordingRunner,
    ) -> SessionController {
        SessionController::new(
            Box::new(Arc::clone(planner)),
            Box::new(runner.clone()),
            DEFAULT,
        )
    }

    fn iterate_calls(planner: &ScriptedPlanner) -> Vec<IterateRequest> {
        planner
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                PlannerCall::Iterate(request) => Some(request),
                PlannerCall::Chat(_) => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn low_severity_runs_without_approval_until_done() {
        let planner = Arc::new(ScriptedPlanner::new(vec![
            Ok(reply(
                "Checking disk",
                LoopStatus::Continue,
                1,
                Some(proposal("df -h", Severity::Low, Some(10))),
            )),
            Ok(reply("Disk usage is normal.", LoopStatus::Done, 2, None)),
        ]));
        let runner = RecordingRunner::with_output("Filesystem 10%\n");
        let mut ctl = controller(&planner, &runner);

        let status = ctl.send_message("disk full?").await.unwrap();

        assert_eq!(status, LoopStatus::Done);
        assert_eq!(ctl.iteration_count(), 2);
        assert_eq!(ctl.session().id(), Some("sess-1"));
        assert_eq!(
            runner.commands(),
            vec![("df -h".to_string(), Duration::from_secs(10))]
        );

        let reports = iterate_calls(&planner);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].session_id, "sess-1");
        assert_eq!(reports[0].output, "Filesystem 10%\n");
        assert_eq!(reports[0].error, None);

        let last = ctl.log().last().unwrap();
        assert_eq!(last.text, "Disk usage is normal.");
        assert_eq!(last.loop_status, Some(LoopStatus::Done));
        let ran = &ctl.log().entries()[1];
        assert!(ran.execution().is_some_and(ExecutionResult::is_success));
    }

    #[tokio::test]
    async fn high_severity_waits_and_never_runs_before_approval() {
        let planner = Arc::new(ScriptedPlanner::new(vec![Ok(reply(
            "Need to restart",
            LoopStatus::Continue,
            1,
            Some(proposal("systemctl restart nginx", Severity::High, None)),
        ))]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        let status = ctl.send_message("nginx down").await.unwrap();

        assert_eq!(status, LoopStatus::Blocked);
        assert!(runner.commands().is_empty());
        assert_eq!(
            ctl.pending_proposal().map(|p| p.command.as_str()),
            Some("systemctl restart nginx")
        );
        assert!(ctl.log().last().unwrap().approval_pending);
        assert_eq!(
            ctl.send_message("again").await,
            Err(SessionError::ApprovalPending)
        );
    }

    #[tokio::test]
    async fn approval_executes_with_default_timeout_and_resumes() {
        let planner = Arc::new(ScriptedPlanner::new(vec![
            Ok(reply(
                "Need to restart",
                LoopStatus::Continue,
                1,
                Some(proposal("systemctl restart nginx", Severity::High, None)),
            )),
            Ok(reply(
                "Restarted; verifying",
                LoopStatus::Continue,
                2,
                Some(proposal("systemctl is-active nginx", Severity::Low, Some(0))),
            )),
            Ok(reply("nginx is healthy", LoopStatus::Done, 3, None)),
        ]));
        let runner = RecordingRunner::with_output("active\n");
        let mut ctl = controller(&planner, &runner);

        ctl.send_message("nginx down").await.unwrap();
        let status = ctl.approve().await.unwrap();

        assert_eq!(status, LoopStatus::Done);
        assert_eq!(ctl.iteration_count(), 3);
        assert!(ctl.pending_proposal().is_none());
        assert_eq!(
            runner.commands(),
            vec![
                ("systemctl restart nginx".to_string(), DEFAULT),
                ("systemctl is-active nginx".to_string(), DEFAULT),
            ]
        );
        assert_eq!(iterate_calls(&planner).len(), 2);
    }

    #[tokio::test]
    async fn rejection_leaves_result_unset_and_contacts_no_one() {
        let planner = Arc::new(ScriptedPlanner::new(vec![Ok(reply(
            "Wipe the cache?",
            LoopStatus::Continue,
            1,
            Some(proposal("rm -rf ~/.cache", Severity::High, None)),
        ))]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        ctl.send_message("low on space").await.unwrap();
        let calls_before = planner.calls().len();
        let status = ctl.reject().unwrap();

        assert_eq!(status, LoopStatus::Blocked);
        assert_eq!(planner.calls().len(), calls_before);
        assert!(runner.commands().is_empty());
        let entry = ctl.log().last().unwrap();
        assert!(entry.rejected);
        assert!(entry.result.is_none());
        assert_eq!(ctl.reject(), Err(SessionError::NoPendingApproval));
        assert_eq!(ctl.loop_status(), LoopStatus::Blocked);
    }

    #[tokio::test]
    async fn new_message_after_reject_restarts_with_fixed_session_id() {
        let planner = Arc::new(ScriptedPlanner::new(vec![
            Ok(reply(
                "Reboot?",
                LoopStatus::Continue,
                1,
                Some(proposal("reboot", Severity::High, None)),
            )),
            Ok(reply("Okay, something else then.", LoopStatus::Done, 1, None)),
        ]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        ctl.send_message("slow machine").await.unwrap();
        ctl.reject().unwrap();
        let status = ctl.send_message("don't reboot").await.unwrap();

        assert_eq!(status, LoopStatus::Done);
        let calls = planner.calls();
        assert_eq!(
            calls[1],
            PlannerCall::Chat(ChatRequest {
                message: "don't reboot".into(),
                session_id: Some("sess-1".into()),
            })
        );
    }

    #[tokio::test]
    async fn iteration_count_comes_from_planner_only() {
        let planner = Arc::new(ScriptedPlanner::new(vec![
            Ok(reply(
                "one",
                LoopStatus::Continue,
                7,
                Some(proposal("true", Severity::Low, None)),
            )),
            Ok(reply(
                "two",
                LoopStatus::Continue,
                7,
                Some(proposal("true", Severity::Low, None)),
            )),
            Ok(reply("three", LoopStatus::Done, 4, None)),
        ]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        ctl.send_message("go").await.unwrap();
        assert_eq!(runner.commands().len(), 2);
        assert_eq!(ctl.iteration_count(), 4);
    }

    #[tokio::test]
    async fn chat_transport_failure_blocks_with_message() {
        let planner = Arc::new(ScriptedPlanner::new(vec![Err(PlannerError::Status {
            code: 502,
            body: "bad gateway".into(),
        })]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        let status = ctl.send_message("hello").await.unwrap();

        assert_eq!(status, LoopStatus::Blocked);
        let last = ctl.log().last().unwrap();
        assert!(last.failure);
        assert!(last.text.contains("502"));
        assert_eq!(planner.calls().len(), 1);
    }

    #[tokio::test]
    async fn iterate_failure_blocks_without_retry() {
        let planner = Arc::new(ScriptedPlanner::new(vec![
            Ok(reply(
                "Looking",
                LoopStatus::Continue,
                1,
                Some(proposal("uptime", Severity::Low, None)),
            )),
            Err(PlannerError::InvalidResponse("garbage".into())),
        ]));
        let runner = RecordingRunner::with_output("up 3 days");
        let mut ctl = controller(&planner, &runner);

        let status = ctl.send_message("how long up?").await.unwrap();

        assert_eq!(status, LoopStatus::Blocked);
        assert_eq!(planner.calls().len(), 2);
        assert!(ctl.log().last().unwrap().failure);
        // The run result stays attached even though the report failed.
        assert!(ctl.log().entries()[1].execution().is_some());
    }

    #[tokio::test]
    async fn missing_session_id_is_a_transport_failure() {
        let mut first = reply(
            "Looking",
            LoopStatus::Continue,
            1,
            Some(proposal("uptime", Severity::Low, None)),
        );
        first.session_id = None;
        let planner = Arc::new(ScriptedPlanner::new(vec![Ok(first)]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        let status = ctl.send_message("hi").await.unwrap();

        assert_eq!(status, LoopStatus::Blocked);
        assert_eq!(runner.commands().len(), 1);
        assert!(iterate_calls(&planner).is_empty());
        assert!(ctl.log().last().unwrap().text.contains("session id"));
    }

    #[tokio::test]
    async fn planner_blocked_with_proposal_requires_approval_even_when_low() {
        let mut blocked = reply(
            "I need you to confirm",
            LoopStatus::Blocked,
            2,
            Some(proposal("ls /", Severity::Low, None)),
        );
        blocked.blocker_reason = Some("ambiguous target".into());
        let planner = Arc::new(ScriptedPlanner::new(vec![Ok(blocked)]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        let status = ctl.send_message("list").await.unwrap();

        assert_eq!(status, LoopStatus::Blocked);
        assert!(runner.commands().is_empty());
        assert!(ctl.pending_proposal().is_some());
        assert_eq!(
            ctl.log().last().unwrap().blocker_reason.as_deref(),
            Some("ambiguous target")
        );
    }

    #[tokio::test]
    async fn done_ignores_trailing_proposal() {
        let planner = Arc::new(ScriptedPlanner::new(vec![Ok(reply(
            "All good",
            LoopStatus::Done,
            1,
            Some(proposal("echo extra", Severity::Low, None)),
        ))]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        assert_eq!(ctl.send_message("check").await.unwrap(), LoopStatus::Done);
        assert!(runner.commands().is_empty());
        assert!(ctl.pending_proposal().is_none());
    }

    #[tokio::test]
    async fn continue_without_proposal_stops_driving() {
        let planner = Arc::new(ScriptedPlanner::new(vec![Ok(reply(
            "Tell me more",
            LoopStatus::Continue,
            0,
            None,
        ))]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        assert_eq!(
            ctl.send_message("it's broken").await.unwrap(),
            LoopStatus::Continue
        );
        assert_eq!(planner.calls().len(), 1);
    }

    #[tokio::test]
    async fn idle_reply_still_leaves_the_loop_in_continue() {
        let planner = Arc::new(ScriptedPlanner::new(vec![Ok(reply(
            "Which printer?",
            LoopStatus::Idle,
            0,
            None,
        ))]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        assert_eq!(
            ctl.send_message("printing fails").await.unwrap(),
            LoopStatus::Continue
        );
        assert_eq!(ctl.loop_status(), LoopStatus::Continue);
        assert_eq!(ctl.log().last().and_then(|m| m.loop_status), Some(LoopStatus::Idle));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn launch_failure_is_reported_then_blocks() {
        let planner = Arc::new(ScriptedPlanner::new(vec![
            Ok(reply(
                "Checking",
                LoopStatus::Continue,
                1,
                Some(proposal("uptime", Severity::Low, None)),
            )),
            Ok(reply(
                "Try again",
                LoopStatus::Continue,
                2,
                Some(proposal("uptime", Severity::Low, None)),
            )),
        ]));
        let runner = RecordingRunner::failing_launch();
        let mut ctl = controller(&planner, &runner);

        let status = ctl.send_message("uptime?").await.unwrap();

        assert_eq!(status, LoopStatus::Blocked);
        assert_eq!(runner.commands().len(), 1);
        let reports = iterate_calls(&planner);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].error.as_deref(), Some("no shell"));
        assert!(ctl.pending_proposal().is_some());
    }

    fn position(events: &[SessionEvent], pred: impl Fn(&SessionEvent) -> bool) -> usize {
        events.iter().position(pred).expect("event present")
    }

    #[tokio::test]
    async fn events_arrive_in_order_around_a_run() {
        let planner = Arc::new(ScriptedPlanner::new(vec![
            Ok(reply(
                "Checking",
                LoopStatus::Continue,
                1,
                Some(proposal("df -h", Severity::Low, None)),
            )),
            Ok(reply("Fine", LoopStatus::Done, 2, None)),
        ]));
        let runner = RecordingRunner::with_output("ok");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ctl = controller(&planner, &runner).with_events(tx);

        ctl.send_message("disk").await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        let started = position(&events, |e| matches!(e, SessionEvent::RunStarted { .. }));
        let chunk = position(&events, |e| matches!(e, SessionEvent::Output(o) if !o.is_final));
        let fin = position(&events, |e| matches!(e, SessionEvent::Output(o) if o.is_final));
        let finished = position(&events, |e| matches!(e, SessionEvent::RunFinished { .. }));
        assert!(started < chunk && chunk < fin && fin < finished);
        assert_eq!(
            events.last(),
            Some(&SessionEvent::Status {
                loop_status: LoopStatus::Done,
                iteration_count: 2,
            })
        );
    }

    #[tokio::test]
    async fn approval_event_carries_the_proposal_and_message_snapshot() {
        let risky = proposal("rm -rf /tmp/cache", Severity::High, None);
        let planner = Arc::new(ScriptedPlanner::new(vec![Ok(reply(
            "Clearing cache",
            LoopStatus::Continue,
            1,
            Some(risky.clone()),
        ))]));
        let runner = RecordingRunner::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ctl = controller(&planner, &runner).with_events(tx);

        ctl.send_message("low space").await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(events.contains(&SessionEvent::ApprovalRequired {
            index: 1,
            proposal: risky,
        }));
        let agent = events.iter().find_map(|event| match event {
            SessionEvent::Message { index: 1, message } => Some(message.clone()),
            _ => None,
        });
        assert_eq!(agent.map(|m| m.text), Some("Clearing cache".to_string()));
    }

    #[tokio::test]
    async fn reset_starts_a_fresh_session() {
        let planner = Arc::new(ScriptedPlanner::new(vec![
            Ok(reply("hi", LoopStatus::Done, 1, None)),
            Ok(reply("hello again", LoopStatus::Done, 1, None)),
        ]));
        let runner = RecordingRunner::default();
        let mut ctl = controller(&planner, &runner);

        ctl.send_message("one").await.unwrap();
        ctl.reset();
        assert!(ctl.log().is_empty());
        assert_eq!(ctl.session().id(), None);
        assert_eq!(ctl.loop_status(), LoopStatus::Idle);

        ctl.send_message("two").await.unwrap();
        assert_eq!(
            planner.calls()[1],
            PlannerCall::Chat(ChatRequest {
                message: "two".into(),
                session_id: None,
            })
        );
        assert_eq!(ctl.log().len(), 2);
        assert_eq!(ctl.log().entries()[0].sender, Sender::User);
    }
}
