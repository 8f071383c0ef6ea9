//! Live rendering of session events.

use pcdoctor::session::{ChatMessage, SessionEvent, Sender};
use pcdoctor::tui::{ProgressHandle, RenderSink};
use std::future::Future;
use tokio::sync::mpsc::UnboundedReceiver;

/// How a pumped operation ended.
#[derive(Debug)]
pub(crate) enum Pumped<T> {
    Finished(T),
    /// Ctrl-C arrived while waiting on the planner; the operation was
    /// dropped. Never happens while a command is running.
    Interrupted,
}

/// Turns the controller's event stream into terminal output.
pub(crate) struct EventView<'a> {
    renderer: &'a dyn RenderSink,
    stream_output: bool,
    shell_program: String,
    waiting: Option<ProgressHandle>,
    /// A command has started and not yet finished.
    run_active: bool,
}

impl<'a> EventView<'a> {
    pub(crate) fn new(
        renderer: &'a dyn RenderSink,
        stream_output: bool,
        shell_program: impl Into<String>,
    ) -> Self {
        Self {
            renderer,
            stream_output,
            shell_program: shell_program.into(),
            waiting: None,
            run_active: false,
        }
    }

    pub(crate) fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Message { message, .. } => {
                self.stop_waiting();
                match message.sender {
                    // The user just typed it; the planner is now thinking.
                    Sender::User => self.start_waiting(),
                    Sender::Agent => self.agent_message(&message),
                }
            }
            SessionEvent::RunStarted { command, .. } => {
                self.run_active = true;
                self.stop_waiting();
                self.renderer.run_started(&command);
            }
            SessionEvent::Output(event) => {
                if self.stream_output && !event.is_final {
                    self.renderer.output_chunk(event.stream, &event.chunk);
                }
            }
            SessionEvent::RunFinished { result, .. } => {
                self.run_active = false;
                if !self.stream_output {
                    self.renderer.command_output_block(result.output());
                    if let Some(stderr) = result.error_text().filter(|_| result.is_success()) {
                        self.renderer.command_output_block(stderr);
                    }
                }
                self.renderer.run_finished(&result);
                self.start_waiting();
            }
            SessionEvent::Status { loop_status, .. } => {
                if loop_status.is_halted() {
                    self.stop_waiting();
                }
            }
            SessionEvent::ApprovalRequired { proposal, .. } => {
                self.stop_waiting();
                self.renderer.approval_block(
                    &proposal.command,
                    proposal.severity,
                    &proposal.reason,
                    &self.shell_program,
                );
            }
        }
    }

    /// Render anything still queued and clear the spinner.
    pub(crate) fn drain(&mut self, events: &mut UnboundedReceiver<SessionEvent>) {
        self.catch_up(events);
        self.stop_waiting();
    }

    fn catch_up(&mut self, events: &mut UnboundedReceiver<SessionEvent>) {
        while let Ok(event) = events.try_recv() {
            self.handle(event);
        }
    }

    fn agent_message(&self, message: &ChatMessage) {
        if message.failure {
            self.renderer.error(&message.text);
            return;
        }
        self.renderer.agent_message(&message.text);
        if let Some(reason) = message.blocker_reason.as_deref() {
            self.renderer.blocked(reason);
        }
    }

    fn start_waiting(&mut self) {
        self.stop_waiting();
        self.waiting = Some(self.renderer.progress("asking planner"));
    }

    fn stop_waiting(&mut self) {
        if let Some(mut handle) = self.waiting.take() {
            handle.finish();
        }
    }
}

/// Drive `operation` while rendering its events as they arrive.
///
/// Ctrl-C abandons a planner request, but a running command is never
/// cancelled: the interrupt is held until the run finishes or times out.
pub(crate) async fn pump<F>(
    operation: F,
    events: &mut UnboundedReceiver<SessionEvent>,
    view: &mut EventView<'_>,
) -> Pumped<F::Output>
where
    F: Future,
{
    pump_until(operation, events, view, tokio::signal::ctrl_c).await
}

/// [`pump`] with the interrupt source supplied by the caller.
pub(crate) async fn pump_until<F, I, S>(
    operation: F,
    events: &mut UnboundedReceiver<SessionEvent>,
    view: &mut EventView<'_>,
    mut interrupts: I,
) -> Pumped<F::Output>
where
    F: Future,
    I: FnMut() -> S,
    S: Future,
{
    tokio::pin!(operation);
    let interrupt = interrupts();
    tokio::pin!(interrupt);
    let mut deferred = false;
    loop {
        tokio::select! {
            biased;
            Some(event) = events.recv() => {
                view.handle(event);
                if deferred && !view.run_active {
                    view.drain(events);
                    return Pumped::Interrupted;
                }
            }
            output = &mut operation => {
                view.drain(events);
                return Pumped::Finished(output);
            }
            _ = &mut interrupt => {
                // The operation may have started a run in this very poll.
                view.catch_up(events);
                if !view.run_active {
                    view.drain(events);
                    return Pumped::Interrupted;
                }
                if !deferred {
                    deferred = true;
                    view.renderer.warn(
                        "a command is running; stopping once it finishes or times out",
                    );
                }
                interrupt.set(interrupts());
            }
        }
    }
}
