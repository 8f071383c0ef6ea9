//! The running session plus everything needed to show and persist it.

use crate::app::transcripts::TranscriptWriter;
use crate::app::view::{pump, EventView, Pumped};
use pcdoctor::error::SessionError;
use pcdoctor::session::{SessionController, SessionEvent};
use pcdoctor::tui::RenderSink;
use pcdoctor::types::LoopStatus;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// What one user-initiated operation came to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    Status(LoopStatus),
    /// Rejected locally before anything happened (e.g. approval pending).
    Refused(SessionError),
    Interrupted,
}

pub(crate) struct App<'a> {
    pub(crate) renderer: &'a dyn RenderSink,
    pub(crate) controller: SessionController,
    pub(crate) planner_url: String,
    events: UnboundedReceiver<SessionEvent>,
    view: EventView<'a>,
    transcripts: TranscriptWriter,
}

impl<'a> App<'a> {
    /// Wire `controller` to a fresh event channel rendered through `view`.
    pub(crate) fn new(
        renderer: &'a dyn RenderSink,
        mut controller: SessionController,
        view: EventView<'a>,
        transcripts: TranscriptWriter,
        planner_url: impl Into<String>,
    ) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        controller.set_event_sink(Some(tx));
        Self {
            renderer,
            controller,
            planner_url: planner_url.into(),
            events,
            view,
            transcripts,
        }
    }

    pub(crate) async fn send(&mut self, text: &str) -> Step {
        let outcome = pump(
            self.controller.send_message(text),
            &mut self.events,
            &mut self.view,
        )
        .await;
        self.finish(outcome)
    }

    pub(crate) async fn approve(&mut self) -> Step {
        let outcome = pump(self.controller.approve(), &mut self.events, &mut self.view).await;
        self.finish(outcome)
    }

    pub(crate) fn reject(&mut self) -> Step {
        let outcome = self.controller.reject();
        self.view.drain(&mut self.events);
        self.finish(Pumped::Finished(outcome))
    }

    /// Forget the session; the next message starts a new planner conversation.
    pub(crate) fn reset(&mut self) {
        self.controller.reset();
        self.view.drain(&mut self.events);
        self.transcripts.restart();
    }

    pub(crate) fn transcript_dir(&self) -> Option<&std::path::Path> {
        self.transcripts.dir()
    }

    fn finish(&mut self, outcome: Pumped<Result<LoopStatus, SessionError>>) -> Step {
        let step = match outcome {
            Pumped::Finished(Ok(status)) => Step::Status(status),
            Pumped::Finished(Err(err)) => Step::Refused(err),
            Pumped::Interrupted => Step::Interrupted,
        };
        self.transcripts.save(&self.controller, self.renderer);
        if matches!(step, Step::Interrupted) {
            // Only a planner request can be dropped here; the session itself
            // stays intact and the next message carries on with it.
            tracing::info!("planner request interrupted by user");
            self.renderer
                .warn("interrupted; the planner request was abandoned");
        }
        step
    }
}

/// Closing line for an operation that reached `status`.
pub(crate) fn render_outcome(app: &App<'_>, step: &Step) {
    let renderer = app.renderer;
    match step {
        Step::Status(LoopStatus::Done) => renderer.activity(&format!(
            "diagnosis finished after {} iteration(s)",
            app.controller.iteration_count()
        )),
        Step::Status(LoopStatus::Blocked) if app.controller.pending_proposal().is_some() => {}
        Step::Status(LoopStatus::Blocked) => {
            let rejected = app
                .controller
                .log()
                .last()
                .is_some_and(|message| message.rejected);
            if rejected {
                renderer.activity("command rejected; tell the planner what to try instead");
            } else {
                renderer.activity("the planner is waiting for more information");
            }
        }
        Step::Status(_) => renderer.activity("the planner is waiting for your reply"),
        Step::Refused(err) => renderer.warn(&err.to_string()),
        Step::Interrupted => {}
    }
}
