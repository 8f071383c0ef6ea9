//! Incremental output events and the sinks that receive them.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Pipe an output chunk arrived on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// One fragment of live output, or the run's closing marker.
///
/// Per run: zero or more non-final events in arrival order, then exactly one
/// final event with an empty chunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputEvent {
    /// Runner-assigned id correlating this event with its `ExecutionResult`.
    pub run_id: u64,
    pub chunk: String,
    pub stream: OutputStream,
    pub is_final: bool,
}

impl OutputEvent {
    pub fn chunk(run_id: u64, stream: OutputStream, chunk: String) -> Self {
        Self {
            run_id,
            chunk,
            stream,
            is_final: false,
        }
    }

    pub fn final_event(run_id: u64) -> Self {
        Self {
            run_id,
            chunk: String::new(),
            stream: OutputStream::Stdout,
            is_final: true,
        }
    }

    pub fn is_error_stream(&self) -> bool {
        self.stream == OutputStream::Stderr
    }
}

/// Fire-and-forget destination for output events.
///
/// `emit` must not block: the runner never waits on an observer.
pub trait OutputSink: Send + Sync {
    fn emit(&self, event: OutputEvent);
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&self, _event: OutputEvent) {}
}

impl OutputSink for mpsc::UnboundedSender<OutputEvent> {
    fn emit(&self, event: OutputEvent) {
        // A closed receiver just means nobody is watching anymore.
        let _ = self.send(event);
    }
}
