//! Command execution: run one shell command line, stream its output, and
//! resolve to a structured [`ExecutionResult`].
//!
//! The runner never interprets the command. Severity gating happens before a
//! command ever reaches this module.

mod decode;
mod events;
mod process;
mod result;
mod runner;

use std::time::Duration;

use async_trait::async_trait;

pub use events::{NullSink, OutputEvent, OutputSink, OutputStream};
pub use process::ShellSpec;
pub use result::{ExecutionOutcome, ExecutionResult};
pub use runner::ProcessRunner;

pub(crate) use result::format_seconds;

/// Executes command lines on behalf of the session controller.
///
/// Implementations must emit exactly one final [`OutputEvent`] per call and
/// must return a result for every call, including launch failures.
#[async_trait]
pub trait CommandRunner: Send {
    async fn run(
        &mut self,
        command: &str,
        timeout: Duration,
        sink: &dyn OutputSink,
    ) -> ExecutionResult;
}
