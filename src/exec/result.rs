//! Immutable record of how one command run ended.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Classification of a terminal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Exit code 0 before the deadline.
    Succeeded,
    /// Non-zero exit (or signal death). Reported like any other result.
    Failed { exit_code: Option<i32> },
    /// The wall-clock limit elapsed and the process was terminated.
    TimedOut,
    /// The shell interpreter could not be started at all.
    LaunchFailed,
}

/// Terminal result of a run.
///
/// Fields are private so a result cannot change after the runner builds it.
/// Exactly one of `succeeded`, `timed_out`, or a present `error_text` defines
/// the outcome; a successful run may still carry informational stderr.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionResult {
    run_id: u64,
    succeeded: bool,
    output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_text: Option<String>,
    timed_out: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exit_code: Option<i32>,
    #[serde(default)]
    launch_failed: bool,
    #[serde(default)]
    elapsed_ms: u64,
}

impl ExecutionResult {
    /// Exit code 0. Non-empty stderr is kept as informational text.
    pub fn succeeded(run_id: u64, output: String, stderr: String, elapsed: Duration) -> Self {
        Self {
            run_id,
            succeeded: true,
            output,
            error_text: non_empty(stderr),
            timed_out: false,
            exit_code: Some(0),
            launch_failed: false,
            elapsed_ms: millis(elapsed),
        }
    }

    /// Non-zero exit. Falls back to `fallback_error` when stderr was empty.
    pub fn failed(
        run_id: u64,
        output: String,
        stderr: String,
        exit_code: Option<i32>,
        fallback_error: String,
        elapsed: Duration,
    ) -> Self {
        Self {
            run_id,
            succeeded: false,
            output,
            error_text: Some(non_empty(stderr).unwrap_or(fallback_error)),
            timed_out: false,
            exit_code,
            launch_failed: false,
            elapsed_ms: millis(elapsed),
        }
    }

    /// Deadline elapsed; keeps whatever stdout had been captured.
    pub fn timed_out(run_id: u64, output: String, limit: Duration, elapsed: Duration) -> Self {
        Self {
            run_id,
            succeeded: false,
            output,
            error_text: Some(format!(
                "Command timed out after {} seconds",
                format_seconds(limit)
            )),
            timed_out: true,
            exit_code: None,
            launch_failed: false,
            elapsed_ms: millis(elapsed),
        }
    }

    /// The interpreter never started.
    pub fn launch_failed(run_id: u64, message: String, elapsed: Duration) -> Self {
        Self {
            run_id,
            succeeded: false,
            output: String::new(),
            error_text: Some(message),
            timed_out: false,
            exit_code: None,
            launch_failed: true,
            elapsed_ms: millis(elapsed),
        }
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn is_success(&self) -> bool {
        self.succeeded
    }

    /// Captured standard output.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn is_launch_failure(&self) -> bool {
        self.launch_failed
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    pub fn outcome(&self) -> ExecutionOutcome {
        if self.succeeded {
            ExecutionOutcome::Succeeded
        } else if self.timed_out {
            ExecutionOutcome::TimedOut
        } else if self.launch_failed {
            ExecutionOutcome::LaunchFailed
        } else {
            ExecutionOutcome::Failed {
                exit_code: self.exit_code,
            }
        }
    }

    /// One-line status used in logs and the chat transcript.
    pub fn summary(&self) -> String {
        match self.outcome() {
            ExecutionOutcome::Succeeded => "succeeded".to_string(),
            ExecutionOutcome::TimedOut => self
                .error_text
                .clone()
                .unwrap_or_else(|| "timed out".to_string()),
            ExecutionOutcome::LaunchFailed => "failed to launch".to_string(),
            ExecutionOutcome::Failed {
                exit_code: Some(code),
            } => format!("failed (exit code {code})"),
            ExecutionOutcome::Failed { exit_code: None } => "failed".to_string(),
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Whole seconds print without a fraction; sub-second limits keep one decimal.
pub(crate) fn format_seconds(limit: Duration) -> String {
    if limit.subsec_millis() == 0 {
        limit.as_secs().to_string()
    } else {
        format!("{:.1}", limit.as_secs_f64())
    }
}
