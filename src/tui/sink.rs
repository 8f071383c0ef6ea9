//! Rendering contract used by the binary.
//!
//! The app talks to `&dyn RenderSink` so its event handling can be tested
//! against a recording sink instead of a real terminal.

use crate::exec::{ExecutionResult, OutputStream};
use crate::tui::progress::ProgressHandle;
use crate::tui::renderer::Renderer;
use crate::types::Severity;

pub trait RenderSink: Send + Sync {
    fn prompt(&self);
    fn approval_prompt(&self);
    fn agent_message(&self, text: &str);
    fn progress(&self, label: &str) -> ProgressHandle;
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
    fn blocked(&self, reason: &str);
    fn section(&self, title: &str);
    fn activity(&self, text: &str);
    fn field(&self, key: &str, value: &str);
    fn detail(&self, text: &str);
    fn run_started(&self, command: &str);
    fn output_chunk(&self, stream: OutputStream, chunk: &str);
    fn run_finished(&self, result: &ExecutionResult);
    fn command_output_block(&self, text: &str);
    fn approval_block(&self, command: &str, severity: Severity, reason: &str, shell_program: &str);
}

impl RenderSink for Renderer {
    fn prompt(&self) {
        Renderer::prompt(self);
    }

    fn approval_prompt(&self) {
        Renderer::approval_prompt(self);
    }

    fn agent_message(&self, text: &str) {
        Renderer::agent_message(self, text);
    }

    fn progress(&self, label: &str) -> ProgressHandle {
        Renderer::progress(self, label)
    }

    fn warn(&self, msg: &str) {
        Renderer::warn(self, msg);
    }

    fn error(&self, msg: &str) {
        Renderer::error(self, msg);
    }

    fn blocked(&self, reason: &str) {
        Renderer::blocked(self, reason);
    }

    fn section(&self, title: &str) {
        Renderer::section(self, title);
    }

    fn activity(&self, text: &str) {
        Renderer::activity(self, text);
    }

    fn field(&self, key: &str, value: &str) {
        Renderer::field(self, key, value);
    }

    fn detail(&self, text: &str) {
        Renderer::detail(self, text);
    }

    fn run_started(&self, command: &str) {
        Renderer::run_started(self, command);
    }

    fn output_chunk(&self, stream: OutputStream, chunk: &str) {
        Renderer::output_chunk(self, stream, chunk);
    }

    fn run_finished(&self, result: &ExecutionResult) {
        Renderer::run_finished(self, result);
    }

    fn command_output_block(&self, text: &str) {
        Renderer::command_output_block(self, text);
    }

    fn approval_block(&self, command: &str, severity: Severity, reason: &str, shell_program: &str) {
        Renderer::approval_block(self, command, severity, reason, shell_program);
    }
}
