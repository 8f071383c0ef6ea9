//! Append-only chat log.

use crate::error::SessionError;
use crate::exec::ExecutionResult;
use crate::types::{CommandProposal, LoopStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

/// Execution state attached to a proposal-bearing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "result", rename_all = "snake_case")]
pub enum RunSlot {
    InProgress,
    Done(ExecutionResult),
}

/// One log entry.
///
/// Only the run slot and the approval flags ever change after the entry is
/// appended, and only through [`ChatLog`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<CommandProposal>,
    #[serde(default)]
    pub approval_pending: bool,
    #[serde(default)]
    pub rejected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<RunSlot>,
    /// Planner iteration number this reply belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_status: Option<LoopStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocker_reason: Option<String>,
    /// Set on entries describing a lost planner connection.
    #[serde(default)]
    pub failure: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            proposal: None,
            approval_pending: false,
            rejected: false,
            result: None,
            iteration: None,
            loop_status: None,
            blocker_reason: None,
            failure: false,
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Agent,
            ..Self::user(text)
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            failure: true,
            ..Self::agent(text)
        }
    }

    /// Finished execution result, if any.
    pub fn execution(&self) -> Option<&ExecutionResult> {
        match &self.result {
            Some(RunSlot::Done(result)) => Some(result),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.result, Some(RunSlot::InProgress))
    }
}

/// Ordered, append-only message history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ChatLog {
    entries: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its index.
    pub fn push(&mut self, message: ChatMessage) -> usize {
        self.entries.push(message);
        self.entries.len() - 1
    }

    pub fn entries(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flag the entry's proposal as waiting for a human.
    pub(crate) fn mark_pending(&mut self, index: usize) -> Result<(), SessionError> {
        let entry = self.proposal_entry(index)?;
        entry.approval_pending = true;
        Ok(())
    }

    /// Mark the entry's proposal as executing.
    pub(crate) fn begin_run(&mut self, index: usize) -> Result<(), SessionError> {
        let entry = self.proposal_entry(index)?;
        if entry.result.is_some() || entry.rejected {
            return Err(SessionError::Log(format!("entry {index} was already resolved")));
        }
        entry.approval_pending = false;
        entry.result = Some(RunSlot::InProgress);
        Ok(())
    }

    /// Attach the execution result. Allowed once, after `begin_run`.
    pub(crate) fn finish_run(
        &mut self,
        index: usize,
        result: ExecutionResult,
    ) -> Result<(), SessionError> {
        let entry = self.proposal_entry(index)?;
        if !entry.is_running() {
            return Err(SessionError::Log(format!("entry {index} has no run in progress")));
        }
        entry.result = Some(RunSlot::Done(result));
        Ok(())
    }

    /// Record a human rejection. The result slot stays empty.
    pub(crate) fn reject(&mut self, index: usize) -> Result<(), SessionError> {
        let entry = self.proposal_entry(index)?;
        if entry.result.is_some() {
            return Err(SessionError::Log(format!("entry {index} already ran")));
        }
        entry.approval_pending = false;
        entry.rejected = true;
        Ok(())
    }

    fn proposal_entry(&mut self, index: usize) -> Result<&mut ChatMessage, SessionError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or_else(|| SessionError::Log(format!("no entry at index {index}")))?;
        if entry.proposal.is_none() {
            return Err(SessionError::Log(format!("entry {index} carries no proposal")));
        }
        Ok(entry)
    }
}
