//! Wire data model for the planner service.
//!
//! These types serialize/deserialize directly to/from the JSON bodies of
//! `POST /chat`, `POST /iterate`, and `GET /`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Proposals
// ---------------------------------------------------------------------------

/// Advisory risk label attached to a proposal.
///
/// `Low` proposals run without asking; `High` proposals wait for a human.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    High,
}

impl Severity {
    /// True when a human must approve before execution.
    pub fn requires_approval(self) -> bool {
        matches!(self, Self::High)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A planner-suggested shell command.
///
/// Immutable once received. `timeout` is left exactly as the planner sent it;
/// the controller applies its own default via [`CommandProposal::effective_timeout`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandProposal {
    /// Full command line handed to the shell interpreter.
    pub command: String,
    pub severity: Severity,
    /// Planner's explanation of why the command is useful.
    #[serde(default)]
    pub reason: String,
    /// Requested wall-clock limit in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl CommandProposal {
    /// Resolve the wall-clock limit, treating an absent or zero value as `default`.
    pub fn effective_timeout(&self, default: Duration) -> Duration {
        self.timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(default)
    }
}

// ---------------------------------------------------------------------------
// Loop status
// ---------------------------------------------------------------------------

/// Session-level phase of the autonomous loop.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoopStatus {
    /// No message has been exchanged yet (local state only).
    #[default]
    Idle,
    /// Autonomous iteration is active.
    Continue,
    /// Halted until a human acts (approve, reject, or new message).
    Blocked,
    /// The planner declared the task finished.
    Done,
}

impl LoopStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Continue => "continue",
            Self::Blocked => "blocked",
            Self::Done => "done",
        }
    }

    /// True for phases that stop autonomous iteration.
    pub fn is_halted(self) -> bool {
        matches!(self, Self::Blocked | Self::Done)
    }
}

impl fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_response_status() -> LoopStatus {
    LoopStatus::Done
}

// ---------------------------------------------------------------------------
// Requests / responses
// ---------------------------------------------------------------------------

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Body of `POST /iterate`: one execution report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IterateRequest {
    pub session_id: String,
    pub command: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Planner reply shared by `/chat` and `/iterate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<CommandProposal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// A reply that omits the status ends the loop.
    #[serde(default = "default_response_status")]
    pub loop_status: LoopStatus,
    #[serde(default)]
    pub iteration_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocker_reason: Option<String>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl HealthStatus {
    pub fn is_online(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("online")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposal_timeout_defaults_when_absent_or_zero() {
        let default = Duration::from_secs(30);
        let mut proposal: CommandProposal =
            serde_json::from_str(r#"{"command":"df -h","severity":"low","reason":"disk"}"#)
                .unwrap();
        assert_eq!(proposal.timeout, None);
        assert_eq!(proposal.effective_timeout(default), default);

        proposal.timeout = Some(0);
        assert_eq!(proposal.effective_timeout(default), default);

        proposal.timeout = Some(10);
        assert_eq!(proposal.effective_timeout(default), Duration::from_secs(10));
    }

    #[test]
    fn severity_gates_approval() {
        assert!(!Severity::Low.requires_approval());
        assert!(Severity::High.requires_approval());
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let parsed =
            serde_json::from_str::<CommandProposal>(r#"{"command":"x","severity":"medium"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn agent_response_parses_full_payload() {
        let raw = r#"{
            "message": "Checking disk usage.",
            "proposal": {"command": "df -h", "severity": "low", "reason": "disk", "timeout": 10},
            "session_id": "s-1",
            "loop_status": "continue",
            "iteration_count": 1
        }"#;
        let response: AgentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.loop_status, LoopStatus::Continue);
        assert_eq!(response.iteration_count, 1);
        assert_eq!(response.session_id.as_deref(), Some("s-1"));
        let proposal = response.proposal.unwrap();
        assert_eq!(proposal.severity, Severity::Low);
        assert_eq!(proposal.timeout, Some(10));
    }

    #[test]
    fn agent_response_missing_status_means_done() {
        let response: AgentResponse =
            serde_json::from_str(r#"{"message":"I'm here to help."}"#).unwrap();
        assert_eq!(response.loop_status, LoopStatus::Done);
        assert_eq!(response.iteration_count, 0);
        assert!(response.proposal.is_none());
    }

    #[test]
    fn requests_omit_absent_optionals() {
        let chat = ChatRequest {
            message: "disk full?".into(),
            session_id: None,
        };
        assert_eq!(
            serde_json::to_value(&chat).unwrap(),
            serde_json::json!({"message": "disk full?"})
        );

        let iterate = IterateRequest {
            session_id: "s-1".into(),
            command: "df -h".into(),
            output: "ok".into(),
            error: None,
        };
        let value = serde_json::to_value(&iterate).unwrap();
        assert!(value.get("error").is_none());
    }

    #[test]
    fn loop_status_halted_states() {
        assert!(!LoopStatus::Idle.is_halted());
        assert!(!LoopStatus::Continue.is_halted());
        assert!(LoopStatus::Blocked.is_halted());
        assert!(LoopStatus::Done.is_halted());
        assert_eq!(LoopStatus::Blocked.to_string(), "blocked");
    }

    #[test]
    fn health_status_online_is_case_insensitive() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status":"Online","service":"PC Doctor Agent"}"#).unwrap();
        assert!(health.is_online());
    }
}
