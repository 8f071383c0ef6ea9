//! Error types for configuration, planner transport, and session control.
//!
//! Command execution has no error type: the process runner folds every
//! outcome (including launch failure) into an `ExecutionResult`.

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// PlannerError
// ---------------------------------------------------------------------------

/// Transport failures talking to the planner service.
///
/// Every variant is fatal to the current loop: the controller turns it into a
/// chat message and parks the session in `blocked`.
#[derive(Debug)]
pub enum PlannerError {
    /// Network / reqwest-level error (connect, timeout, body decode).
    Http(reqwest::Error),
    /// Non-2xx status from the planner.
    Status { code: u16, body: String },
    /// The planner replied with a body that does not match the wire schema.
    InvalidResponse(String),
    /// An iteration report was attempted before the planner assigned a session id.
    MissingSession,
}

impl PlannerError {
    /// HTTP status code for status-class failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { code, body } => {
                if body.trim().is_empty() {
                    write!(f, "status {code}")
                } else {
                    write!(f, "status {code}: {}", body.trim())
                }
            }
            Self::InvalidResponse(msg) => write!(f, "invalid planner response: {msg}"),
            Self::MissingSession => write!(f, "planner did not assign a session id"),
        }
    }
}

impl std::error::Error for PlannerError {}

impl From<reqwest::Error> for PlannerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return Self::InvalidResponse(e.to_string());
        }
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Precondition violations raised by the session controller.
///
/// Transport failures are not reported here; they become chat messages and a
/// `blocked` loop status instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A proposal is waiting for approval; resolve it before sending more input.
    ApprovalPending,
    /// `approve`/`reject` was called with nothing awaiting approval.
    NoPendingApproval,
    /// The chat log refused an update (entry missing or already resolved).
    Log(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApprovalPending => {
                write!(f, "a proposal is awaiting approval; approve or reject it first")
            }
            Self::NoPendingApproval => write!(f, "no proposal is awaiting approval"),
            Self::Log(msg) => write!(f, "chat log: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}
