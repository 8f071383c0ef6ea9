//! Session identity and loop phase.

use crate::types::{AgentResponse, LoopStatus};
use serde::{Deserialize, Serialize};

/// One planner conversation.
///
/// The id and iteration count come from the planner; the loop status is
/// owned by the controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    #[serde(default)]
    iteration_count: u32,
    #[serde(default)]
    loop_status: LoopStatus,
}

impl Session {
    pub fn id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    pub fn loop_status(&self) -> LoopStatus {
        self.loop_status
    }

    pub(crate) fn set_status(&mut self, status: LoopStatus) {
        self.loop_status = status;
    }

    /// Take identity and numbering from a planner reply.
    ///
    /// The first id seen is kept for the life of the session.
    pub(crate) fn absorb(&mut self, response: &AgentResponse) {
        self.iteration_count = response.iteration_count;
        let Some(incoming) = response.session_id.as_deref() else {
            return;
        };
        match self.session_id.as_deref() {
            None => {
                tracing::info!(session_id = incoming, "planner assigned session");
                self.session_id = Some(incoming.to_string());
            }
            Some(current) if current != incoming => {
                tracing::warn!(
                    session_id = current,
                    ignored = incoming,
                    "planner sent a different session id; keeping the original"
                );
            }
            Some(_) => {}
        }
    }
}
