//! Session iteration: the state machine that threads proposals, executions,
//! and planner reports.
//!
//! - `controller`: the loop itself
//! - `state`: session identity, iteration count, loop status
//! - `log`: append-only chat history
//! - `events`: ordered event stream for a live UI

mod controller;
mod events;
mod log;
mod state;

pub use controller::SessionController;
pub use events::SessionEvent;
pub use log::{ChatLog, ChatMessage, RunSlot, Sender};
pub use state::Session;
