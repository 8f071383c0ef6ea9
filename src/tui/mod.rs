//! Terminal user-interface building blocks.
//!
//! Slash-command parsing, the spinner, and the renderer live here. Styling
//! constants are centralized in [`settings`] so the rest of the binary never
//! hardcodes colors or glyphs.

pub mod commands;
mod highlight;
mod markdown;
pub mod progress;
pub mod renderer;
pub mod settings;
mod sink;
pub mod text;

pub use commands::{
    parse_approval_answer, parse_slash_command, SlashCommand, SlashCommandAction, SLASH_COMMANDS,
};
pub use progress::{set_progress_enabled, ProgressHandle};
pub use renderer::{format_approval_command, Renderer};
pub use sink::RenderSink;
