//! Markdown-to-terminal layout for planner messages.
//!
//! Planner replies are free-form markdown. `termimad` lays out lists,
//! headings, and fences; the block renderer owns the colors.

use termimad::MadSkin;

/// Render markdown into plain terminal text with structure preserved.
pub fn render_markdown_for_terminal(input: &str) -> String {
    let skin = MadSkin::no_style();
    let formatted = skin.text(input, None).to_string();
    formatted.trim_end_matches('\n').to_string()
}
