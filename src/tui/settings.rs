//! Hardcoded terminal settings: prompt strings, labels, glyphs, colors.

use crossterm::style::Color;

// ---------------------------------------------------------------------------
// Layout / indentation
// ---------------------------------------------------------------------------

pub const INDENT_1: &str = "  ";
pub const SNIPPET_PREVIEW_LINES: usize = 12;
pub const BLOCK_FALLBACK_COLUMNS: usize = 100;
pub const BLOCK_RIGHT_MARGIN: usize = 2;

// ---------------------------------------------------------------------------
// Prompt strings
// ---------------------------------------------------------------------------

pub const PROMPT_PRIMARY: &str = "> ";
pub const PROMPT_SYMBOL: &str = ">";
pub const PROMPT_APPROVAL: &str = "• approve? [y/n] ";

// ---------------------------------------------------------------------------
// Labels / glyphs
// ---------------------------------------------------------------------------

pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";
pub const LABEL_BLOCKED: &str = "blocked:";

pub const GLYPH_SECTION_BULLET: &str = "•";
pub const GLYPH_RUN: &str = "▶";
pub const GLYPH_RUN_PLAIN: &str = ">";
pub const GLYPH_RESULT: &str = "\u{2190}";
pub const GLYPH_RESULT_PLAIN: &str = "<-";

// ---------------------------------------------------------------------------
// Spinner
// ---------------------------------------------------------------------------

pub const PROGRESS_CLEAR_LINE: &str = "\r\x1b[2K";
pub const PROGRESS_FRAMES: [char; 4] = ['|', '/', '-', '\\'];
pub const PROGRESS_TICK_MS: u64 = 100;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_AGENT_LABEL: Color = Color::Green;
pub const COLOR_META: Color = Color::DarkGrey;

pub const COLOR_RUN_GLYPH: Color = Color::DarkYellow;
pub const COLOR_RUN_COMMAND: Color = Color::Yellow;
pub const COLOR_RESULT_OK: Color = Color::DarkGreen;
pub const COLOR_RESULT_FAILED: Color = Color::DarkRed;

pub const COLOR_STREAM_STDOUT: Color = Color::Grey;
pub const COLOR_STREAM_STDERR: Color = Color::DarkRed;

pub const COLOR_SEVERITY_LOW: Color = Color::Green;
pub const COLOR_SEVERITY_HIGH: Color = Color::Red;

pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;

pub const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
pub const COLOR_SECTION_TITLE: Color = Color::Cyan;
pub const COLOR_ACTIVITY_TEXT: Color = Color::DarkGrey;
pub const COLOR_FIELD_KEY: Color = Color::DarkGrey;
pub const COLOR_FIELD_VALUE: Color = Color::White;

pub const COLOR_PROGRESS_FRAME: Color = Color::Cyan;
pub const COLOR_PROGRESS_LABEL: Color = Color::DarkGrey;

pub const COLOR_SNIPPET_OUTPUT_BG: Color = Color::Rgb {
    r: 34,
    g: 56,
    b: 44,
};
pub const COLOR_SNIPPET_OUTPUT_TEXT: Color = Color::Rgb {
    r: 242,
    g: 248,
    b: 244,
};
pub const COLOR_SNIPPET_APPROVAL_BG: Color = Color::Rgb {
    r: 60,
    g: 24,
    b: 24,
};
pub const COLOR_SNIPPET_APPROVAL_TEXT: Color = Color::Rgb {
    r: 244,
    g: 208,
    b: 208,
};
pub const COLOR_SNIPPET_AGENT_BG: Color = Color::Rgb {
    r: 30,
    g: 42,
    b: 56,
};
pub const COLOR_SNIPPET_AGENT_TEXT: Color = Color::White;
pub const COLOR_SNIPPET_TRUNCATED: Color = Color::Grey;
