//! Syntax highlighting for proposed command lines.
//!
//! Only the few lines of an approval block go through here, so the syntect
//! default sets are loaded lazily once and reused.

use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// A highlighted text fragment with display attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledToken {
    pub text: String,
    pub rgb: (u8, u8, u8),
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn preferred_theme(theme_set: &ThemeSet) -> Option<&Theme> {
    theme_set
        .themes
        .get("base16-ocean.dark")
        .or_else(|| theme_set.themes.values().next())
}

/// Syntax used for a shell program name, falling back to Bash for anything
/// POSIX-like. PowerShell and cmd have no bundled syntax and stay plain.
fn syntax_for_shell<'a>(
    syntaxes: &'a SyntaxSet,
    shell_program: &str,
) -> Option<&'a SyntaxReference> {
    let name = shell_program
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(shell_program)
        .trim_end_matches(".exe")
        .to_ascii_lowercase();
    match name.as_str() {
        "pwsh" | "powershell" | "cmd" => None,
        _ => syntaxes.find_syntax_by_extension("sh"),
    }
}

/// Highlight command lines as they will be interpreted by `shell_program`.
///
/// Returns `None` when no syntax applies or highlighting fails.
pub fn highlight_command_lines(
    shell_program: &str,
    lines: &[&str],
) -> Option<Vec<Vec<StyledToken>>> {
    if lines.is_empty() {
        return Some(Vec::new());
    }

    let syntaxes = syntax_set();
    let syntax = syntax_for_shell(syntaxes, shell_program)?;
    let theme = preferred_theme(theme_set())?;
    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut highlighted = Vec::with_capacity(lines.len());

    for line in lines {
        let ranges = highlighter.highlight_line(line, syntaxes).ok()?;
        let tokens = ranges
            .into_iter()
            .filter(|(_, fragment)| !fragment.is_empty())
            .map(|(style, fragment)| StyledToken {
                text: fragment.to_string(),
                rgb: (style.foreground.r, style.foreground.g, style.foreground.b),
                bold: style.font_style.contains(FontStyle::BOLD),
                italic: style.font_style.contains(FontStyle::ITALIC),
                underline: style.font_style.contains(FontStyle::UNDERLINE),
            })
            .collect();
        highlighted.push(tokens);
    }

    Some(highlighted)
}
