//! Text helpers for terminal rendering.

/// A clipped text preview used for compact block rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetPreview<'a> {
    pub lines: Vec<&'a str>,
    /// Lines left out of `lines`.
    pub omitted: usize,
}

/// Count visible character width (single-cell approximation).
pub fn visible_width(s: &str) -> usize {
    s.chars().count()
}

/// Flatten newlines and cut to `max_chars`, marking the cut with `...`.
pub fn truncate_single_line(s: &str, max_chars: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() > max_chars {
        let kept: String = flat.chars().take(max_chars).collect();
        format!("{kept}...")
    } else {
        flat
    }
}

/// First `max_lines` lines of `text`.
pub fn head_preview(text: &str, max_lines: usize) -> SnippetPreview<'_> {
    let all: Vec<&str> = text.lines().collect();
    let shown = all.len().min(max_lines);
    SnippetPreview {
        omitted: all.len() - shown,
        lines: all[..shown].to_vec(),
    }
}

/// Last `max_lines` lines of `text`. Command output usually ends with the
/// interesting part.
pub fn tail_preview(text: &str, max_lines: usize) -> SnippetPreview<'_> {
    let all: Vec<&str> = text.lines().collect();
    let skip = all.len().saturating_sub(max_lines);
    SnippetPreview {
        omitted: skip,
        lines: all[skip..].to_vec(),
    }
}

/// Clip a string to at most `max_width` visible characters.
pub fn clip_to_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Wrap a single line to fit `max_width`, preferring whitespace boundaries
/// and hard-splitting tokens longer than a row.
pub fn wrap_for_block(line: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }
    if line.is_empty() {
        return vec![String::new()];
    }

    let chars: Vec<char> = line.chars().collect();
    let mut rows = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let end = (start + max_width).min(chars.len());
        if end == chars.len() {
            rows.push(chars[start..end].iter().collect());
            break;
        }

        let split = if chars[end].is_whitespace() {
            Some(end)
        } else {
            (start + 1..end).rev().find(|&idx| chars[idx].is_whitespace())
        };
        let stop = split.unwrap_or(end);
        rows.push(chars[start..stop].iter().collect());
        start = stop;
        if split.is_some() {
            while start < chars.len() && chars[start].is_whitespace() {
                start += 1;
            }
        }
    }

    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}
