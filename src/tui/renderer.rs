//! Terminal output renderer.
//!
//! Planner messages go to stdout as tinted blocks; everything else (status,
//! live command output, approvals) goes to stderr so `pcdoctor "..." > file`
//! captures only the diagnosis text.

use crate::exec::{ExecutionOutcome, ExecutionResult, OutputStream};
use crate::tui::highlight::{highlight_command_lines, StyledToken};
use crate::tui::markdown::render_markdown_for_terminal;
use crate::tui::progress::{start_progress, ProgressHandle};
use crate::tui::settings;
use crate::tui::text::{
    clip_to_width, head_preview, tail_preview, visible_width, wrap_for_block, SnippetPreview,
};
use crate::types::Severity;
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};
use crossterm::terminal;
use crossterm::QueueableCommand;
use std::io::{self, Write};
use std::sync::{Mutex, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnippetTone {
    /// Planner messages.
    Agent,
    /// Command output replayed after the fact.
    Output,
    /// Commands awaiting approval.
    Approval,
}

impl SnippetTone {
    fn bg(self) -> Color {
        match self {
            Self::Agent => settings::COLOR_SNIPPET_AGENT_BG,
            Self::Output => settings::COLOR_SNIPPET_OUTPUT_BG,
            Self::Approval => settings::COLOR_SNIPPET_APPROVAL_BG,
        }
    }

    fn fg(self) -> Color {
        match self {
            Self::Agent => settings::COLOR_SNIPPET_AGENT_TEXT,
            Self::Output => settings::COLOR_SNIPPET_OUTPUT_TEXT,
            Self::Approval => settings::COLOR_SNIPPET_APPROVAL_TEXT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockWrapMode {
    Wrap,
    Clip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockTarget {
    Stdout,
    Stderr,
}

/// Cross-call bookkeeping for blank separators and live output.
#[derive(Debug, Default)]
struct StreamState {
    stdout_blank: bool,
    stderr_blank: bool,
    /// Live output was written and did not end with a newline.
    live_line_open: bool,
}

impl StreamState {
    fn is_blank(&self, target: BlockTarget) -> bool {
        match target {
            BlockTarget::Stdout => self.stdout_blank,
            BlockTarget::Stderr => self.stderr_blank,
        }
    }

    fn set_blank(&mut self, target: BlockTarget, blank: bool) {
        match target {
            BlockTarget::Stdout => self.stdout_blank = blank,
            BlockTarget::Stderr => self.stderr_blank = blank,
        }
    }
}

fn stream_state() -> &'static Mutex<StreamState> {
    static STATE: OnceLock<Mutex<StreamState>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(StreamState::default()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RowContent {
    Plain(String),
    Highlighted(Vec<StyledToken>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderedRow {
    content: RowContent,
    /// Render with the muted "truncated" color.
    muted: bool,
}

impl RenderedRow {
    fn plain(text: String) -> Self {
        Self {
            content: RowContent::Plain(text),
            muted: false,
        }
    }

    fn highlighted(tokens: Vec<StyledToken>) -> Self {
        Self {
            content: RowContent::Highlighted(tokens),
            muted: false,
        }
    }

    fn muted(text: String) -> Self {
        Self {
            content: RowContent::Plain(text),
            muted: true,
        }
    }

    fn as_plain_text(&self) -> String {
        match &self.content {
            RowContent::Plain(text) => text.clone(),
            RowContent::Highlighted(tokens) => {
                tokens.iter().map(|token| token.text.as_str()).collect()
            }
        }
    }
}

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Print the message prompt (to stderr).
    pub fn prompt(&self) {
        if self.color {
            eprint!(
                "{} ",
                settings::PROMPT_SYMBOL
                    .with(settings::COLOR_AGENT_LABEL)
                    .bold()
            );
        } else {
            eprint!("{}", settings::PROMPT_PRIMARY);
        }
        let _ = io::stderr().flush();
    }

    /// Print the approval prompt shown while a proposal is pending.
    pub fn approval_prompt(&self) {
        if self.color {
            eprint!(
                "{}",
                settings::PROMPT_APPROVAL
                    .with(settings::COLOR_WARNING)
                    .bold()
            );
        } else {
            eprint!("{}", settings::PROMPT_APPROVAL);
        }
        let _ = io::stderr().flush();
    }

    /// Print a planner message as a markdown-laid-out block on stdout.
    pub fn agent_message(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let rendered = render_markdown_for_terminal(text);
        let preview = head_preview(&rendered, usize::MAX);
        let rows = plain_rows(&preview, block_content_width(), BlockWrapMode::Wrap);
        self.render_rows(rows, SnippetTone::Agent, BlockTarget::Stdout);
    }

    /// Start a spinner while a planner request is in flight.
    pub fn progress(&self, label: &str) -> ProgressHandle {
        start_progress(label, self.color)
    }

    pub fn warn(&self, msg: &str) {
        self.labeled(settings::LABEL_WARNING, settings::COLOR_WARNING, msg);
    }

    pub fn error(&self, msg: &str) {
        self.labeled(settings::LABEL_ERROR, settings::COLOR_ERROR, msg);
    }

    /// Explain why the loop stopped without finishing.
    pub fn blocked(&self, reason: &str) {
        self.labeled(settings::LABEL_BLOCKED, settings::COLOR_WARNING, reason);
    }

    fn labeled(&self, label: &str, color: Color, msg: &str) {
        self.close_live_line();
        if self.color {
            eprintln!("\r{} {msg}", label.with(color).bold());
        } else {
            eprintln!("\r{label} {msg}");
        }
        mark_stream_nonblank(BlockTarget::Stderr);
    }

    /// Print a small section header.
    pub fn section(&self, title: &str) {
        if self.color {
            eprintln!(
                "\r{} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                title.with(settings::COLOR_SECTION_TITLE).bold()
            );
        } else {
            eprintln!("\r{title}:");
        }
        mark_stream_nonblank(BlockTarget::Stderr);
    }

    /// Print a lifecycle line, e.g. a loop status change.
    pub fn activity(&self, text: &str) {
        self.close_live_line();
        if self.color {
            eprintln!(
                "\r{} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                text.with(settings::COLOR_ACTIVITY_TEXT).bold()
            );
        } else {
            eprintln!("\r{text}");
        }
        mark_stream_nonblank(BlockTarget::Stderr);
    }

    /// Print a key/value line under a section.
    pub fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "\r{}{} {}",
                settings::INDENT_1,
                format!("{key}:").with(settings::COLOR_FIELD_KEY),
                value.with(settings::COLOR_FIELD_VALUE),
            );
        } else {
            eprintln!("\r{}{key}: {value}", settings::INDENT_1);
        }
        mark_stream_nonblank(BlockTarget::Stderr);
    }

    pub fn detail(&self, text: &str) {
        if self.color {
            eprintln!(
                "\r{}{}",
                settings::INDENT_1,
                text.with(settings::COLOR_FIELD_VALUE)
            );
        } else {
            eprintln!("\r{}{text}", settings::INDENT_1);
        }
        mark_stream_nonblank(BlockTarget::Stderr);
    }

    /// Announce that a command started running.
    pub fn run_started(&self, command: &str) {
        let first_line = command.lines().next().unwrap_or_default();
        let more = if command.lines().nth(1).is_some() {
            " …"
        } else {
            ""
        };
        if self.color {
            eprintln!(
                "\r{}{} {}{more}",
                settings::INDENT_1,
                settings::GLYPH_RUN.with(settings::COLOR_RUN_GLYPH),
                first_line.with(settings::COLOR_RUN_COMMAND).bold(),
            );
        } else {
            eprintln!(
                "\r{}{} {first_line}{more}",
                settings::INDENT_1,
                settings::GLYPH_RUN_PLAIN
            );
        }
        mark_stream_nonblank(BlockTarget::Stderr);
    }

    /// Write one live output chunk exactly as received.
    pub fn output_chunk(&self, stream: OutputStream, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        let mut err = io::stderr();
        let written = if self.color {
            let color = match stream {
                OutputStream::Stdout => settings::COLOR_STREAM_STDOUT,
                OutputStream::Stderr => settings::COLOR_STREAM_STDERR,
            };
            write!(err, "{}", chunk.with(color))
        } else {
            write!(err, "{chunk}")
        };
        let _ = written.and_then(|_| err.flush());
        if let Ok(mut state) = stream_state().lock() {
            state.live_line_open = !chunk.ends_with('\n');
            state.stderr_blank = false;
        }
    }

    /// Summarize a finished run on one line.
    pub fn run_finished(&self, result: &ExecutionResult) {
        self.close_live_line();
        let elapsed = format!("{:.1}s", result.elapsed().as_secs_f64());
        let (text, color) = match result.outcome() {
            ExecutionOutcome::Succeeded => {
                (format!("done in {elapsed}"), settings::COLOR_RESULT_OK)
            }
            _ => (
                format!("{} after {elapsed}", result.summary()),
                settings::COLOR_RESULT_FAILED,
            ),
        };
        if self.color {
            eprintln!(
                "\r{}{} {}",
                settings::INDENT_1,
                settings::GLYPH_RESULT.with(settings::COLOR_META),
                text.with(color),
            );
        } else {
            eprintln!(
                "\r{}{} {text}",
                settings::INDENT_1,
                settings::GLYPH_RESULT_PLAIN
            );
        }
        mark_stream_nonblank(BlockTarget::Stderr);
    }

    /// Replay captured output as a clipped block (used when live streaming
    /// is off). Shows the tail; the end of the output is usually the point.
    pub fn command_output_block(&self, text: &str) {
        let preview = tail_preview(text, settings::SNIPPET_PREVIEW_LINES);
        let rows = plain_rows(&preview, block_content_width(), BlockWrapMode::Clip);
        self.render_rows(rows, SnippetTone::Output, BlockTarget::Stderr);
    }

    /// Show a command awaiting approval, highlighted for `shell_program`.
    pub fn approval_block(
        &self,
        command: &str,
        severity: Severity,
        reason: &str,
        shell_program: &str,
    ) {
        let severity_text = format!("{severity} severity");
        if self.color {
            let color = match severity {
                Severity::Low => settings::COLOR_SEVERITY_LOW,
                Severity::High => settings::COLOR_SEVERITY_HIGH,
            };
            eprintln!(
                "\r{} {} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                "approval needed".with(settings::COLOR_WARNING).bold(),
                format!("({severity_text})").with(color),
            );
        } else {
            eprintln!("\rapproval needed ({severity_text})");
        }
        if !reason.trim().is_empty() {
            self.detail(reason.trim());
        }
        mark_stream_nonblank(BlockTarget::Stderr);

        let formatted = format_approval_command(command);
        let preview = head_preview(&formatted, settings::SNIPPET_PREVIEW_LINES);
        let width = block_content_width();
        let rows = match highlight_command_lines(shell_program, &preview.lines) {
            Some(tokens_by_line) if self.color => {
                let mut rows: Vec<RenderedRow> = tokens_by_line
                    .iter()
                    .flat_map(|tokens| split_highlighted_line(tokens, width, BlockWrapMode::Wrap))
                    .collect();
                push_omitted_marker(&mut rows, preview.omitted);
                rows
            }
            _ => plain_rows(&preview, width, BlockWrapMode::Wrap),
        };
        self.render_rows(rows, SnippetTone::Approval, BlockTarget::Stderr);
    }

    /// Terminate a live output line that ended without a newline.
    fn close_live_line(&self) {
        let open = stream_state()
            .lock()
            .map(|mut state| std::mem::take(&mut state.live_line_open))
            .unwrap_or(false);
        if open {
            eprintln!();
        }
    }

    fn render_rows(&self, rows: Vec<RenderedRow>, tone: SnippetTone, target: BlockTarget) {
        if rows.is_empty() {
            return;
        }
        self.close_live_line();
        let width = block_content_width();
        let write_result = match target {
            BlockTarget::Stdout => self.write_block(&mut io::stdout(), &rows, width, tone, target),
            BlockTarget::Stderr => self.write_block(&mut io::stderr(), &rows, width, tone, target),
        };
        if write_result.is_err() {
            // Queueing failed; fall back to plain lines so nothing is lost.
            for row in rows {
                match target {
                    BlockTarget::Stdout => {
                        println!("{}{}", settings::INDENT_1, row.as_plain_text())
                    }
                    BlockTarget::Stderr => {
                        eprintln!("{}{}", settings::INDENT_1, row.as_plain_text())
                    }
                }
            }
            mark_stream_blank(target, false);
        }
    }

    fn write_block<W: Write + QueueableCommand>(
        &self,
        out: &mut W,
        rows: &[RenderedRow],
        width: usize,
        tone: SnippetTone,
        target: BlockTarget,
    ) -> io::Result<()> {
        out.queue(Print("\r"))?;
        if !stream_is_blank(target) {
            out.queue(Print("\r\n"))?;
        }
        self.write_rows(out, rows, width, tone)?;
        out.queue(Print("\r\n"))?;
        out.flush()?;
        mark_stream_blank(target, true);
        Ok(())
    }

    fn write_rows<W: Write + QueueableCommand>(
        &self,
        out: &mut W,
        rows: &[RenderedRow],
        width: usize,
        tone: SnippetTone,
    ) -> io::Result<()> {
        let bg = tone.bg();
        let default_fg = tone.fg();

        for row in rows {
            out.queue(Print("\r"))?;
            out.queue(Print(settings::INDENT_1))?;
            if !self.color {
                out.queue(Print(clip_to_width(&row.as_plain_text(), width)))?;
                out.queue(Print("\r\n"))?;
                continue;
            }

            let mut used = 0usize;
            match &row.content {
                RowContent::Plain(text) => {
                    let clipped = clip_to_width(text, width);
                    used = visible_width(&clipped);
                    let fg = if row.muted {
                        settings::COLOR_SNIPPET_TRUNCATED
                    } else {
                        default_fg
                    };
                    out.queue(PrintStyledContent(clipped.with(fg).on(bg)))?;
                }
                RowContent::Highlighted(tokens) => {
                    for token in tokens {
                        if used >= width {
                            break;
                        }
                        let clipped = clip_to_width(&token.text, width - used);
                        if clipped.is_empty() {
                            continue;
                        }
                        used += visible_width(&clipped);
                        let (r, g, b) = token.rgb;
                        let mut styled = clipped.as_str().with(Color::Rgb { r, g, b }).on(bg);
                        if token.bold {
                            styled = styled.bold();
                        }
                        if token.italic {
                            styled = styled.italic();
                        }
                        if token.underline {
                            styled = styled.underlined();
                        }
                        out.queue(PrintStyledContent(styled))?;
                    }
                }
            }
            let pad = width.saturating_sub(used);
            if pad > 0 {
                out.queue(PrintStyledContent(" ".repeat(pad).with(default_fg).on(bg)))?;
            }
            out.queue(Print("\r\n"))?;
        }
        Ok(())
    }
}

/// `$ ` before the first line, two spaces before continuation lines.
pub fn format_approval_command(command: &str) -> String {
    let mut lines = command.lines();
    let Some(first) = lines.next() else {
        return "$ ".to_string();
    };
    let mut out = format!("$ {first}");
    for line in lines {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}

fn block_content_width() -> usize {
    let cols = terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(settings::BLOCK_FALLBACK_COLUMNS);
    let indent = settings::INDENT_1.chars().count();
    cols.saturating_sub(indent + settings::BLOCK_RIGHT_MARGIN)
        .max(1)
}

fn plain_rows(
    preview: &SnippetPreview<'_>,
    width: usize,
    mode: BlockWrapMode,
) -> Vec<RenderedRow> {
    let mut rows: Vec<RenderedRow> = preview
        .lines
        .iter()
        .flat_map(|line| match mode {
            BlockWrapMode::Wrap => wrap_for_block(line, width)
                .into_iter()
                .map(RenderedRow::plain)
                .collect::<Vec<_>>(),
            BlockWrapMode::Clip => vec![RenderedRow::plain(clip_to_width(line, width))],
        })
        .collect();
    push_omitted_marker(&mut rows, preview.omitted);
    rows
}

fn push_omitted_marker(rows: &mut Vec<RenderedRow>, omitted: usize) {
    if omitted > 0 {
        rows.push(RenderedRow::muted(format!("...{omitted} more lines...")));
    }
}

/// Split highlighted tokens into rows while preserving style spans.
fn split_highlighted_line(
    tokens: &[StyledToken],
    width: usize,
    wrap_mode: BlockWrapMode,
) -> Vec<RenderedRow> {
    if tokens.is_empty() {
        return vec![RenderedRow::plain(String::new())];
    }

    let mut rows = Vec::<Vec<StyledToken>>::new();
    let mut current = Vec::<StyledToken>::new();
    let mut used = 0usize;

    'tokens: for token in tokens {
        for ch in token.text.chars() {
            if used >= width {
                match wrap_mode {
                    BlockWrapMode::Wrap => {
                        rows.push(std::mem::take(&mut current));
                        used = 0;
                    }
                    BlockWrapMode::Clip => break 'tokens,
                }
            }
            push_highlighted_char(&mut current, token, ch);
            used += 1;
        }
    }
    rows.push(current);

    rows.into_iter().map(RenderedRow::highlighted).collect()
}

/// Append one char, merging into the previous token when styles match.
fn push_highlighted_char(current: &mut Vec<StyledToken>, style: &StyledToken, ch: char) {
    if let Some(last) = current.last_mut() {
        if same_style(last, style) {
            last.text.push(ch);
            return;
        }
    }
    current.push(StyledToken {
        text: ch.to_string(),
        ..style.clone()
    });
}

fn same_style(a: &StyledToken, b: &StyledToken) -> bool {
    a.rgb == b.rgb && a.bold == b.bold && a.italic == b.italic && a.underline == b.underline
}

fn stream_is_blank(target: BlockTarget) -> bool {
    stream_state()
        .lock()
        .map(|state| state.is_blank(target))
        .unwrap_or(false)
}

fn mark_stream_nonblank(target: BlockTarget) {
    mark_stream_blank(target, false);
}

fn mark_stream_blank(target: BlockTarget, blank: bool) {
    if let Ok(mut state) = stream_state().lock() {
        state.set_blank(target, blank);
    }
}
