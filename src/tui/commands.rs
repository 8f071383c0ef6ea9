//! Slash commands available at the interactive prompt.

/// Static slash command metadata used by parsing and `/help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashCommand {
    pub name: &'static str,
    pub description: &'static str,
}

pub const SLASH_COMMANDS: [SlashCommand; 9] = [
    SlashCommand {
        name: "/approve",
        description: "Run the command waiting for approval.",
    },
    SlashCommand {
        name: "/reject",
        description: "Decline the command waiting for approval.",
    },
    SlashCommand {
        name: "/status",
        description: "Show planner, session, and loop state.",
    },
    SlashCommand {
        name: "/log",
        description: "Replay the session log: /log [count].",
    },
    SlashCommand {
        name: "/new",
        description: "Forget this session and start a fresh one.",
    },
    SlashCommand {
        name: "/help",
        description: "List available slash commands.",
    },
    SlashCommand {
        name: "/quit",
        description: "Exit interactive mode.",
    },
    SlashCommand {
        name: "/exit",
        description: "Exit interactive mode.",
    },
    SlashCommand {
        name: "/q",
        description: "Short alias for exit.",
    },
];

/// Parsed slash command actions consumed by the prompt loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommandAction {
    Approve,
    Reject,
    Status,
    /// Show the last `n` log entries, or all of them.
    Log(Option<usize>),
    New,
    Help,
    Quit,
    Unknown(String),
}

/// Parse a slash command from user input.
///
/// Returns `None` if the input is not a slash command.
pub fn parse_slash_command(input: &str) -> Option<SlashCommandAction> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut words = trimmed.split_whitespace();
    let token = words.next().unwrap_or("").to_ascii_lowercase();

    let action = match token.as_str() {
        "/" | "/help" => SlashCommandAction::Help,
        "/quit" | "/exit" | "/q" => SlashCommandAction::Quit,
        "/approve" | "/yes" => SlashCommandAction::Approve,
        "/reject" | "/no" => SlashCommandAction::Reject,
        "/status" => SlashCommandAction::Status,
        "/log" => match words.next() {
            None => SlashCommandAction::Log(None),
            Some(count) => match count.parse::<usize>() {
                Ok(count) => SlashCommandAction::Log(Some(count)),
                Err(_) => SlashCommandAction::Unknown(trimmed.to_string()),
            },
        },
        "/new" | "/reset" => SlashCommandAction::New,
        other => SlashCommandAction::Unknown(other.to_string()),
    };

    Some(action)
}

/// Interpret a bare answer typed at the approval prompt.
///
/// `Some(true)` approves, `Some(false)` rejects, `None` means the line is
/// something else (a slash command or a new message).
pub fn parse_approval_answer(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
