/// Shorthand names mapped to their canonical command.
const ALIASES: &[(&str, &str)] = &[
    ("n", "next"),
    ("p", "prev"),
    ("t", "today"),
    ("o", "open"),
    ("g", "goto"),
    ("s", "search"),
    ("w", "write"),
    ("save", "write"),
    ("q", "quit"),
    ("q!", "quit!"),
    ("h", "help"),
    ("?", "help"),
    ("y", "copy"),
    ("x", "cut"),
    ("d", "delete"),
];

const OPEN_USAGE: &str = "Usage: :open <date> (e.g., :open 2025-12-15 or :open yesterday)";
const GOTO_USAGE: &str = "Usage: :goto <heading> (e.g., :goto Experiments)";
const SEARCH_USAGE: &str = "Usage: :search <query>";

/// A command line split into its canonical name and arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    /// Alias-resolved, lowercased command name. Empty for blank input.
    pub name: String,
    /// Remaining whitespace-separated tokens, case preserved.
    pub args: Vec<String>,
}

impl ParsedCommand {
    /// Arguments joined back with single spaces.
    pub fn joined_args(&self) -> String {
        self.args.join(" ")
    }
}

/// How many lines a line-range command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCount {
    /// This many lines, starting at the cursor line.
    Lines(usize),
    /// The whole note.
    All,
}

/// The effect a command asks for. Produced by [`execute`], never performed by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Switch to another day: `next`, `prev`, `today`, or a date expression.
    Navigation(String),
    /// Jump to a heading in the current note.
    Goto(String),
    /// Search every note.
    Search(String),
    Save,
    Quit,
    Help,
    Copy(LineCount),
    Cut(LineCount),
    Paste,
    Delete(LineCount),
    /// Usage error or unknown command, shown to the user.
    Error(String),
    /// Nothing to do (blank command line).
    Success,
}

/// Resolve a lowercased token through the alias table.
pub fn resolve_alias(token: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map_or(token, |(_, canonical)| canonical)
}

/// Parse a raw command line (without the leading `:`).
pub fn parse(raw: &str) -> ParsedCommand {
    let mut tokens = raw.split_whitespace();
    let Some(first) = tokens.next() else {
        return ParsedCommand::default();
    };
    let lowered = first.to_lowercase();
    ParsedCommand {
        name: resolve_alias(&lowered).to_string(),
        args: tokens.map(String::from).collect(),
    }
}

/// Map a parsed command to the effect it requests.
pub fn execute(cmd: &ParsedCommand) -> CommandResult {
    match cmd.name.as_str() {
        "next" | "prev" | "today" => CommandResult::Navigation(cmd.name.clone()),
        "open" => {
            let date = cmd.joined_args().to_lowercase();
            if date.is_empty() {
                CommandResult::Error(OPEN_USAGE.to_string())
            } else {
                CommandResult::Navigation(date)
            }
        }
        "goto" => non_empty(cmd.joined_args(), GOTO_USAGE, CommandResult::Goto),
        "search" => non_empty(cmd.joined_args(), SEARCH_USAGE, CommandResult::Search),
        "write" | "wq" => CommandResult::Save,
        "quit" | "quit!" => CommandResult::Quit,
        "help" => CommandResult::Help,
        "copy" => line_count(cmd, CommandResult::Copy),
        "cut" => line_count(cmd, CommandResult::Cut),
        "delete" => line_count(cmd, CommandResult::Delete),
        "paste" => CommandResult::Paste,
        "" => CommandResult::Success,
        other => CommandResult::Error(format!("Unknown command: {other}")),
    }
}

/// Command reference shown in the help overlay.
pub const fn help_lines() -> &'static [&'static str] {
    &[
        ":next, :n            Go to next day",
        ":prev, :p            Go to previous day",
        ":today, :t           Go to today",
        ":open <date>, :o     Open a date (2025-12-15, 12/15/2025, yesterday)",
        ":goto <heading>, :g  Jump to a heading in this note",
        ":search <query>, :s  Search all notes",
        ":write, :w           Save the current note",
        ":quit, :q            Quit (saves first)",
        ":quit!, :q!          Quit without saving",
        ":wq                  Save and quit",
        ":copy [n|all], :y    Copy lines to the clipboard",
        ":cut [n|all], :x     Cut lines to the clipboard",
        ":paste               Paste clipboard lines below the cursor",
        ":delete [n|all], :d  Delete lines",
        ":help, :?            Show this help",
    ]
}

fn non_empty(arg: String, usage: &str, wrap: fn(String) -> CommandResult) -> CommandResult {
    if arg.is_empty() {
        CommandResult::Error(usage.to_string())
    } else {
        wrap(arg)
    }
}

fn line_count(cmd: &ParsedCommand, wrap: fn(LineCount) -> CommandResult) -> CommandResult {
    let count = match cmd.args.as_slice() {
        [] => Some(LineCount::Lines(1)),
        [arg] if arg.eq_ignore_ascii_case("all") => Some(LineCount::All),
        [arg] => arg
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(LineCount::Lines),
        _ => None,
    };
    count.map_or_else(
        || CommandResult::Error(format!("Usage: :{} [count|all]", cmd.name)),
        wrap,
    )
}
