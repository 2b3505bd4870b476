use std::sync::LazyLock;

use regex::Regex;

use super::language::resolve_alias;

/// Canonical command names offered for completion, in display order.
pub const COMMANDS: &[&str] = &[
    "goto", "open", "search", "next", "prev", "today", "write", "quit", "wq", "help", "copy",
    "cut", "paste", "delete",
];

/// Commands that take an argument; completing one appends a space.
pub const COMMANDS_WITH_ARGS: &[&str] = &["goto", "open", "search", "copy", "cut", "delete"];

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading pattern is valid"));

/// What is being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionKind {
    #[default]
    Command,
    Argument,
}

/// Outcome of a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Nothing matches.
    None,
    /// Exactly one match; `text` replaces the whole command line.
    Inline { text: String, kind: CompletionKind },
    /// Several matches for the user to pick from.
    Candidates {
        items: Vec<String>,
        kind: CompletionKind,
    },
}

/// A markdown heading in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Zero-based line index.
    pub line: usize,
    /// Heading text without the `#` markers, trimmed.
    pub title: String,
}

/// Level and trimmed title of a markdown heading line.
///
/// A heading is one to six `#`, whitespace, then a title that is not blank.
pub fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING_RE.captures(line)?;
    let level = u8::try_from(caps.get(1)?.as_str().len()).ok()?;
    let title = caps.get(2)?.as_str().trim();
    (!title.is_empty()).then_some((level, title))
}

/// Collect every `#`..`######` heading in document order.
pub fn extract_headings(lines: &[String]) -> Vec<Heading> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(line, text)| {
            parse_heading(text).map(|(_, title)| Heading {
                line,
                title: title.to_string(),
            })
        })
        .collect()
}

/// Complete partial command-line text.
///
/// `lines` is the current document, used for `goto` heading completion.
/// Only leading whitespace is ignored: a command followed by whitespace
/// switches to argument completion.
pub fn complete(input: &str, lines: Option<&[String]>) -> Completion {
    let input = input.trim_start();
    if input.is_empty() {
        return Completion::Candidates {
            items: COMMANDS.iter().map(ToString::to_string).collect(),
            kind: CompletionKind::Command,
        };
    }

    let Some((token, rest)) = input.split_once(char::is_whitespace) else {
        return complete_command(&input.to_lowercase());
    };

    let command = resolve_alias(&token.to_lowercase()).to_string();
    match (command.as_str(), lines) {
        ("goto", Some(lines)) => complete_heading(rest, lines),
        _ => Completion::None,
    }
}

fn complete_command(prefix: &str) -> Completion {
    let matches: Vec<&str> = COMMANDS
        .iter()
        .copied()
        .filter(|cmd| cmd.starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [] => Completion::None,
        [only] => Completion::Inline {
            text: command_with_suffix(only),
            kind: CompletionKind::Command,
        },
        _ => Completion::Candidates {
            items: matches.iter().map(ToString::to_string).collect(),
            kind: CompletionKind::Command,
        },
    }
}

fn complete_heading(arg: &str, lines: &[String]) -> Completion {
    let prefix = arg.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let matches: Vec<String> = extract_headings(lines)
        .into_iter()
        .map(|heading| heading.title)
        .filter(|title| title.to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Completion::None,
        1 if !prefix.is_empty() => Completion::Inline {
            text: format!("goto {}", matches[0]),
            kind: CompletionKind::Argument,
        },
        _ => Completion::Candidates {
            items: matches,
            kind: CompletionKind::Argument,
        },
    }
}

fn command_with_suffix(cmd: &str) -> String {
    if COMMANDS_WITH_ARGS.contains(&cmd) {
        format!("{cmd} ")
    } else {
        cmd.to_string()
    }
}

/// One step of overlay navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

/// The candidate list shown above the command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutocompleteState {
    pub active: bool,
    pub candidates: Vec<String>,
    pub selected_index: usize,
    pub kind: CompletionKind,
}

impl AutocompleteState {
    /// Open the overlay on `candidates` with the first one selected.
    pub fn new(candidates: Vec<String>, kind: CompletionKind) -> Self {
        Self {
            active: !candidates.is_empty(),
            candidates,
            selected_index: 0,
            kind,
        }
    }

    /// Move the selection one step, saturating at both ends.
    pub fn navigate(&mut self, step: Step) {
        if !self.active || self.candidates.is_empty() {
            return;
        }
        let last = self.candidates.len() - 1;
        self.selected_index = match step {
            Step::Up => self.selected_index.saturating_sub(1),
            Step::Down => (self.selected_index + 1).min(last),
        };
    }

    /// The highlighted candidate, if the overlay is open.
    pub fn selected(&self) -> Option<&str> {
        if !self.active {
            return None;
        }
        self.candidates.get(self.selected_index).map(String::as_str)
    }

    /// Command line text that accepting the selection produces.
    pub fn accepted_input(&self) -> Option<String> {
        let selected = self.selected()?;
        Some(match self.kind {
            CompletionKind::Command => command_with_suffix(selected),
            CompletionKind::Argument => format!("goto {selected}"),
        })
    }
}
