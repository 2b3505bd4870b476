//! The `:` command line.
//!
//! [`parse`] resolves aliases, [`execute`] maps a command to the effect it
//! requests, and [`complete`] drives Tab completion and the candidate overlay.

mod autocomplete;
mod language;

pub use autocomplete::{
    AutocompleteState, COMMANDS, COMMANDS_WITH_ARGS, Completion, CompletionKind, Heading, Step,
    complete, extract_headings, parse_heading,
};
pub use language::{
    CommandResult, LineCount, ParsedCommand, execute, help_lines, parse, resolve_alias,
};
