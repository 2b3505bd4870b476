use chrono::NaiveDate;

use crate::app::Model;
use crate::app::effects::{DateTarget, Effect};
use crate::app::model::{ToastLevel, View};
use crate::command::{
    self, AutocompleteState, CommandResult, Completion, LineCount, ParsedCommand, Step,
};
use crate::editor::{Direction, EditorBuffer, Mode};
use crate::store::{Note, SearchResult};

/// All possible events and actions in the application.
///
/// These represent user input and the results of side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Application
    /// Quit, saving first if there are unsaved changes
    Quit,
    /// Quit without saving
    ForceQuit,
    /// Save the current note
    Save,

    // Autocomplete overlay
    AutocompleteUp,
    AutocompleteDown,
    /// Put the selected candidate on the command line
    AutocompleteAccept,
    /// Close the overlay, keep the command line
    AutocompleteCancel,

    // Command line
    /// Open an empty command line
    StartCommand,
    /// Open the command line with initial text
    StartCommandWith(String),
    /// Append a character to the command line
    CommandInput(char),
    /// Remove the last command-line character (closes the line when empty)
    CommandBackspace,
    /// Tab completion
    RequestCompletion,
    /// Run the command line
    ExecuteCommand,
    /// Close the command line without running it
    CancelCommand,

    // Search results
    ResultUp,
    ResultDown,
    /// Open the note of the selected result
    SelectResult,
    /// Return to the editor
    ExitResults,

    // Motion
    MoveCursor(Direction),
    LineStart,
    LineEnd,
    DocStart,
    DocEnd,

    // Editing
    /// Enter Insert mode at the cursor
    EnterInsert,
    /// Enter Insert mode after the cursor
    EnterInsertAppend,
    /// Open an indented line below and enter Insert mode
    OpenLineBelow,
    /// Open an indented line above and enter Insert mode
    OpenLineAbove,
    /// Delete the character under the cursor
    DeleteUnderCursor,
    /// Insert text at the cursor
    InsertText(String),
    /// Split line at cursor (Enter)
    SplitLine,
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Return to Normal mode
    ExitInsert,

    // Day navigation
    PrevDay,
    NextDay,

    // Overlays
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Effect results
    NoteLoaded {
        note: Note,
        jump_to_line: Option<usize>,
    },
    NavigationFailed(String),
    Saved(NaiveDate),
    SaveFailed(String),
    SearchCompleted(Vec<SearchResult>),
    Pasted(String),
    ClipboardEmpty,
}

impl Message {
    /// Messages that leave an open autocomplete overlay in place.
    const fn keeps_overlay(&self) -> bool {
        matches!(
            self,
            Self::AutocompleteUp
                | Self::AutocompleteDown
                | Self::AutocompleteAccept
                | Self::AutocompleteCancel
                | Self::Resize(..)
                | Self::NoteLoaded { .. }
                | Self::NavigationFailed(_)
                | Self::Saved(_)
                | Self::SaveFailed(_)
                | Self::SearchCompleted(_)
                | Self::Pasted(_)
                | Self::ClipboardEmpty
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. Side effects
/// are queued on the model, never performed.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Any key other than overlay navigation closes the overlay, then is
    // handled normally.
    if model.autocomplete.active && !msg.keeps_overlay() {
        model.autocomplete = AutocompleteState::default();
    }

    match msg {
        // Application
        Message::Quit => quit(&mut model),
        Message::ForceQuit => model.push_effect(Effect::Exit),
        Message::Save => persist(&mut model),

        // Autocomplete overlay
        Message::AutocompleteUp => model.autocomplete.navigate(Step::Up),
        Message::AutocompleteDown => model.autocomplete.navigate(Step::Down),
        Message::AutocompleteAccept => accept_completion(&mut model),
        Message::AutocompleteCancel => model.autocomplete = AutocompleteState::default(),

        // Command line
        Message::StartCommand => model.command_line.open(""),
        Message::StartCommandWith(text) => model.command_line.open(text),
        Message::CommandInput(c) => {
            if model.command_line.active {
                model.command_line.input.push(c);
            }
        }
        Message::CommandBackspace => {
            if model.command_line.input.pop().is_none() {
                model.command_line.clear();
            }
        }
        Message::RequestCompletion => request_completion(&mut model),
        Message::ExecuteCommand => execute_command_line(&mut model),
        Message::CancelCommand => model.command_line.clear(),

        // Search results
        Message::ResultUp => {
            model.selected_result = model.selected_result.saturating_sub(1);
        }
        Message::ResultDown => {
            let max = model.search_results.len().saturating_sub(1);
            model.selected_result = (model.selected_result + 1).min(max);
        }
        Message::SelectResult => {
            if let Some(result) = model.current_result() {
                let target = DateTarget::Date(result.date);
                let line = result.line.saturating_sub(1);
                navigate(&mut model, target, Some(line));
            }
        }
        Message::ExitResults => model.view = View::Editor,

        // Motion
        Message::MoveCursor(direction) => {
            let height = model.editor_height();
            model.buffer.move_cursor(direction, model.mode, height);
        }
        Message::LineStart => model.buffer.move_to_line_start(),
        Message::LineEnd => model.buffer.move_to_line_end(model.mode),
        Message::DocStart => model.buffer.move_to_doc_start(),
        Message::DocEnd => model.buffer.move_to_doc_end(),

        // Editing
        Message::EnterInsert => model.mode = Mode::Insert,
        Message::EnterInsertAppend => {
            model.mode = Mode::Insert;
            model.buffer.move_horizontal(1, Mode::Insert);
        }
        Message::OpenLineBelow => {
            model.buffer.insert_line_below(true);
            model.mode = Mode::Insert;
        }
        Message::OpenLineAbove => {
            model.buffer.insert_line_above(true);
            model.mode = Mode::Insert;
        }
        Message::DeleteUnderCursor => {
            model.buffer.delete_under_cursor(model.mode);
        }
        Message::InsertText(text) => model.buffer.insert_text(&text),
        Message::SplitLine => model.buffer.split_line_at_cursor(),
        Message::DeleteBack => {
            model.buffer.delete_backward();
        }
        Message::ExitInsert => model.mode = Mode::Normal,

        // Day navigation
        Message::PrevDay => navigate(&mut model, DateTarget::Prev, None),
        Message::NextDay => navigate(&mut model, DateTarget::Next, None),

        // Overlays
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,

        // Window
        Message::Resize(width, height) => {
            model.width = width;
            model.height = height;
        }

        // Effect results
        Message::NoteLoaded { note, jump_to_line } => {
            model.buffer = EditorBuffer::from_text(&note.content);
            model.current_date = note.date;
            model.note_exists = note.exists;
            model.mode = Mode::Normal;
            model.view = View::Editor;
            model.pending_navigation = false;
            if let Some(line) = jump_to_line {
                model.buffer.move_to(line, 0, Mode::Normal);
            }
        }
        Message::NavigationFailed(reason) => {
            model.pending_navigation = false;
            model.show_toast(ToastLevel::Error, reason);
        }
        Message::Saved(date) => {
            if date == model.current_date {
                model.buffer.mark_clean();
                model.note_exists = true;
            }
            model.show_toast(ToastLevel::Info, "Saved!");
        }
        Message::SaveFailed(reason) => {
            // Whatever was queued behind the save would discard the edits.
            model.clear_effects();
            model.pending_navigation = false;
            model.show_toast(ToastLevel::Error, format!("Save failed: {reason}"));
        }
        Message::SearchCompleted(results) => {
            model.command_line.clear();
            let count = results.len();
            model.search_results = results;
            model.selected_result = 0;
            model.view = View::Results;
            if count == 0 {
                let query = model.search_query.clone();
                model.show_toast(ToastLevel::Info, format!("No matches for \"{query}\""));
            }
        }
        Message::Pasted(text) => {
            match model.buffer.insert_lines_below(&text) {
                0 => model.show_toast(ToastLevel::Warning, "Clipboard is empty"),
                count => {
                    model.show_toast(ToastLevel::Info, format!("Pasted {}", plural_lines(count)));
                }
            }
        }
        Message::ClipboardEmpty => model.show_toast(ToastLevel::Warning, "Clipboard is empty"),
    }

    let height = model.editor_height();
    model.buffer.scroll_to_cursor(height);
    model
}

/// Put the overlay's selection on the command line and close the overlay.
fn accept_completion(model: &mut Model) {
    if let Some(text) = model.autocomplete.accepted_input() {
        model.command_line.input = text;
    }
    model.autocomplete = AutocompleteState::default();
}

fn quit(model: &mut Model) {
    if model.is_dirty() {
        persist(model);
    }
    model.push_effect(Effect::Exit);
}

fn persist(model: &mut Model) {
    model.push_effect(Effect::Persist {
        date: model.current_date,
        content: model.buffer.text(),
    });
}

/// Switch to another day, saving unsaved edits first.
fn navigate(model: &mut Model, target: DateTarget, jump_to_line: Option<usize>) {
    if model.pending_navigation {
        model.show_toast(ToastLevel::Warning, "Navigation already in progress");
        return;
    }
    if model.is_dirty() {
        persist(model);
    }
    model.pending_navigation = true;
    model.push_effect(Effect::Load {
        target,
        jump_to_line,
    });
}

fn request_completion(model: &mut Model) {
    if !model.command_line.active {
        return;
    }
    let completion = command::complete(&model.command_line.input, Some(model.buffer.lines()));
    match completion {
        Completion::None => {}
        Completion::Inline { text, .. } => model.command_line.input = text,
        Completion::Candidates { items, kind } => {
            let overlay = AutocompleteState::new(items, kind);
            if overlay.candidates.len() == 1 {
                if let Some(text) = overlay.accepted_input() {
                    model.command_line.input = text;
                }
            } else {
                model.autocomplete = overlay;
            }
        }
    }
}

fn execute_command_line(model: &mut Model) {
    if !model.command_line.active {
        return;
    }
    let parsed = command::parse(&model.command_line.input);
    let result = command::execute(&parsed);
    tracing::debug!(command = %parsed.name, ?result, "execute");
    if !matches!(result, CommandResult::Search(_)) {
        model.command_line.clear();
    }
    apply_command(model, &parsed, result);
}

fn apply_command(model: &mut Model, parsed: &ParsedCommand, result: CommandResult) {
    match result {
        CommandResult::Navigation(spec) => {
            let target = match spec.as_str() {
                "next" => DateTarget::Next,
                "prev" => DateTarget::Prev,
                "today" => DateTarget::Today,
                _ => DateTarget::Spec(spec),
            };
            navigate(model, target, None);
        }
        CommandResult::Goto(heading) => goto_heading(model, &heading),
        CommandResult::Search(query) => {
            model.search_query.clone_from(&query);
            model.push_effect(Effect::Search { query });
        }
        CommandResult::Save => {
            persist(model);
            if parsed.name == "wq" {
                model.push_effect(Effect::Exit);
            }
        }
        CommandResult::Quit => {
            if parsed.name == "quit!" {
                model.push_effect(Effect::Exit);
            } else {
                quit(model);
            }
        }
        CommandResult::Help => model.help_visible = true,
        CommandResult::Copy(count) => {
            let (start, lines) = line_range(model, count);
            model.push_effect(Effect::CopyToClipboard(model.buffer.lines_text(start, lines)));
            model.show_toast(ToastLevel::Info, format!("Copied {}", plural_lines(lines)));
        }
        CommandResult::Cut(count) => {
            let (start, lines) = line_range(model, count);
            model.push_effect(Effect::CopyToClipboard(model.buffer.lines_text(start, lines)));
            model.buffer.delete_lines(start, lines, model.mode);
            model.show_toast(ToastLevel::Info, format!("Cut {}", plural_lines(lines)));
        }
        CommandResult::Paste => model.push_effect(Effect::ReadClipboard),
        CommandResult::Delete(count) => {
            let (start, lines) = line_range(model, count);
            model.buffer.delete_lines(start, lines, model.mode);
            model.show_toast(ToastLevel::Info, format!("Deleted {}", plural_lines(lines)));
        }
        CommandResult::Error(message) => model.show_toast(ToastLevel::Error, message),
        CommandResult::Success => {}
    }
}

/// First line and clamped length of the range a line-count command covers.
fn line_range(model: &Model, count: LineCount) -> (usize, usize) {
    let total = model.buffer.line_count();
    match count {
        LineCount::All => (0, total),
        LineCount::Lines(n) => {
            let start = model.buffer.cursor().line;
            (start, n.min(total - start))
        }
    }
}

fn plural_lines(count: usize) -> String {
    if count == 1 {
        "1 line".to_string()
    } else {
        format!("{count} lines")
    }
}

/// Jump to the first heading titled `query`, else the first starting with it.
fn goto_heading(model: &mut Model, query: &str) {
    let headings = command::extract_headings(model.buffer.lines());
    let wanted = query.to_lowercase();
    let target = headings
        .iter()
        .find(|heading| heading.title.to_lowercase() == wanted)
        .or_else(|| {
            headings
                .iter()
                .find(|heading| heading.title.to_lowercase().starts_with(&wanted))
        });
    match target {
        Some(heading) => {
            let line = heading.line;
            model.buffer.move_to(line, 0, model.mode);
        }
        None => model.show_toast(ToastLevel::Error, format!("Heading not found: {query}")),
    }
}
