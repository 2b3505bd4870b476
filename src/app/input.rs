use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::app::model::View;
use crate::app::{Message, Model};
use crate::editor::{Direction, Mode};

/// Translate a terminal event into a message.
pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
    match event {
        Event::Key(key) => handle_key(*key, model),
        Event::Resize(width, height) => Some(Message::Resize(*width, *height)),
        Event::Paste(text) if model.mode == Mode::Insert && model.view == View::Editor => {
            Some(Message::InsertText(text.replace(['\r', '\n'], " ")))
        }
        _ => None,
    }
}

/// Map one key press to at most one message.
///
/// Layers are tried in priority order and the first that claims the key
/// wins: global accelerators, help overlay, autocomplete overlay, command
/// line, results view, then the current mode.
pub fn handle_key(key: event::KeyEvent, model: &Model) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(Message::Quit),
            KeyCode::Char('s') => return Some(Message::Save),
            KeyCode::Char('q') => return Some(Message::ForceQuit),
            _ => {}
        }
    }

    if model.help_visible {
        return Some(Message::HideHelp);
    }

    if model.autocomplete.active {
        match key.code {
            KeyCode::Up => return Some(Message::AutocompleteUp),
            KeyCode::Down => return Some(Message::AutocompleteDown),
            KeyCode::Enter => return Some(Message::AutocompleteAccept),
            KeyCode::Esc => return Some(Message::AutocompleteCancel),
            // Anything else closes the overlay and goes to the command line.
            _ => {
                return handle_command_line_key(key).or(Some(Message::AutocompleteCancel));
            }
        }
    }

    if model.command_line.active {
        return handle_command_line_key(key);
    }

    if model.view == View::Results {
        return handle_results_key(key);
    }

    match model.mode {
        Mode::Normal => handle_normal_key(key),
        Mode::Insert => handle_insert_key(key, model),
    }
}

fn handle_command_line_key(key: event::KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::CancelCommand),
        KeyCode::Enter => Some(Message::ExecuteCommand),
        KeyCode::Backspace => Some(Message::CommandBackspace),
        KeyCode::Tab => Some(Message::RequestCompletion),
        KeyCode::Char(c) if is_plain(key) => Some(Message::CommandInput(c)),
        _ => None,
    }
}

fn handle_results_key(key: event::KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Message::ResultDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::ResultUp),
        KeyCode::Enter => Some(Message::SelectResult),
        KeyCode::Esc => Some(Message::ExitResults),
        KeyCode::Char(':') => Some(Message::StartCommand),
        _ => None,
    }
}

fn handle_normal_key(key: event::KeyEvent) -> Option<Message> {
    match key.code {
        // Motion
        KeyCode::Char('j') | KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
        KeyCode::Char('0') | KeyCode::Home => Some(Message::LineStart),
        KeyCode::Char('$') | KeyCode::End => Some(Message::LineEnd),
        KeyCode::Char('g') => Some(Message::DocStart),
        KeyCode::Char('G') => Some(Message::DocEnd),

        // Editing
        KeyCode::Char('i') => Some(Message::EnterInsert),
        KeyCode::Char('a') => Some(Message::EnterInsertAppend),
        KeyCode::Char('o') => Some(Message::OpenLineBelow),
        KeyCode::Char('O') => Some(Message::OpenLineAbove),
        KeyCode::Char('x') => Some(Message::DeleteUnderCursor),

        // Commands
        KeyCode::Char(':') => Some(Message::StartCommand),
        KeyCode::Char('/') => Some(Message::StartCommandWith("search ".to_string())),

        // Days
        KeyCode::Char('h') => Some(Message::PrevDay),
        KeyCode::Char('l') => Some(Message::NextDay),

        KeyCode::Char('?') => Some(Message::ToggleHelp),
        _ => None,
    }
}

fn handle_insert_key(key: event::KeyEvent, model: &Model) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::ExitInsert),
        KeyCode::Enter => Some(Message::SplitLine),
        KeyCode::Backspace => Some(Message::DeleteBack),
        KeyCode::Tab => Some(Message::InsertText(" ".repeat(model.tab_width))),
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
        KeyCode::Home => Some(Message::LineStart),
        KeyCode::End => Some(Message::LineEnd),
        KeyCode::Char(c) if is_plain(key) => Some(Message::InsertText(c.to_string())),
        _ => None,
    }
}

/// A character typed without Ctrl or Alt.
fn is_plain(key: event::KeyEvent) -> bool {
    !key.modifiers.contains(KeyModifiers::CONTROL) && !key.modifiers.contains(KeyModifiers::ALT)
}
