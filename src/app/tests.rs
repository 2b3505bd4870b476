use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::clipboard::SystemClipboard;
use crate::command::CompletionKind;
use crate::dates::FixedDates;
use crate::editor::{Direction, Mode};
use crate::store::{MemoryNoteStore, Note, SearchResult, template};

use super::{DateTarget, Effect, Message, Model, Services, ToastLevel, View, update};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn today() -> NaiveDate {
    ymd(2025, 12, 15)
}

fn create_test_model(text: &str) -> Model {
    let note = Note {
        date: today(),
        content: text.to_string(),
        exists: true,
    };
    Model::new(note, today(), (80, 24))
}

fn services(store: &MemoryNoteStore) -> Services {
    Services::new(
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(SystemClipboard::detached()),
        Box::new(FixedDates(today())),
    )
}

fn send(model: Model, msgs: impl IntoIterator<Item = Message>) -> Model {
    msgs.into_iter().fold(model, update)
}

fn type_command(model: Model, text: &str) -> Model {
    let model = update(model, Message::StartCommand);
    send(model, text.chars().map(Message::CommandInput))
}

fn effects(model: &Model) -> Vec<Effect> {
    model.pending_effects().cloned().collect()
}

fn make_dirty(model: Model) -> Model {
    send(
        model,
        [
            Message::EnterInsert,
            Message::InsertText("x".into()),
            Message::ExitInsert,
        ],
    )
}

// --- Initial state ---

#[test]
fn test_initial_state() {
    let model = create_test_model("hello");
    assert_eq!(model.mode, Mode::Normal);
    assert_eq!(model.view, View::Editor);
    assert!(!model.command_line.active);
    assert!(!model.autocomplete.active);
    assert!(!model.is_dirty());
}

// --- Insert mode ---

#[test]
fn test_exit_insert_keeps_caret() {
    let model = create_test_model("world");
    let model = send(
        model,
        [
            Message::EnterInsert,
            Message::InsertText("he".into()),
            Message::ExitInsert,
        ],
    );
    assert_eq!(model.mode, Mode::Normal);
    assert_eq!(model.buffer.line_at(0), Some("heworld"));
    assert_eq!(model.buffer.cursor().position(), (0, 2));
}

#[test]
fn test_append_moves_past_cursor() {
    let model = create_test_model("ab");
    let model = send(
        model,
        [Message::EnterInsertAppend, Message::InsertText("X".into())],
    );
    assert_eq!(model.buffer.line_at(0), Some("aXb"));
}

#[test]
fn test_open_line_below_inherits_indent_and_enters_insert() {
    let model = create_test_model("  - item");
    let model = update(model, Message::OpenLineBelow);
    assert_eq!(model.mode, Mode::Insert);
    assert_eq!(model.buffer.line_at(1), Some("  "));
    assert_eq!(model.buffer.cursor().position(), (1, 2));
}

#[test]
fn test_cursor_motion_scrolls_editor() {
    let text = (0..30).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let model = update(create_test_model(&text), Message::Resize(80, 7));
    assert_eq!(model.editor_height(), 5);
    let model = send(model, (0..10).map(|_| Message::MoveCursor(Direction::Down)));
    assert_eq!(model.buffer.cursor().line, 10);
    assert_eq!(model.buffer.scroll_offset(), 6);
    let model = update(model, Message::DocStart);
    assert_eq!(model.buffer.scroll_offset(), 0);
}

// --- Command line ---

#[test]
fn test_backspace_on_empty_command_line_closes_it() {
    let model = type_command(create_test_model(""), "w");
    let model = update(model, Message::CommandBackspace);
    assert!(model.command_line.active);
    assert!(model.command_line.input.is_empty());
    let model = update(model, Message::CommandBackspace);
    assert!(!model.command_line.active);
}

#[test]
fn test_unknown_command_shows_error_toast() {
    let model = type_command(create_test_model(""), "frobnicate");
    let model = update(model, Message::ExecuteCommand);
    assert!(!model.command_line.active);
    assert_eq!(
        model.active_toast(),
        Some(("Unknown command: frobnicate", ToastLevel::Error))
    );
}

#[test]
fn test_help_command_shows_overlay() {
    let model = type_command(create_test_model(""), "?");
    let model = update(model, Message::ExecuteCommand);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
}

// --- Autocomplete ---

#[test]
fn test_tab_with_single_match_completes_inline() {
    let model = type_command(create_test_model(""), "sea");
    let model = update(model, Message::RequestCompletion);
    assert_eq!(model.command_line.input, "search ");
    assert!(!model.autocomplete.active);
}

#[test]
fn test_tab_with_many_matches_opens_overlay() {
    let model = type_command(create_test_model(""), "w");
    let model = update(model, Message::RequestCompletion);
    assert!(model.autocomplete.active);
    assert_eq!(model.autocomplete.candidates, vec!["write", "wq"]);
    assert_eq!(model.autocomplete.kind, CompletionKind::Command);
}

#[test]
fn test_accept_applies_selected_candidate() {
    let model = type_command(create_test_model(""), "");
    let model = send(
        model,
        [
            Message::RequestCompletion,
            Message::AutocompleteDown,
            Message::AutocompleteAccept,
        ],
    );
    assert!(!model.autocomplete.active);
    assert!(model.command_line.active);
    assert_eq!(model.command_line.input, "open ");
}

#[test]
fn test_cancel_closes_only_the_overlay() {
    let model = type_command(create_test_model(""), "w");
    let model = send(
        model,
        [Message::RequestCompletion, Message::AutocompleteCancel],
    );
    assert!(!model.autocomplete.active);
    assert!(model.command_line.active);
    assert_eq!(model.command_line.input, "w");
}

#[test]
fn test_typing_with_overlay_open_falls_through() {
    let model = type_command(create_test_model(""), "w");
    let model = update(model, Message::RequestCompletion);
    assert!(model.autocomplete.active);

    let model = update(model, Message::CommandInput('q'));
    assert!(!model.autocomplete.active);
    assert_eq!(model.command_line.input, "wq");
}

#[test]
fn test_goto_completion_lists_headings() {
    let model = create_test_model("# 2025-12-15\n## Thoughts\n## Experiments");
    let model = type_command(model, "goto ");
    let model = update(model, Message::RequestCompletion);
    assert_eq!(model.autocomplete.kind, CompletionKind::Argument);
    assert_eq!(
        model.autocomplete.candidates,
        vec!["2025-12-15", "Thoughts", "Experiments"]
    );
    let model = send(
        model,
        [
            Message::AutocompleteDown,
            Message::AutocompleteDown,
            Message::AutocompleteAccept,
        ],
    );
    assert_eq!(model.command_line.input, "goto Experiments");
}

#[test]
fn test_goto_completion_with_one_heading_needs_no_overlay() {
    let model = type_command(create_test_model("## Thoughts\ntext"), "g ");
    let model = update(model, Message::RequestCompletion);
    assert!(!model.autocomplete.active);
    assert_eq!(model.command_line.input, "goto Thoughts");
}

// --- Goto ---

#[test]
fn test_goto_prefers_exact_title() {
    let text = "## Experiments Log\nA\n## Experiments\nB";
    let model = type_command(create_test_model(text), "goto experiments");
    let model = update(model, Message::ExecuteCommand);
    assert_eq!(model.buffer.cursor().position(), (2, 0));
}

#[test]
fn test_goto_falls_back_to_prefix() {
    let text = "intro\n## Experiments Log\nA";
    let model = type_command(create_test_model(text), "g exp");
    let model = update(model, Message::ExecuteCommand);
    assert_eq!(model.buffer.cursor().position(), (1, 0));
}

#[test]
fn test_goto_missing_heading_is_error() {
    let model = type_command(create_test_model("## Thoughts"), "goto Quotes");
    let model = update(model, Message::ExecuteCommand);
    assert_eq!(
        model.active_toast(),
        Some(("Heading not found: Quotes", ToastLevel::Error))
    );
    assert_eq!(model.buffer.cursor().position(), (0, 0));
}

// --- Save and quit sequencing ---

#[test]
fn test_write_quit_persists_before_exit() {
    let model = type_command(create_test_model("note"), "wq");
    let model = update(model, Message::ExecuteCommand);
    assert_eq!(
        effects(&model),
        vec![
            Effect::Persist {
                date: today(),
                content: "note".into()
            },
            Effect::Exit
        ]
    );
}

#[test]
fn test_quit_saves_only_when_dirty() {
    let clean = update(create_test_model("note"), Message::Quit);
    assert_eq!(effects(&clean), vec![Effect::Exit]);

    let dirty = update(make_dirty(create_test_model("note")), Message::Quit);
    assert_eq!(
        effects(&dirty),
        vec![
            Effect::Persist {
                date: today(),
                content: "xnote".into()
            },
            Effect::Exit
        ]
    );
}

#[test]
fn test_force_quit_skips_save() {
    let model = type_command(make_dirty(create_test_model("note")), "q!");
    let model = update(model, Message::ExecuteCommand);
    assert_eq!(effects(&model), vec![Effect::Exit]);
}

#[test]
fn test_saved_marks_buffer_clean() {
    let model = make_dirty(create_test_model("note"));
    let model = update(model, Message::Saved(today()));
    assert!(!model.is_dirty());
    assert_eq!(model.active_toast(), Some(("Saved!", ToastLevel::Info)));
}

#[test]
fn test_save_failure_drops_queued_effects() {
    let model = type_command(make_dirty(create_test_model("note")), "n");
    let model = update(model, Message::ExecuteCommand);
    assert_eq!(effects(&model).len(), 2);

    let model = update(model, Message::SaveFailed("disk full".into()));
    assert!(effects(&model).is_empty());
    assert!(model.is_dirty());
    assert_eq!(
        model.active_toast(),
        Some(("Save failed: disk full", ToastLevel::Error))
    );
}

// --- Navigation ---

#[test]
fn test_dirty_navigation_persists_before_load() {
    let model = update(make_dirty(create_test_model("note")), Message::NextDay);
    assert_eq!(
        effects(&model),
        vec![
            Effect::Persist {
                date: today(),
                content: "xnote".into()
            },
            Effect::Load {
                target: DateTarget::Next,
                jump_to_line: None
            }
        ]
    );
}

#[test]
fn test_clean_navigation_only_loads() {
    let model = type_command(create_test_model("note"), "open Dec 1, 2025");
    let model = update(model, Message::ExecuteCommand);
    assert_eq!(
        effects(&model),
        vec![Effect::Load {
            target: DateTarget::Spec("dec 1, 2025".into()),
            jump_to_line: None
        }]
    );
}

#[test]
fn test_second_navigation_while_pending_is_refused() {
    let model = send(create_test_model("note"), [Message::PrevDay, Message::NextDay]);
    assert_eq!(effects(&model).len(), 1);
    assert_eq!(
        model.active_toast(),
        Some(("Navigation already in progress", ToastLevel::Warning))
    );
}

#[test]
fn test_navigation_round_trip_through_services() {
    let store = MemoryNoteStore::new();
    let mut services = services(&store);
    let mut model = make_dirty(create_test_model("note"));

    model = update(model, Message::NextDay);
    services.drain_effects(&mut model);

    assert_eq!(store.get(today()).as_deref(), Some("xnote"));
    assert_eq!(model.current_date, ymd(2025, 12, 16));
    assert_eq!(model.buffer.text(), template(ymd(2025, 12, 16)));
    assert!(!model.note_exists);
    assert!(!model.is_dirty());

    model = update(model, Message::PrevDay);
    services.drain_effects(&mut model);
    assert_eq!(model.buffer.text(), "xnote");
    assert!(model.note_exists);
}

#[test]
fn test_invalid_date_reports_and_clears_pending() {
    let store = MemoryNoteStore::new();
    let mut services = services(&store);
    let mut model = type_command(create_test_model("note"), "open someday");
    model = update(model, Message::ExecuteCommand);
    services.drain_effects(&mut model);

    assert_eq!(model.current_date, today());
    assert_eq!(
        model.active_toast(),
        Some(("Invalid date: someday", ToastLevel::Error))
    );
    model = update(model, Message::NextDay);
    assert_eq!(effects(&model).len(), 1);
}

// --- Search ---

#[test]
fn test_search_keeps_command_line_until_results() {
    let model = type_command(create_test_model(""), "s pcr");
    let model = update(model, Message::ExecuteCommand);
    assert!(model.command_line.active);
    assert_eq!(
        effects(&model),
        vec![Effect::Search {
            query: "pcr".into()
        }]
    );

    let result = SearchResult {
        date: ymd(2025, 12, 1),
        line: 3,
        content: "ran PCR".into(),
        match_start: 4,
        match_end: 7,
    };
    let model = update(model, Message::SearchCompleted(vec![result]));
    assert!(!model.command_line.active);
    assert_eq!(model.view, View::Results);
    assert_eq!(model.selected_result, 0);
}

#[test]
fn test_results_selection_saturates() {
    let store = MemoryNoteStore::new();
    store.insert(ymd(2025, 12, 1), "a\nmatch one");
    store.insert(ymd(2025, 12, 2), "match two");
    let mut services = services(&store);
    let mut model = type_command(create_test_model(""), "search match");
    model = update(model, Message::ExecuteCommand);
    services.drain_effects(&mut model);

    assert_eq!(model.search_results.len(), 2);
    model = send(model, [Message::ResultUp]);
    assert_eq!(model.selected_result, 0);
    model = send(model, [Message::ResultDown, Message::ResultDown]);
    assert_eq!(model.selected_result, 1);
}

#[test]
fn test_selecting_result_opens_note_at_line() {
    let store = MemoryNoteStore::new();
    store.insert(ymd(2025, 12, 1), "first\nsecond\nthe match");
    let mut services = services(&store);
    let mut model = type_command(create_test_model(""), "search match");
    model = update(model, Message::ExecuteCommand);
    services.drain_effects(&mut model);

    model = update(model, Message::SelectResult);
    services.drain_effects(&mut model);

    assert_eq!(model.view, View::Editor);
    assert_eq!(model.current_date, ymd(2025, 12, 1));
    assert_eq!(model.buffer.cursor().position(), (2, 0));
}

#[test]
fn test_empty_search_results_still_show_view() {
    let model = type_command(create_test_model(""), "search nothing");
    let model = send(
        model,
        [Message::ExecuteCommand, Message::SearchCompleted(Vec::new())],
    );
    assert_eq!(model.view, View::Results);
    assert_eq!(
        model.active_toast(),
        Some(("No matches for \"nothing\"", ToastLevel::Info))
    );
    let model = update(model, Message::ExitResults);
    assert_eq!(model.view, View::Editor);
}

// --- Line commands ---

#[test]
fn test_copy_queues_clipboard_text() {
    let model = type_command(create_test_model("a\nb\nc"), "copy 2");
    let model = update(model, Message::ExecuteCommand);
    assert_eq!(effects(&model), vec![Effect::CopyToClipboard("a\nb".into())]);
    assert_eq!(model.active_toast(), Some(("Copied 2 lines", ToastLevel::Info)));
    assert!(!model.is_dirty());
}

#[test]
fn test_cut_removes_lines_and_copies() {
    let model = send(
        create_test_model("a\nb\nc"),
        [Message::MoveCursor(Direction::Down)],
    );
    let model = type_command(model, "x 5");
    let model = update(model, Message::ExecuteCommand);
    assert_eq!(effects(&model), vec![Effect::CopyToClipboard("b\nc".into())]);
    assert_eq!(model.buffer.lines(), ["a"]);
    assert!(model.is_dirty());
}

#[test]
fn test_delete_all_leaves_one_empty_line() {
    let model = type_command(create_test_model("a\nb\nc"), "d all");
    let model = update(model, Message::ExecuteCommand);
    assert_eq!(model.buffer.lines(), [""]);
    assert!(effects(&model).is_empty());
}

#[test]
fn test_copy_then_paste_through_services() {
    let store = MemoryNoteStore::new();
    let mut services = services(&store);
    let mut model = type_command(create_test_model("one\ntwo"), "y");
    model = update(model, Message::ExecuteCommand);
    services.drain_effects(&mut model);

    model = type_command(model, "paste");
    model = update(model, Message::ExecuteCommand);
    services.drain_effects(&mut model);

    assert_eq!(model.buffer.lines(), ["one", "one", "two"]);
    assert_eq!(model.buffer.cursor().position(), (1, 0));
}

#[test]
fn test_paste_with_empty_clipboard_warns() {
    let store = MemoryNoteStore::new();
    let mut services = services(&store);
    let mut model = type_command(create_test_model("one"), "paste");
    model = update(model, Message::ExecuteCommand);
    services.drain_effects(&mut model);
    assert_eq!(
        model.active_toast(),
        Some(("Clipboard is empty", ToastLevel::Warning))
    );
}

#[test]
fn test_paste_toast_counts_inserted_lines() {
    let model = update(create_test_model("top"), Message::Pasted("a\n\n".into()));
    assert_eq!(model.buffer.lines(), ["top", "a", ""]);
    assert_eq!(model.active_toast(), Some(("Pasted 2 lines", ToastLevel::Info)));

    let model = update(create_test_model("top"), Message::Pasted("\n".into()));
    assert_eq!(model.buffer.lines(), ["top"]);
    assert!(!model.is_dirty());
    assert_eq!(
        model.active_toast(),
        Some(("Clipboard is empty", ToastLevel::Warning))
    );
}

// --- Toasts ---

#[test]
fn test_toast_expires() {
    let mut model = update(create_test_model(""), Message::ClipboardEmpty);
    let now = Instant::now();
    assert!(!model.expire_toast(now));
    assert!(model.expire_toast(now + Duration::from_secs(5)));
    assert!(model.active_toast().is_none());
}
