//! Key-level sessions driven through the public API: route, update, run effects.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use labbook::app::{Model, Services, View, handle_key, update};
use labbook::clipboard::SystemClipboard;
use labbook::dates::FixedDates;
use labbook::editor::Mode;
use labbook::store::{MemoryNoteStore, NoteStore, template};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Session {
    model: Model,
    services: Services,
    store: MemoryNoteStore,
}

impl Session {
    fn start(store: MemoryNoteStore) -> Self {
        let today = ymd(2025, 12, 15);
        let services = Services::new(
            Box::new(store.clone()),
            Box::new(store.clone()),
            Box::new(SystemClipboard::detached()),
            Box::new(FixedDates(today)),
        );
        let note = services.notes.load(today).unwrap();
        let model = Model::new(note, today, (80, 24));
        Self {
            model,
            services,
            store,
        }
    }

    fn press(&mut self, code: KeyCode) {
        self.press_with(code, KeyModifiers::NONE);
    }

    fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let key = KeyEvent::new(code, modifiers);
        if let Some(msg) = handle_key(key, &self.model) {
            self.model = update(std::mem::take(&mut self.model), msg);
            self.services.drain_effects(&mut self.model);
        }
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    fn command(&mut self, text: &str) {
        self.press(KeyCode::Char(':'));
        self.type_text(text);
        self.press(KeyCode::Enter);
    }
}

#[test]
fn test_write_then_quit_saves_note() {
    let mut session = Session::start(MemoryNoteStore::new());
    session.press(KeyCode::Char('G'));
    session.press(KeyCode::Char('o'));
    session.type_text("a quote");
    session.press(KeyCode::Esc);
    assert_eq!(session.model.mode, Mode::Normal);
    assert!(session.model.is_dirty());

    session.command("wq");

    assert!(session.model.should_quit);
    let saved = session.store.get(ymd(2025, 12, 15)).unwrap();
    assert!(saved.ends_with("a quote"));
}

#[test]
fn test_ctrl_c_saves_dirty_note_before_exit() {
    let mut session = Session::start(MemoryNoteStore::new());
    session.press(KeyCode::Char('i'));
    session.type_text("draft ");
    session.press_with(KeyCode::Char('c'), KeyModifiers::CONTROL);

    assert!(session.model.should_quit);
    let saved = session.store.get(ymd(2025, 12, 15)).unwrap();
    assert!(saved.starts_with("draft # 2025-12-15"));
}

#[test]
fn test_force_quit_discards_edits() {
    let mut session = Session::start(MemoryNoteStore::new());
    session.press(KeyCode::Char('i'));
    session.type_text("scratch");
    session.press(KeyCode::Esc);
    session.command("q!");

    assert!(session.model.should_quit);
    assert_eq!(session.store.get(ymd(2025, 12, 15)), None);
}

#[test]
fn test_day_navigation_saves_and_loads() {
    let store = MemoryNoteStore::new();
    store.insert(ymd(2025, 12, 14), "# 2025-12-14\nyesterday's work");
    let mut session = Session::start(store);

    session.press(KeyCode::Char('i'));
    session.type_text("today ");
    session.press(KeyCode::Esc);
    session.press(KeyCode::Char('h'));

    assert_eq!(session.model.current_date, ymd(2025, 12, 14));
    assert_eq!(session.model.buffer.line_at(1), Some("yesterday's work"));
    assert!(session.model.note_exists);
    assert!(
        session
            .store
            .get(ymd(2025, 12, 15))
            .unwrap()
            .starts_with("today ")
    );

    session.press(KeyCode::Char('l'));
    session.press(KeyCode::Char('l'));
    assert_eq!(session.model.current_date, ymd(2025, 12, 16));
    assert_eq!(session.model.buffer.text(), template(ymd(2025, 12, 16)));
    assert!(!session.model.note_exists);
}

#[test]
fn test_open_accepts_natural_dates() {
    let mut session = Session::start(MemoryNoteStore::new());
    session.command("open Dec 1, 2025");
    assert_eq!(session.model.current_date, ymd(2025, 12, 1));

    session.command("o 12/24/2025");
    assert_eq!(session.model.current_date, ymd(2025, 12, 24));

    session.command("today");
    assert_eq!(session.model.current_date, ymd(2025, 12, 15));
}

#[test]
fn test_tab_completion_and_goto() {
    let mut session = Session::start(MemoryNoteStore::new());
    session.press(KeyCode::Char(':'));
    session.type_text("go");
    session.press(KeyCode::Tab);
    assert_eq!(session.model.command_line.input, "goto ");

    session.press(KeyCode::Tab);
    assert!(session.model.autocomplete.active);
    assert_eq!(session.model.autocomplete.candidates.len(), 5);

    session.press(KeyCode::Down);
    session.press(KeyCode::Down);
    session.press(KeyCode::Enter);
    assert_eq!(session.model.command_line.input, "goto Experiments");

    session.press(KeyCode::Enter);
    assert!(!session.model.command_line.active);
    assert_eq!(session.model.buffer.cursor().line, 5);
}

#[test]
fn test_unhandled_key_closes_completion_overlay() {
    let mut session = Session::start(MemoryNoteStore::new());
    session.press(KeyCode::Char(':'));
    session.type_text("w");
    session.press(KeyCode::Tab);
    assert!(session.model.autocomplete.active);

    session.press(KeyCode::Left);
    assert!(!session.model.autocomplete.active);
    assert!(session.model.command_line.active);
    assert_eq!(session.model.command_line.input, "w");
}

#[test]
fn test_search_and_open_result() {
    let store = MemoryNoteStore::new();
    store.insert(ymd(2025, 11, 3), "# 2025-11-03\nPCR failed\nretry PCR");
    store.insert(ymd(2025, 12, 1), "# 2025-12-01\nordered primers");
    let mut session = Session::start(store);

    session.press(KeyCode::Char('/'));
    session.type_text("pcr");
    session.press(KeyCode::Enter);

    assert_eq!(session.model.view, View::Results);
    assert_eq!(session.model.search_results.len(), 2);

    session.press(KeyCode::Char('j'));
    session.press(KeyCode::Enter);
    assert_eq!(session.model.view, View::Editor);
    assert_eq!(session.model.current_date, ymd(2025, 11, 3));
    assert_eq!(session.model.buffer.cursor().position(), (2, 0));
}

#[test]
fn test_cut_and_paste_moves_lines() {
    let store = MemoryNoteStore::new();
    store.insert(ymd(2025, 12, 15), "one\ntwo\nthree");
    let mut session = Session::start(store);

    session.command("cut");
    assert_eq!(session.model.buffer.lines(), ["two", "three"]);

    session.press(KeyCode::Char('j'));
    session.command("paste");
    assert_eq!(session.model.buffer.lines(), ["two", "three", "one"]);
}

#[test]
fn test_help_overlay_swallows_one_key() {
    let mut session = Session::start(MemoryNoteStore::new());
    session.press(KeyCode::Char('?'));
    assert!(session.model.help_visible);
    session.press(KeyCode::Char('j'));
    assert!(!session.model.help_visible);
    assert_eq!(session.model.buffer.cursor().line, 0);
}
