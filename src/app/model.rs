use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::command::AutocompleteState;
use crate::editor::{EditorBuffer, Mode};
use crate::store::{Note, SearchResult};

use super::effects::Effect;

/// Rows reserved below the editor pane: status bar and command/toast line.
const CHROME_ROWS: u16 = 2;

/// Default number of spaces a Tab inserts.
pub const DEFAULT_TAB_WIDTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane fills the screen. Orthogonal to [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Editor,
    Results,
}

/// The `:` prompt on the bottom line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    pub active: bool,
    pub input: String,
}

impl CommandLine {
    pub(super) fn open(&mut self, input: impl Into<String>) {
        self.active = true;
        self.input = input.into();
    }

    pub(super) fn clear(&mut self) {
        self.active = false;
        self.input.clear();
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. Side effects are
/// requested by pushing [`Effect`]s, which the effect runner drains.
pub struct Model {
    /// The note being edited
    pub buffer: EditorBuffer,
    pub mode: Mode,
    pub view: View,
    pub command_line: CommandLine,
    /// Candidate overlay attached to the command line
    pub autocomplete: AutocompleteState,
    /// Date of the note in `buffer`
    pub current_date: NaiveDate,
    /// Today's date, used for the status bar marker
    pub today: NaiveDate,
    /// Whether the note was read from storage rather than templated
    pub note_exists: bool,
    /// Last search query
    pub search_query: String,
    /// Results of the last search
    pub search_results: Vec<SearchResult>,
    /// Selected row in the results view
    pub selected_result: usize,
    /// Whether help overlay is visible
    pub help_visible: bool,
    toast: Option<Toast>,
    /// Terminal width in columns
    pub width: u16,
    /// Terminal height in rows
    pub height: u16,
    /// Spaces inserted by Tab in Insert mode
    pub tab_width: usize,
    /// Directory notes are stored in, shown in help
    pub notes_dir: Option<PathBuf>,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    effects: VecDeque<Effect>,
    /// Set while a `Load` is queued; a second navigation is refused
    pub(super) pending_navigation: bool,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("current_date", &self.current_date)
            .field("mode", &self.mode)
            .field("view", &self.view)
            .field("command_line", &self.command_line)
            .field("dirty", &self.buffer.is_dirty())
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model showing `note`.
    pub fn new(note: Note, today: NaiveDate, terminal_size: (u16, u16)) -> Self {
        Self {
            buffer: EditorBuffer::from_text(&note.content),
            current_date: note.date,
            note_exists: note.exists,
            today,
            width: terminal_size.0,
            height: terminal_size.1,
            ..Self::default()
        }
    }

    pub const fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Rows available to the editor pane.
    pub fn editor_height(&self) -> usize {
        usize::from(self.height.saturating_sub(CHROME_ROWS))
    }

    /// Whether the buffer has unsaved changes.
    pub const fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// The selected search result, if the results view has any.
    pub fn current_result(&self) -> Option<&SearchResult> {
        self.search_results.get(self.selected_result)
    }

    /// Queued effects, oldest first.
    pub fn pending_effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Take the oldest queued effect.
    pub fn take_effect(&mut self) -> Option<Effect> {
        self.effects.pop_front()
    }

    pub(super) fn push_effect(&mut self, effect: Effect) {
        self.effects.push_back(effect);
    }

    pub(super) fn clear_effects(&mut self) {
        self.effects.clear();
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        let ttl = match level {
            ToastLevel::Info => Duration::from_secs(2),
            ToastLevel::Warning | ToastLevel::Error => Duration::from_secs(4),
        };
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Drop the toast once its expiry has passed. Returns `true` if one was removed.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            buffer: EditorBuffer::empty(),
            mode: Mode::Normal,
            view: View::Editor,
            command_line: CommandLine::default(),
            autocomplete: AutocompleteState::default(),
            current_date: NaiveDate::default(),
            today: NaiveDate::default(),
            note_exists: false,
            search_query: String::new(),
            search_results: Vec::new(),
            selected_result: 0,
            help_visible: false,
            toast: None,
            width: 80,
            height: 24,
            tab_width: DEFAULT_TAB_WIDTH,
            notes_dir: None,
            config_global_path: None,
            config_local_path: None,
            effects: VecDeque::new(),
            pending_navigation: false,
            should_quit: false,
        }
    }
}
