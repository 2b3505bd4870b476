//! Note persistence and full-text search.
//!
//! One plain-text file per day, named `YYYY-MM-DD.md`, inside a notes
//! directory. The controller only sees the [`NoteStore`] and [`SearchPort`]
//! traits; [`FileNoteStore`] implements both on disk and [`MemoryNoteStore`]
//! implements both in memory for tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::dates::{STORAGE_FORMAT, format_storage};

/// Environment variable overriding the notes directory.
pub const NOTES_DIR_ENV: &str = "LABBOOK_DIR";

/// A day's note as loaded from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub date: NaiveDate,
    pub content: String,
    /// Whether the note was read from storage (as opposed to a fresh template).
    pub exists: bool,
}

/// One matching line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub date: NaiveDate,
    /// One-based line number.
    pub line: usize,
    /// Full text of the matching line.
    pub content: String,
    /// Byte offset of the match start in `content`.
    pub match_start: usize,
    /// Byte offset one past the match end in `content`.
    pub match_end: usize,
}

/// Errors from note storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create notes directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Loads and saves notes by date.
pub trait NoteStore {
    /// Load the note for `date`, or the daily template if none was written.
    fn load(&self, date: NaiveDate) -> Result<Note, StoreError>;

    /// Write `content` as the note for `date`.
    fn save(&mut self, date: NaiveDate, content: &str) -> Result<(), StoreError>;
}

/// Full-text search over every stored note.
pub trait SearchPort {
    /// Every line containing `query`, ASCII case-insensitively, in date-then-line order.
    fn search(&self, query: &str) -> Vec<SearchResult>;
}

/// Content of a note that has never been written.
pub fn template(date: NaiveDate) -> String {
    format!(
        "# {}\n\n## Thoughts\n\n\n## Experiments\n\n\n## Learnings\n\n\n## Quotes\n\n",
        format_storage(date)
    )
}

/// The notes directory: `$LABBOOK_DIR`, else `~/.labbook/notes`.
pub fn default_notes_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(NOTES_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    home.join(".labbook").join("notes")
}

/// Find `query` in each line of each note, ASCII case-insensitively.
///
/// `notes` must already be in the order results should appear.
fn search_contents<'a>(
    query: &str,
    notes: impl IntoIterator<Item = (NaiveDate, &'a str)>,
) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_ascii_lowercase();
    let mut results = Vec::new();
    for (date, content) in notes {
        for (idx, line) in content.split('\n').enumerate() {
            if let Some(start) = line.to_ascii_lowercase().find(&needle) {
                results.push(SearchResult {
                    date,
                    line: idx + 1,
                    content: line.to_string(),
                    match_start: start,
                    match_end: start + needle.len(),
                });
            }
        }
    }
    results
}

/// Notes stored as `YYYY-MM-DD.md` files in one directory.
#[derive(Debug, Clone)]
pub struct FileNoteStore {
    dir: PathBuf,
}

impl FileNoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory notes are read from and written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for the note on `date`.
    pub fn note_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.md", format_storage(date)))
    }

    /// Dates that have a note file, newest first.
    ///
    /// A missing or unreadable directory yields an empty list.
    pub fn list_dates(&self) -> Vec<NaiveDate> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(dir = %self.dir.display(), %err, "cannot list notes");
                }
                return Vec::new();
            }
        };
        let mut dates: Vec<NaiveDate> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name();
                let stem = name.to_str()?.strip_suffix(".md")?;
                NaiveDate::parse_from_str(stem, STORAGE_FORMAT).ok()
            })
            .collect();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates
    }
}

impl NoteStore for FileNoteStore {
    fn load(&self, date: NaiveDate) -> Result<Note, StoreError> {
        let path = self.note_path(date);
        match fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loaded note");
                Ok(Note {
                    date,
                    content,
                    exists: true,
                })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Note {
                date,
                content: template(date),
                exists: false,
            }),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn save(&mut self, date: NaiveDate, content: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.note_path(date);
        fs::write(&path, content).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = content.len(), "saved note");
        Ok(())
    }
}

impl SearchPort for FileNoteStore {
    fn search(&self, query: &str) -> Vec<SearchResult> {
        let notes: Vec<(NaiveDate, String)> = self
            .list_dates()
            .into_iter()
            .filter_map(|date| {
                let path = self.note_path(date);
                match fs::read_to_string(&path) {
                    Ok(content) => Some((date, content)),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "skipping unreadable note");
                        None
                    }
                }
            })
            .collect();
        let results = search_contents(
            query,
            notes.iter().map(|(date, content)| (*date, content.as_str())),
        );
        tracing::debug!(%query, hits = results.len(), "search finished");
        results
    }
}

/// In-memory notes. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    notes: Rc<RefCell<BTreeMap<NaiveDate, String>>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a note directly.
    pub fn insert(&self, date: NaiveDate, content: impl Into<String>) {
        self.notes.borrow_mut().insert(date, content.into());
    }

    /// The stored content for `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<String> {
        self.notes.borrow().get(&date).cloned()
    }
}

impl NoteStore for MemoryNoteStore {
    fn load(&self, date: NaiveDate) -> Result<Note, StoreError> {
        Ok(self.get(date).map_or_else(
            || Note {
                date,
                content: template(date),
                exists: false,
            },
            |content| Note {
                date,
                content,
                exists: true,
            },
        ))
    }

    fn save(&mut self, date: NaiveDate, content: &str) -> Result<(), StoreError> {
        self.insert(date, content);
        Ok(())
    }
}

impl SearchPort for MemoryNoteStore {
    fn search(&self, query: &str) -> Vec<SearchResult> {
        let notes = self.notes.borrow();
        search_contents(
            query,
            notes
                .iter()
                .rev()
                .map(|(date, content)| (*date, content.as_str())),
        )
    }
}
