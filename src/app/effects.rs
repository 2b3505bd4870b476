use std::path::PathBuf;

use chrono::NaiveDate;

use crate::app::{Message, Model, update};
use crate::clipboard::{ClipboardPort, SystemClipboard};
use crate::dates::{DateService, SystemDates};
use crate::store::{FileNoteStore, NoteStore, SearchPort};

/// Which day a `Load` should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTarget {
    Today,
    /// The day after the current note.
    Next,
    /// The day before the current note.
    Prev,
    Date(NaiveDate),
    /// User-typed date expression, parsed when the load runs.
    Spec(String),
}

/// A side effect requested by [`update`]. The controller never performs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Persist { date: NaiveDate, content: String },
    Load {
        target: DateTarget,
        jump_to_line: Option<usize>,
    },
    Search { query: String },
    CopyToClipboard(String),
    ReadClipboard,
    Exit,
}

/// The collaborators effects run against.
pub struct Services {
    pub notes: Box<dyn NoteStore>,
    pub search: Box<dyn SearchPort>,
    pub clipboard: Box<dyn ClipboardPort>,
    pub dates: Box<dyn DateService>,
}

impl Services {
    pub fn new(
        notes: Box<dyn NoteStore>,
        search: Box<dyn SearchPort>,
        clipboard: Box<dyn ClipboardPort>,
        dates: Box<dyn DateService>,
    ) -> Self {
        Self {
            notes,
            search,
            clipboard,
            dates,
        }
    }

    /// File-backed notes in `dir`, the system clipboard and the local clock.
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        let store = FileNoteStore::new(dir);
        tracing::debug!(dir = %store.dir().display(), "file note store");
        Self::new(
            Box::new(store.clone()),
            Box::new(store),
            Box::new(SystemClipboard::new()),
            Box::new(SystemDates),
        )
    }

    /// Run queued effects in order, feeding their results back through [`update`].
    ///
    /// Effects queued by those results run in the same pass.
    pub fn drain_effects(&mut self, model: &mut Model) {
        while let Some(effect) = model.take_effect() {
            if let Some(msg) = self.run(effect, model) {
                *model = update(std::mem::take(model), msg);
            }
        }
    }

    fn run(&mut self, effect: Effect, model: &mut Model) -> Option<Message> {
        match effect {
            Effect::Persist { date, content } => match self.notes.save(date, &content) {
                Ok(()) => Some(Message::Saved(date)),
                Err(err) => {
                    tracing::error!(%date, %err, "save failed");
                    Some(Message::SaveFailed(err.to_string()))
                }
            },
            Effect::Load {
                target,
                jump_to_line,
            } => {
                let Some(date) = self.resolve(&target, model.current_date) else {
                    let shown = match &target {
                        DateTarget::Spec(spec) => spec.as_str(),
                        _ => "",
                    };
                    tracing::warn!(input = shown, "unrecognised date");
                    return Some(Message::NavigationFailed(format!("Invalid date: {shown}")));
                };
                match self.notes.load(date) {
                    Ok(note) => {
                        tracing::debug!(%date, exists = note.exists, "note loaded");
                        Some(Message::NoteLoaded { note, jump_to_line })
                    }
                    Err(err) => {
                        tracing::error!(%date, %err, "load failed");
                        Some(Message::NavigationFailed(err.to_string()))
                    }
                }
            }
            Effect::Search { query } => {
                let results = self.search.search(&query);
                tracing::debug!(%query, hits = results.len(), "search");
                Some(Message::SearchCompleted(results))
            }
            Effect::CopyToClipboard(text) => {
                self.clipboard.copy(&text);
                None
            }
            Effect::ReadClipboard => Some(
                self.clipboard
                    .paste()
                    .map_or(Message::ClipboardEmpty, Message::Pasted),
            ),
            Effect::Exit => {
                tracing::info!("exit requested");
                model.should_quit = true;
                None
            }
        }
    }

    fn resolve(&self, target: &DateTarget, current: NaiveDate) -> Option<NaiveDate> {
        match target {
            DateTarget::Today => Some(self.dates.today()),
            DateTarget::Next => Some(self.dates.tomorrow(current)),
            DateTarget::Prev => Some(self.dates.yesterday(current)),
            DateTarget::Date(date) => Some(*date),
            DateTarget::Spec(spec) => self.dates.parse(spec),
        }
    }
}
