//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`handle_key`]: Pure key-to-message routing
//! - [`Services`]: Runs the [`Effect`]s `update` queues
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::{DateTarget, Effect, Services};
pub use input::handle_key;
pub use model::{CommandLine, DEFAULT_TAB_WIDTH, Model, ToastLevel, View};
pub use update::{Message, update};

use std::path::PathBuf;

use chrono::NaiveDate;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    notes_dir: PathBuf,
    start_date: Option<String>,
    tab_width: usize,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application storing notes in `notes_dir`.
    pub fn new(notes_dir: PathBuf) -> Self {
        Self {
            notes_dir,
            start_date: None,
            tab_width: DEFAULT_TAB_WIDTH,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Open this date instead of today. Any form the date parser accepts.
    pub fn with_start_date(mut self, date: Option<String>) -> Self {
        self.start_date = date;
        self
    }

    /// Spaces inserted by Tab.
    pub const fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    /// Resolve the start date against `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the start date is not a recognised date.
    pub fn resolve_start_date(
        &self,
        dates: &dyn crate::dates::DateService,
    ) -> anyhow::Result<NaiveDate> {
        match self.start_date.as_deref() {
            None => Ok(dates.today()),
            Some(text) => dates
                .parse(text)
                .ok_or_else(|| anyhow::anyhow!("Unrecognised date: {text}")),
        }
    }
}

#[cfg(test)]
mod tests;
