// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # labbook
//!
//! A modal terminal notebook with one plain-text note per day.
//!
//! labbook edits date-keyed markdown notes with:
//! - Vim-style Normal and Insert modes
//! - A `:` command line with aliases and Tab completion of commands and headings
//! - Day navigation, full-text search across notes and line clipboard commands
//!
//! ## Architecture
//!
//! labbook uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions that queue effects
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop, state and key routing
//! - [`editor`]: Line buffer and cursor model
//! - [`command`]: Command parsing and autocomplete
//! - [`store`]: Note storage and search
//! - [`dates`]: Date parsing and formatting
//! - [`clipboard`]: System clipboard with an in-process fallback
//! - [`config`]: Saved default flags
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod dates;
pub mod editor;
pub mod store;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Effect, Message, Model, Services, update};
    pub use crate::editor::{EditorBuffer, Mode};
    pub use crate::store::{Note, NoteStore};
}
