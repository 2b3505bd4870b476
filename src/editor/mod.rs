//! Modal text buffer for editing a single day's note.
//!
//! Provides a line-oriented buffer with cursor management and a
//! preferred column, designed for integration into the TEA architecture.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer, Mode};
