//! Terminal UI components.
//!
//! Rendering only reads the [`Model`](crate::app::Model):
//! - [`render`]: editor or results pane, status bar and bottom line
//! - [`style`]: Theming and colors

pub mod style;

mod overlays;
mod render;
mod status;

pub use overlays::{autocomplete_window_start, centered_popup_rect};
pub use render::{line_number_width, render};

/// Most candidates the autocomplete popup shows at once.
pub const AUTOCOMPLETE_MAX_ROWS: usize = 8;
