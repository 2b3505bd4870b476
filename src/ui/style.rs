//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's color palette.

use ratatui::style::{Color, Modifier, Style};

use crate::command::parse_heading;
use crate::editor::Mode;

/// Markdown heading level of a raw line, if it is one.
///
/// Uses the same rule as the `goto` heading index.
pub fn heading_level(line: &str) -> Option<u8> {
    parse_heading(line).map(|(level, _)| level)
}

/// Bold with a distinct color per level.
pub fn heading_style(level: u8) -> Style {
    match level {
        1 => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        2 => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        3 => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        4 => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        5 => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    }
}

/// Style for one raw note line in the editor pane.
pub fn style_for_line(line: &str) -> Style {
    if let Some(level) = heading_level(line) {
        return heading_style(level);
    }
    let trimmed = line.trim_start();
    if trimmed.starts_with('>') {
        // Block quotes - italic blue
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC)
    } else if trimmed.starts_with("```") {
        Style::default().fg(Color::Indexed(245))
    } else {
        Style::default()
    }
}

/// Colored badge for the mode indicator.
pub fn mode_badge_style(mode: Mode) -> Style {
    let bg = match mode {
        Mode::Normal => Color::Blue,
        Mode::Insert => Color::Green,
    };
    Style::default()
        .bg(bg)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

/// Block caret drawn over the character under the cursor in Normal mode.
pub fn caret_style() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}

/// Matched text inside a search result.
pub fn match_style() -> Style {
    Style::default().bg(Color::Yellow).fg(Color::Black)
}
