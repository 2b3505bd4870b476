use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, ToastLevel, View};
use crate::dates::format_display;
use crate::editor::Mode;

/// Key hints shown on the bottom line when nothing else is.
const EDITOR_HINTS: &str = " :command  /search  h/l day  i insert  ?:help";
const INSERT_HINTS: &str = " Esc normal  Ctrl+S save";
const RESULTS_HINTS: &str = " j/k select  Enter open  Esc back";

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let bar_style = Style::default().bg(Color::DarkGray).fg(Color::White);

    let mut spans = vec![Span::styled(
        format!(" {} ", model.mode.label()),
        super::style::mode_badge_style(model.mode),
    )];

    let mut date = format!(" {}", format_display(model.current_date));
    if model.current_date == model.today {
        date.push_str(" (today)");
    }
    spans.push(Span::styled(date, bar_style.add_modifier(Modifier::BOLD)));

    if model.is_dirty() {
        spans.push(Span::styled(
            " [modified]",
            bar_style.fg(Color::Yellow),
        ));
    }
    if !model.note_exists {
        spans.push(Span::styled(" [new]", bar_style.fg(Color::Cyan)));
    }

    let cursor = model.buffer.cursor();
    spans.push(Span::styled(
        format!("  L {}/{}", cursor.line + 1, model.buffer.line_count()),
        bar_style,
    ));

    let status_bar = Paragraph::new(Line::from(spans)).style(bar_style);
    frame.render_widget(status_bar, area);
}

/// The command line while it is open, else a toast, else key hints.
pub fn render_bottom_line(model: &Model, frame: &mut Frame, area: Rect) {
    if model.command_line.active {
        render_command_line(model, frame, area);
    } else if model.active_toast().is_some() {
        render_toast_bar(model, frame, area);
    } else {
        let hints = match (model.view, model.mode) {
            (View::Results, _) => RESULTS_HINTS,
            (View::Editor, Mode::Insert) => INSERT_HINTS,
            (View::Editor, Mode::Normal) => EDITOR_HINTS,
        };
        let line = Paragraph::new(hints).style(Style::default().fg(Color::Indexed(245)));
        frame.render_widget(line, area);
    }
}

fn render_command_line(model: &Model, frame: &mut Frame, area: Rect) {
    let text = format!(":{}", model.command_line.input);
    let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(text), area);
    if area.height > 0 {
        let x = area
            .x
            .saturating_add(width)
            .min(area.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(x, area.y));
    }
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
