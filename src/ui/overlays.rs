use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::command::{CompletionKind, help_lines};

use super::AUTOCOMPLETE_MAX_ROWS;

/// First candidate row shown so that `selected` stays inside the window.
pub const fn autocomplete_window_start(selected: usize, total: usize) -> usize {
    let max_start = total.saturating_sub(AUTOCOMPLETE_MAX_ROWS);
    let start = (selected + 1).saturating_sub(AUTOCOMPLETE_MAX_ROWS);
    if start < max_start { start } else { max_start }
}

/// Candidate list anchored to the bottom-left of `area`, just above the
/// status bar.
pub fn render_autocomplete(model: &Model, frame: &mut Frame, area: Rect) {
    let state = &model.autocomplete;
    if state.candidates.is_empty() || area.height < 3 {
        return;
    }

    let rows = state.candidates.len().min(AUTOCOMPLETE_MAX_ROWS);
    let start = autocomplete_window_start(state.selected_index, state.candidates.len());
    let widest = state
        .candidates
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or_default();

    // Both bounded by AUTOCOMPLETE_MAX_ROWS and the terminal width
    #[allow(clippy::cast_possible_truncation)]
    let popup_height = (rows as u16 + 2).min(area.height);
    #[allow(clippy::cast_possible_truncation)]
    let popup_width = (widest.min(usize::from(u16::MAX)) as u16)
        .saturating_add(6)
        .max(20)
        .min(area.width);
    let popup = Rect::new(
        area.x,
        area.y + area.height - popup_height,
        popup_width,
        popup_height,
    );

    let title = match state.kind {
        CompletionKind::Command => "Commands",
        CompletionKind::Argument => "Headings",
    };

    let lines: Vec<Line> = state
        .candidates
        .iter()
        .enumerate()
        .skip(start)
        .take(rows)
        .map(|(idx, candidate)| {
            if idx == state.selected_index {
                Line::styled(
                    format!("> {candidate}"),
                    Style::default().bg(Color::DarkGray).fg(Color::White),
                )
            } else {
                Line::raw(format!("  {candidate}"))
            }
        })
        .collect();

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let notes_dir = model
        .notes_dir
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut all_lines: Vec<Line> = Vec::new();

    // Commands
    all_lines.push(Line::styled("Commands", section_style));
    all_lines.extend(help_lines().iter().map(|line| Line::raw(format!("  {line}"))));
    all_lines.push(Line::raw("  Tab                 Complete command or heading"));
    all_lines.push(Line::raw(""));

    // Normal mode
    all_lines.push(Line::styled("Normal mode", section_style));
    all_lines.push(Line::raw("  j/k or Up/Down      Move line"));
    all_lines.push(Line::raw("  Left/Right          Move column"));
    all_lines.push(Line::raw("  0 / $               Line start / end"));
    all_lines.push(Line::raw("  g / G               Top / bottom"));
    all_lines.push(Line::raw("  h / l               Previous / next day"));
    all_lines.push(Line::raw("  i / a               Insert / append"));
    all_lines.push(Line::raw("  o / O               Open line below / above"));
    all_lines.push(Line::raw("  x                   Delete character"));
    all_lines.push(Line::raw("  :                   Command line"));
    all_lines.push(Line::raw("  /                   Search all notes"));
    all_lines.push(Line::raw(""));

    // Insert mode
    all_lines.push(Line::styled("Insert mode", section_style));
    all_lines.push(Line::raw("  Esc                 Back to normal mode"));
    all_lines.push(Line::raw("  Enter / Backspace   Split / join lines"));
    all_lines.push(Line::raw("  Tab                 Indent"));
    all_lines.push(Line::raw(""));

    // Anywhere
    all_lines.push(Line::styled("Anywhere", section_style));
    all_lines.push(Line::raw("  Ctrl-s              Save"));
    all_lines.push(Line::raw("  Ctrl-c              Save and quit"));
    all_lines.push(Line::raw("  Ctrl-q              Quit without saving"));
    all_lines.push(Line::raw(""));

    // Config
    all_lines.push(Line::styled("Config", section_style));
    all_lines.push(Line::raw(format!("  Notes: {notes_dir}")));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    let visible: Vec<Line> = all_lines
        .into_iter()
        .take(content_height as usize)
        .collect();
    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(visible), content_area);

    if inner.height > 0 {
        let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
        let footer = Line::styled("any key closes", dim_style);
        frame.render_widget(Paragraph::new(footer), footer_area);
    }
}

pub fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
