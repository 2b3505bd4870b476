use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, View};
use crate::dates::format_storage;
use crate::editor::Mode;
use crate::store::SearchResult;

use super::{overlays, status, style};

/// Rows below the main pane: status bar, then the command/toast line.
const FOOTER_ROWS: u16 = 2;

/// Result snippets longer than this are cut with an ellipsis.
const SNIPPET_MAX_CHARS: usize = 60;

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();

    let main_area = Rect {
        height: area.height.saturating_sub(FOOTER_ROWS),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(FOOTER_ROWS),
        height: area.height.min(1),
        ..area
    };
    let bottom_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    match model.view {
        View::Editor => render_editor(model, frame, main_area),
        View::Results => render_results(model, frame, main_area),
    }

    status::render_status_bar(model, frame, status_area);
    status::render_bottom_line(model, frame, bottom_area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if model.autocomplete.active {
        overlays::render_autocomplete(model, frame, main_area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let buf = &model.buffer;

    // Line number gutter width
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines);

    let visible_height = area.height as usize;
    let start = buf.scroll_offset().min(total_lines.saturating_sub(1));
    let end = (start + visible_height).min(total_lines);
    let cursor = buf.cursor();
    let block_caret = model.mode == Mode::Normal && !model.command_line.active;

    let mut content: Vec<Line> = Vec::new();
    for (line_idx, line_text) in buf.lines().iter().enumerate().take(end).skip(start) {
        let is_cursor_line = line_idx == cursor.line;
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);
        let number_style = if is_cursor_line {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![Span::styled(line_num, number_style)];
        let text_style = style::style_for_line(line_text);

        if block_caret && is_cursor_line {
            let (before, under, after) = split_at_char(line_text, cursor.col);
            if !before.is_empty() {
                spans.push(Span::styled(before.to_string(), text_style));
            }
            let under = if under.is_empty() { " " } else { under };
            spans.push(Span::styled(under.to_string(), style::caret_style()));
            if !after.is_empty() {
                spans.push(Span::styled(after.to_string(), text_style));
            }
        } else {
            spans.push(Span::styled(line_text.clone(), text_style));
        }

        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);

    let caret_visible = (start..end).contains(&cursor.line) && area.height > 0;
    if model.mode == Mode::Insert && !model.command_line.active && caret_visible {
        let line_text = buf.line_at(cursor.line).unwrap_or_default();
        let (before, _, _) = split_at_char(line_text, cursor.col);
        let offset = u16::try_from(before.width()).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(gutter_width + 1)
            .saturating_add(offset)
            .min(area.right().saturating_sub(1));
        // Bounded by the visible height, which came from a u16
        #[allow(clippy::cast_possible_truncation)]
        let y = area.y + (cursor.line - start) as u16;
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn render_results(model: &Model, frame: &mut Frame, area: Rect) {
    let title = format!(
        "Search: \"{}\" ({} {})",
        model.search_query,
        model.search_results.len(),
        if model.search_results.len() == 1 {
            "match"
        } else {
            "matches"
        }
    );
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);

    let visible_rows = inner.height as usize;
    let selected = model.selected_result;
    // Keep the selection on screen.
    let start = (selected + 1).saturating_sub(visible_rows);

    let items: Vec<Line> = if model.search_results.is_empty() {
        vec![Line::styled(
            "  No matches",
            Style::default().fg(Color::Indexed(245)),
        )]
    } else {
        model
            .search_results
            .iter()
            .enumerate()
            .skip(start)
            .take(visible_rows)
            .map(|(idx, result)| result_line(result, idx == selected))
            .collect()
    };

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(items).block(block), area);
}

fn result_line(result: &SearchResult, selected: bool) -> Line<'static> {
    let marker = if selected { ">" } else { " " };
    let location = format!("{marker} {}:{:<4} ", format_storage(result.date), result.line);
    let location_style = Style::default().fg(Color::Cyan);

    let mut spans = vec![Span::styled(location, location_style)];
    spans.extend(snippet_spans(result));

    let line = Line::from(spans);
    if selected { line.reversed() } else { line }
}

/// The trimmed, truncated line text with the match highlighted.
fn snippet_spans(result: &SearchResult) -> Vec<Span<'static>> {
    let content = result.content.as_str();
    let valid = result.match_start <= result.match_end
        && content.is_char_boundary(result.match_start)
        && content.is_char_boundary(result.match_end.min(content.len()));
    let end = result.match_end.min(content.len());
    let (before, matched, after) = if valid {
        (
            &content[..result.match_start],
            &content[result.match_start..end],
            &content[end..],
        )
    } else {
        (content, "", "")
    };

    let before = before.trim_start();
    let mut budget = SNIPPET_MAX_CHARS;
    let mut spans = Vec::new();
    for (text, span_style) in [
        (before, Style::default()),
        (matched, style::match_style()),
        (after, Style::default()),
    ] {
        if budget == 0 {
            break;
        }
        let count = text.chars().count();
        if count <= budget {
            if !text.is_empty() {
                spans.push(Span::styled(text.to_string(), span_style));
            }
            budget -= count;
        } else {
            let cut: String = text.chars().take(budget).collect();
            spans.push(Span::styled(cut, span_style));
            spans.push(Span::raw("..."));
            budget = 0;
        }
    }
    spans
}

/// Split `text` around the character at `col`.
fn split_at_char(text: &str, col: usize) -> (&str, &str, &str) {
    let start = text.char_indices().nth(col).map_or(text.len(), |(i, _)| i);
    let end = text[start..]
        .chars()
        .next()
        .map_or(start, |c| start + c.len_utf8());
    (&text[..start], &text[start..end], &text[end..])
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
