//! Frame composition: editor pane, preview pane, overlays.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::Model;

use super::status::{render_status_bar, render_toast_bar};
use super::style::{style_for_inline, style_for_line_type};

/// Split the main area into editor and preview panes.
pub fn split_panes(area: Rect, preview_visible: bool) -> (Rect, Option<Rect>) {
    if !preview_visible {
        return (area, None);
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    (chunks[0], Some(chunks[1]))
}

/// Pane rectangles for a terminal of the given size (status bar excluded).
///
/// Used by mouse handling to decide which pane a click or scroll targets.
pub fn pane_rects(size: (u16, u16), preview_visible: bool) -> (Rect, Option<Rect>) {
    let main = Rect::new(0, 0, size.0, size.1.saturating_sub(1));
    split_panes(main, preview_visible)
}

/// Columns available for converted text in the preview pane.
///
/// The pane is the right half of the terminal with a one-column border and
/// one column of padding. The same width is used while the pane is hidden so
/// toggling it back on does not reflow.
pub fn preview_content_width(total_width: u16) -> u16 {
    (total_width / 2).saturating_sub(2).max(10)
}

/// Width of the editor line-number gutter, including the trailing space.
pub fn editor_gutter_width(line_count: usize) -> u16 {
    let digits = line_count.max(1).ilog10() as u16 + 1;
    digits.max(3) + 1
}

/// Render the entire UI.
pub fn render(frame: &mut Frame, model: &Model) {
    let area = frame.area();
    if area.height < 2 {
        return;
    }

    let toast = model.active_toast();
    let main_height = area.height - 1 - u16::from(toast.is_some());
    let main_area = Rect::new(area.x, area.y, area.width, main_height);

    let (editor_area, preview_area) = split_panes(main_area, model.preview_visible);
    render_editor(frame, editor_area, model);
    if let Some(preview_area) = preview_area {
        render_preview(frame, preview_area, model);
    }

    if let Some((message, level)) = toast {
        let toast_area = Rect::new(area.x, area.y + main_height, area.width, 1);
        render_toast_bar(frame, toast_area, message, level);
    }

    let status_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    render_status_bar(frame, status_area, model);

    if model.help_visible {
        render_help_overlay(frame, area);
    }
}

fn render_editor(frame: &mut Frame, area: Rect, model: &Model) {
    let buffer = &model.buffer;
    let cursor = buffer.cursor();
    let gutter_width = editor_gutter_width(buffer.line_count()) as usize;
    let gutter_style = Style::default().fg(Color::Indexed(240));
    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);

    let first = model.editor_scroll_offset;
    let last = (first + area.height as usize).min(buffer.line_count());

    let mut lines = Vec::with_capacity(area.height as usize);
    for line_idx in first..last {
        let content = buffer.line_at(line_idx).unwrap_or_default();
        let gutter = format!("{:>width$} ", line_idx + 1, width = gutter_width - 1);
        let mut spans = vec![Span::styled(gutter, gutter_style)];

        if line_idx == cursor.line {
            // Split at the cursor by char index so the block cursor lands on
            // the right cell for multi-byte text.
            let chars: Vec<char> = content.chars().collect();
            let before: String = chars[..cursor.col.min(chars.len())].iter().collect();
            spans.push(Span::raw(before));
            if cursor.col < chars.len() {
                spans.push(Span::styled(chars[cursor.col].to_string(), cursor_style));
                let after: String = chars[cursor.col + 1..].iter().collect();
                spans.push(Span::raw(after));
            } else {
                spans.push(Span::styled(" ", cursor_style));
            }
        } else {
            spans.push(Span::raw(content));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_preview(frame: &mut Frame, area: Rect, model: &Model) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::Indexed(240)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let range = model.preview_viewport.visible_range();
    let visible = model.preview.visible_lines(range.start, range.len());
    let mut lines = Vec::with_capacity(visible.len());
    for rendered in visible {
        let base = style_for_line_type(rendered.line_type());
        let line = rendered.spans().map_or_else(
            || Line::from(Span::styled(format!(" {}", rendered.content()), base)),
            |spans| {
                let mut out = vec![Span::raw(" ")];
                out.extend(spans.iter().map(|span| {
                    Span::styled(span.text().to_string(), style_for_inline(base, span.style()))
                }));
                Line::from(out)
            },
        );
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

const HELP_ENTRIES: &[(&str, &str)] = &[
    ("Ctrl+S", "Save"),
    ("Ctrl+Q", "Quit (twice to discard changes)"),
    ("Ctrl+P", "Toggle preview pane"),
    ("Arrows", "Move cursor"),
    ("Ctrl+Left/Right", "Move by word"),
    ("Home/End", "Start / end of line"),
    ("Ctrl+Home/End", "Start / end of buffer"),
    ("PgUp/PgDn", "Scroll editor"),
    ("Ctrl+PgUp/PgDn", "Scroll preview"),
    ("Mouse wheel", "Scroll pane under pointer"),
    ("F1 / Esc", "Toggle / close this help"),
];

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 46.min(area.width.saturating_sub(2));
    let height = (HELP_ENTRIES.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    let lines: Vec<Line> = HELP_ENTRIES
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:<16}"),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
