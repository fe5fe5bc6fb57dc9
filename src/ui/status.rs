//! Status bar and notification rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

/// Render the bottom status bar.
///
/// Left side: filename, dirty marker, cursor position. Right side: preview
/// scroll percentage (with a `~` while a commit is pending) and key hints.
pub fn render_status_bar(frame: &mut Frame, area: Rect, model: &Model) {
    let style = Style::default()
        .bg(Color::Magenta)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let cursor = model.buffer.cursor();
    let dirty = if model.is_dirty() { " [+]" } else { "" };
    let left = format!(
        " {}{}  Ln {}, Col {}",
        model.display_name(),
        dirty,
        cursor.line + 1,
        cursor.col + 1
    );

    let right = if model.preview_visible {
        let pending = if model.preview_pending { "~" } else { "" };
        format!(
            "{}{}%  ^S save  ^P preview  ^Q quit  F1 help ",
            pending,
            model.preview_viewport.scroll_percent()
        )
    } else {
        "^S save  ^P preview  ^Q quit  F1 help ".to_string()
    };

    let used = left.chars().count() + right.chars().count();
    let padding = (area.width as usize).saturating_sub(used);
    let line = Line::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(padding)),
        Span::raw(right),
    ]);

    frame.render_widget(Paragraph::new(line).style(style), area);
}

/// Render a transient notification bar above the status line.
pub fn render_toast_bar(frame: &mut Frame, area: Rect, message: &str, level: ToastLevel) {
    let style = match level {
        ToastLevel::Info => Style::default().bg(Color::DarkGray).fg(Color::White),
        ToastLevel::Warning => Style::default().bg(Color::Yellow).fg(Color::Black),
        ToastLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
    };
    let text = format!(" {message}");
    frame.render_widget(Paragraph::new(text).style(style), area);
}
