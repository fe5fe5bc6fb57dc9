//! Translation of terminal events into messages.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use unicode_width::UnicodeWidthChar;

use super::event_loop::Debouncer;
use super::model::Model;
use super::update::Message;

const SCROLL_STEP: usize = 3;

pub(super) fn handle_event(
    event: &Event,
    model: &Model,
    resize_debouncer: &mut Debouncer<(u16, u16)>,
    now_ms: u64,
) -> Option<Message> {
    match event {
        Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
            handle_key(key, model)
        }
        Event::Mouse(mouse) => handle_mouse(mouse, model),
        Event::Resize(width, height) => {
            resize_debouncer.queue((*width, *height), now_ms);
            None
        }
        _ => None,
    }
}

fn handle_key(key: &KeyEvent, model: &Model) -> Option<Message> {
    // Any key dismisses the help overlay
    if model.help_visible {
        return Some(Message::HideHelp);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q' | 'Q') if ctrl => Some(Message::Quit),
        KeyCode::Char('s' | 'S') if ctrl => Some(Message::Save),
        KeyCode::Char('p' | 'P') if ctrl => Some(Message::TogglePreview),
        KeyCode::F(1) => Some(Message::ToggleHelp),
        KeyCode::Enter => Some(Message::InsertNewline),
        KeyCode::Tab => Some(Message::InsertTab),
        KeyCode::Backspace => Some(Message::DeleteBack),
        KeyCode::Delete => Some(Message::DeleteForward),
        KeyCode::Left if ctrl => Some(Message::MoveWordLeft),
        KeyCode::Right if ctrl => Some(Message::MoveWordRight),
        KeyCode::Home if ctrl => Some(Message::MoveToStart),
        KeyCode::End if ctrl => Some(Message::MoveToEnd),
        KeyCode::Left => Some(Message::MoveCursor(crate::editor::Direction::Left)),
        KeyCode::Right => Some(Message::MoveCursor(crate::editor::Direction::Right)),
        KeyCode::Up => Some(Message::MoveCursor(crate::editor::Direction::Up)),
        KeyCode::Down => Some(Message::MoveCursor(crate::editor::Direction::Down)),
        KeyCode::Home => Some(Message::MoveHome),
        KeyCode::End => Some(Message::MoveEnd),
        KeyCode::PageUp if ctrl => Some(Message::PreviewPageUp),
        KeyCode::PageDown if ctrl => Some(Message::PreviewPageDown),
        KeyCode::PageUp => Some(Message::EditorScrollUp(model.editor_view_height())),
        KeyCode::PageDown => Some(Message::EditorScrollDown(model.editor_view_height())),
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Message::InsertChar(c))
        }
        _ => None,
    }
}

fn handle_mouse(mouse: &MouseEvent, model: &Model) -> Option<Message> {
    let (editor_area, preview_area) =
        crate::ui::pane_rects(model.terminal_size(), model.preview_visible);
    let position = Position::new(mouse.column, mouse.row);
    let in_preview = preview_area.is_some_and(|area| area.contains(position));

    match mouse.kind {
        MouseEventKind::ScrollUp => Some(if in_preview {
            Message::PreviewScrollUp(SCROLL_STEP)
        } else {
            Message::EditorScrollUp(SCROLL_STEP)
        }),
        MouseEventKind::ScrollDown => Some(if in_preview {
            Message::PreviewScrollDown(SCROLL_STEP)
        } else {
            Message::EditorScrollDown(SCROLL_STEP)
        }),
        MouseEventKind::Down(MouseButton::Left) if editor_area.contains(position) => {
            Some(click_to_cursor(mouse, editor_area, model))
        }
        _ => None,
    }
}

/// Map a click in the editor pane to a buffer position.
///
/// The display column is walked char by char with unicode widths, so clicks
/// land correctly on lines with wide or multi-byte characters.
fn click_to_cursor(mouse: &MouseEvent, area: Rect, model: &Model) -> Message {
    let line = (model.editor_scroll_offset + usize::from(mouse.row - area.y))
        .min(model.buffer.line_count().saturating_sub(1));

    let gutter = crate::ui::editor_gutter_width(model.buffer.line_count());
    let target = usize::from((mouse.column - area.x).saturating_sub(gutter));

    let content = model.buffer.line_at(line).unwrap_or_default();
    let mut width = 0usize;
    let mut col = 0usize;
    for ch in content.chars() {
        if width >= target {
            break;
        }
        width += UnicodeWidthChar::width(ch).unwrap_or(0);
        col += 1;
    }

    Message::MoveTo(line, col)
}
