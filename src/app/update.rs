//! Pure state transitions.

use tracing::debug;

use crate::editor::Direction;

use super::model::{Model, ToastLevel};

/// Every state change in the application is expressed as a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    InsertChar(char),
    InsertNewline,
    InsertTab,
    DeleteBack,
    DeleteForward,
    // Cursor motion
    MoveCursor(Direction),
    MoveHome,
    MoveEnd,
    MoveWordLeft,
    MoveWordRight,
    MoveToStart,
    MoveToEnd,
    MoveTo(usize, usize),
    // Editor pane scrolling
    EditorScrollUp(usize),
    EditorScrollDown(usize),
    // Preview
    RefreshPreview,
    PreviewScrollUp(usize),
    PreviewScrollDown(usize),
    PreviewPageUp,
    PreviewPageDown,
    TogglePreview,
    // Overlays
    ToggleHelp,
    HideHelp,
    // Files
    Save,
    // Window
    Resize(u16, u16),
    // Application
    Quit,
}

impl Message {
    /// Messages that mutate the buffer text and therefore restart the
    /// preview quiescence window.
    pub const fn is_edit(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertNewline
                | Self::InsertTab
                | Self::DeleteBack
                | Self::DeleteForward
        )
    }
}

/// Apply a message to the model, producing the next state.
///
/// Pure except for logging: no I/O happens here (see `effects`).
#[allow(clippy::needless_pass_by_value)]
pub fn update(mut model: Model, msg: Message) -> Model {
    // A pending quit confirmation survives only an immediate second quit.
    if !matches!(msg, Message::Quit) {
        model.quit_confirmed = false;
    }

    match msg {
        Message::InsertChar(c) => {
            model.buffer.insert_char(c);
            model.ensure_cursor_visible();
        }
        Message::InsertNewline => {
            model.buffer.insert_char('\n');
            model.ensure_cursor_visible();
        }
        Message::InsertTab => {
            model.buffer.insert_str("    ");
            model.ensure_cursor_visible();
        }
        Message::DeleteBack => {
            model.buffer.delete_back();
            model.ensure_cursor_visible();
        }
        Message::DeleteForward => {
            model.buffer.delete_forward();
        }
        Message::MoveCursor(direction) => {
            model.buffer.move_cursor(direction);
            model.ensure_cursor_visible();
        }
        Message::MoveHome => model.buffer.move_home(),
        Message::MoveEnd => model.buffer.move_end(),
        Message::MoveWordLeft => model.buffer.move_word_left(),
        Message::MoveWordRight => model.buffer.move_word_right(),
        Message::MoveToStart => {
            model.buffer.move_to_start();
            model.ensure_cursor_visible();
        }
        Message::MoveToEnd => {
            model.buffer.move_to_end();
            model.ensure_cursor_visible();
        }
        Message::MoveTo(line, col) => {
            model.buffer.move_to(line, col);
            model.ensure_cursor_visible();
        }
        Message::EditorScrollUp(n) => {
            model.editor_scroll_offset = model.editor_scroll_offset.saturating_sub(n);
        }
        Message::EditorScrollDown(n) => {
            let max = model.buffer.line_count().saturating_sub(1);
            model.editor_scroll_offset = (model.editor_scroll_offset + n).min(max);
        }
        Message::RefreshPreview => {
            debug!(chars = model.buffer.text().len(), "refreshing preview");
            model.refresh_preview();
        }
        Message::PreviewScrollUp(n) => model.preview_viewport.scroll_up(n),
        Message::PreviewScrollDown(n) => model.preview_viewport.scroll_down(n),
        Message::PreviewPageUp => model.preview_viewport.page_up(),
        Message::PreviewPageDown => model.preview_viewport.page_down(),
        Message::TogglePreview => {
            model.preview_visible = !model.preview_visible;
            model.relayout();
        }
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Save => {
            // I/O handled in effects
        }
        Message::Resize(width, height) => model.resize(width, height),
        Message::Quit => {
            if model.is_dirty() && !model.quit_confirmed {
                model.quit_confirmed = true;
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes - press Ctrl+Q again to discard",
                );
            } else {
                model.should_quit = true;
            }
        }
    }

    model
}
