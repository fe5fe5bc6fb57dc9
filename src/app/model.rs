use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::document::Document;
use crate::editor::EditorBuffer;
use crate::ui::viewport::Viewport;

/// Default quiescence window for committing editor input to the preview.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. The core invariant:
/// `preview` is always the markup conversion of `input`, and `input` is the
/// editor buffer's contents as of the last debounced commit.
pub struct Model {
    /// The live editor buffer (raw input; mutated by every keystroke)
    pub buffer: EditorBuffer,
    /// The committed raw text the preview was converted from
    pub input: String,
    /// The derived preview document
    pub preview: Document,
    /// Viewport managing preview scroll position
    pub preview_viewport: Viewport,
    /// Scroll offset for the editor pane (first visible line)
    pub editor_scroll_offset: usize,
    /// Path being edited; `None` for an untitled buffer
    pub file_path: Option<PathBuf>,
    /// Whether the preview pane is visible
    pub preview_visible: bool,
    /// Whether the help overlay is visible
    pub help_visible: bool,
    /// True while an edit burst is waiting out the quiescence window
    pub preview_pending: bool,
    /// Quiescence window for preview commits
    pub debounce: Duration,
    /// Optional maximum preview wrap width in columns
    pub wrap_width: Option<u16>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after first quit attempt with unsaved changes; second quit proceeds
    pub quit_confirmed: bool,
    toast: Option<Toast>,
    terminal_size: (u16, u16),
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("preview_visible", &self.preview_visible)
            .field("preview_pending", &self.preview_pending)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model with the given initial text.
    ///
    /// The preview starts as the conversion of the initial text, so the
    /// derived-value invariant holds from the first frame.
    pub fn new(file_path: Option<PathBuf>, text: &str, terminal_size: (u16, u16)) -> Self {
        let mut model = Self {
            buffer: EditorBuffer::from_text(text),
            input: text.to_string(),
            preview: Document::empty(),
            preview_viewport: Viewport::new(terminal_size.1.saturating_sub(1), 0),
            editor_scroll_offset: 0,
            file_path,
            preview_visible: true,
            help_visible: false,
            preview_pending: false,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            wrap_width: None,
            should_quit: false,
            quit_confirmed: false,
            toast: None,
            terminal_size,
        };
        model.relayout();
        model
    }

    /// Commit the live buffer into the input and recompute the preview.
    ///
    /// This is the debounced state mutation: the derived preview always
    /// equals the conversion of the committed input.
    pub fn refresh_preview(&mut self) {
        self.input = self.buffer.text();
        self.relayout();
    }

    /// Re-convert the committed input at the current layout width.
    ///
    /// A failed conversion keeps the previous preview.
    pub fn relayout(&mut self) {
        let width = self.preview_layout_width();
        if let Ok(document) = Document::parse_with_layout(&self.input, width) {
            self.preview = document;
            self.preview_viewport
                .set_total_lines(self.preview.line_count());
        }
    }

    /// Apply a terminal resize, reflowing the preview.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        self.preview_viewport.resize(height.saturating_sub(1));
        self.ensure_cursor_visible();
        self.relayout();
    }

    pub const fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Whether the buffer has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// Filename for the status bar, or "untitled".
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(std::path::Path::file_name)
            .map_or_else(|| "untitled".to_string(), |n| n.to_string_lossy().to_string())
    }

    pub(crate) fn preview_layout_width(&self) -> u16 {
        let content = crate::ui::preview_content_width(self.terminal_size.0);
        match self.wrap_width {
            Some(w) if w > 0 => content.min(w),
            _ => content,
        }
    }

    /// Rows available to the editor pane.
    pub fn editor_view_height(&self) -> usize {
        usize::from(self.terminal_size.1.saturating_sub(1))
    }

    /// Keep the editor cursor line inside the visible pane.
    pub fn ensure_cursor_visible(&mut self) {
        let cursor_line = self.buffer.cursor().line;
        let visible_height = self.editor_view_height();
        if visible_height == 0 {
            self.editor_scroll_offset = cursor_line;
            return;
        }
        if cursor_line < self.editor_scroll_offset {
            self.editor_scroll_offset = cursor_line;
        } else if cursor_line >= self.editor_scroll_offset + visible_height {
            self.editor_scroll_offset = cursor_line + 1 - visible_height;
        }
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new(None, "", (80, 24))
    }
}
