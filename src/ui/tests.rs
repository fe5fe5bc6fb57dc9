use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::app::Model;

use super::{editor_gutter_width, pane_rects, preview_content_width, render, split_panes};

fn render_model(model: &Model, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| render(frame, model)).unwrap();
    terminal.backend().buffer().clone()
}

fn buffer_text(buffer: &Buffer) -> String {
    let mut out = String::new();
    for row in 0..buffer.area.height {
        for col in 0..buffer.area.width {
            out.push_str(buffer[(col, row)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn test_split_panes_halves_area() {
    let (editor, preview) = split_panes(Rect::new(0, 0, 80, 24), true);
    let preview = preview.unwrap();
    assert_eq!(editor.width + preview.width, 80);
    assert_eq!(editor.x, 0);
    assert_eq!(preview.x, editor.width);
}

#[test]
fn test_split_panes_hidden_preview_uses_full_width() {
    let (editor, preview) = split_panes(Rect::new(0, 0, 80, 24), false);
    assert!(preview.is_none());
    assert_eq!(editor.width, 80);
}

#[test]
fn test_pane_rects_exclude_status_bar() {
    let (editor, _) = pane_rects((80, 24), true);
    assert_eq!(editor.height, 23);
}

#[test]
fn test_preview_content_width_has_floor() {
    assert_eq!(preview_content_width(80), 38);
    assert_eq!(preview_content_width(10), 10);
}

#[test]
fn test_gutter_width_grows_with_line_count() {
    assert_eq!(editor_gutter_width(1), 4);
    assert_eq!(editor_gutter_width(999), 4);
    assert_eq!(editor_gutter_width(1000), 5);
}

#[test]
fn test_render_shows_source_and_preview() {
    let model = Model::new(None, "# Title\n\nbody text", (80, 24));
    let text = buffer_text(&render_model(&model, 80, 24));
    // Editor pane shows raw markup, preview shows the converted heading
    assert!(text.contains("# Title"));
    assert!(text.contains("body text"));
}

#[test]
fn test_render_status_bar_shows_untitled_and_position() {
    let model = Model::new(None, "", (80, 24));
    let text = buffer_text(&render_model(&model, 80, 24));
    assert!(text.contains("untitled"));
    assert!(text.contains("Ln 1, Col 1"));
}

#[test]
fn test_render_status_bar_shows_dirty_marker() {
    let mut model = Model::new(None, "", (80, 24));
    model.buffer.insert_char('x');
    let text = buffer_text(&render_model(&model, 80, 24));
    assert!(text.contains("[+]"));
}

#[test]
fn test_render_hidden_preview_has_no_divider() {
    let mut model = Model::new(None, "plain", (80, 24));
    model.preview_visible = false;
    let text = buffer_text(&render_model(&model, 80, 24));
    assert!(!text.contains('│'));
}

#[test]
fn test_render_help_overlay() {
    let mut model = Model::new(None, "", (80, 24));
    model.help_visible = true;
    let text = buffer_text(&render_model(&model, 80, 24));
    assert!(text.contains("Help"));
    assert!(text.contains("Ctrl+S"));
}

#[test]
fn test_render_multibyte_cursor_line() {
    let mut model = Model::new(None, "# привет", (80, 24));
    model.buffer.move_to(0, 4);
    let text = buffer_text(&render_model(&model, 80, 24));
    assert!(text.contains("# привет"));
}

#[test]
fn test_render_tiny_terminal_does_not_panic() {
    let model = Model::new(None, "# Title", (5, 1));
    let _ = render_model(&model, 5, 1);
}
