//! Terminal rendering.
//!
//! Pure functions from the model to a ratatui frame: the editor pane on the
//! left, the converted preview on the right, a status bar, transient
//! notifications, and a help overlay.

mod render;
mod status;
pub mod style;
pub mod viewport;

pub use render::{
    editor_gutter_width, pane_rects, preview_content_width, render, split_panes,
};

#[cfg(test)]
mod tests;
