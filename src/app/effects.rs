//! Side effects: the one place messages touch the filesystem.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::App;
use super::model::{Model, ToastLevel};
use super::update::Message;

impl App {
    /// Handle effects a pure update cannot perform.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        if matches!(msg, Message::Save) {
            save_buffer(model);
        }
    }
}

/// Write the live buffer (not just the committed input) to disk.
fn save_buffer(model: &mut Model) {
    let Some(path) = model.file_path.clone() else {
        warn!("save requested for untitled buffer");
        model.show_toast(ToastLevel::Warning, "No file name for this buffer");
        return;
    };

    match write_text(&path, &model.buffer.text()) {
        Ok(()) => {
            model.buffer.mark_clean();
            info!(path = %path.display(), "saved");
            model.show_toast(ToastLevel::Info, format!("Saved {}", path.display()));
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "save failed");
            model.show_toast(ToastLevel::Error, format!("Save failed: {err:#}"));
        }
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}
