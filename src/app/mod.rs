//! Application core, following The Elm Architecture.
//!
//! State lives in [`Model`], every change is a [`Message`], and
//! [`update`] is the single pure transition function. The event loop
//! debounces buffer edits so the preview recomputes once per burst of
//! keystrokes, after the input has been quiet for the configured window.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;


use std::fs;
use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use tracing::info;

use crate::config::Cli;

pub use model::{DEFAULT_DEBOUNCE_MS, Model, ToastLevel};
pub use update::{Message, update};

/// Owns the model and drives the terminal session.
pub struct App {
    model: Model,
}

impl App {
    /// Build the initial state from CLI options.
    ///
    /// A missing file is not an error: the buffer starts empty and the file
    /// is created on first save.
    pub fn new(cli: &Cli) -> Result<Self> {
        let text = match &cli.file {
            Some(path) if path.exists() => fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
            _ => String::new(),
        };

        let size = crossterm::terminal::size().unwrap_or((80, 24));
        let mut model = Model::new(cli.file.clone(), &text, size);
        model.preview_visible = !cli.no_preview;
        model.debounce = Duration::from_millis(cli.debounce_ms);
        model.wrap_width = cli.wrap_width;
        model.relayout();

        Ok(Self { model })
    }

    /// Enter the alternate screen and run until quit.
    pub fn run(mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()?;
        execute!(stdout(), EnableMouseCapture)?;
        info!("entering event loop");

        let result = event_loop::run_event_loop(&mut terminal, &mut self.model);

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();
        result
    }
}
