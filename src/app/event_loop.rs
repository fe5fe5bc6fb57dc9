//! The terminal event loop.
//!
//! Polls crossterm for input, translates events into messages, and applies
//! them through `update`. Buffer edits and terminal resizes are debounced so
//! a burst of events results in a single expensive recomputation.

use std::mem;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event;
use ratatui::DefaultTerminal;
use tracing::{debug, trace};

use super::App;
use super::input::handle_event;
use super::model::Model;
use super::update::{Message, update};

pub(super) const RESIZE_DEBOUNCE_MS: u64 = 100;

/// Collapses a burst of events into one deferred action.
///
/// Queueing a value replaces any pending one and restarts the delay, so the
/// action fires exactly once with the latest value, after the burst has been
/// quiet for the full window.
#[derive(Debug)]
pub(super) struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> Debouncer<T> {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) fn queue(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms));
    }

    /// Take the pending value if its quiescence window has elapsed.
    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|&(_, queued_at)| now_ms.saturating_sub(queued_at) >= self.delay_ms);
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub(super) fn run_event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
    let start = Instant::now();
    let mut preview_debouncer: Debouncer<()> =
        Debouncer::new(u64::try_from(model.debounce.as_millis()).unwrap_or(u64::MAX));
    let mut resize_debouncer: Debouncer<(u16, u16)> = Debouncer::new(RESIZE_DEBOUNCE_MS);
    let mut needs_render = true;

    loop {
        if model.expire_toast(Instant::now()) {
            needs_render = true;
        }

        let now_ms = elapsed_ms(start);
        if preview_debouncer.take_ready(now_ms).is_some() {
            debug!("input quiescent, committing");
            *model = update(mem::take(model), Message::RefreshPreview);
            needs_render = true;
        }
        if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
            *model = update(mem::take(model), Message::Resize(width, height));
            needs_render = true;
        }

        if model.preview_pending != preview_debouncer.is_pending() {
            model.preview_pending = preview_debouncer.is_pending();
            needs_render = true;
        }

        // Tight poll while work is queued, relaxed when idle.
        let poll_ms = if needs_render {
            0
        } else if preview_debouncer.is_pending()
            || resize_debouncer.is_pending()
            || model.active_toast().is_some()
        {
            10
        } else {
            250
        };

        if event::poll(Duration::from_millis(poll_ms))? {
            // Drain everything already buffered before rendering.
            loop {
                let raw = event::read()?;
                let event_ms = elapsed_ms(start);
                if let Some(msg) = handle_event(&raw, model, &mut resize_debouncer, event_ms) {
                    trace!(?msg, "applying message");
                    if msg.is_edit() {
                        preview_debouncer.queue((), event_ms);
                    }
                    *model = update(mem::take(model), msg.clone());
                    App::handle_message_side_effects(model, &msg);
                    needs_render = true;
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if needs_render {
            terminal.draw(|frame| crate::ui::render(frame, model))?;
            needs_render = false;
        }

        if model.should_quit {
            return Ok(());
        }
    }
}
