//! markpad - a terminal markdown editor with a debounced live preview.
//!
//! The left pane is a plain-text editor over the raw markup; the right pane
//! shows the converted document and always reflects the input as of the last
//! commit. Keystrokes mutate the buffer immediately, but the conversion only
//! runs after the input has been quiet for a short window (100ms by
//! default), so a fast burst of typing costs one conversion, not one per
//! key.
//!
//! Modules:
//! - [`app`]: model, messages, pure update function, event loop
//! - [`document`]: markup-to-display conversion
//! - [`editor`]: rope-backed text buffer with char-indexed cursor
//! - [`ui`]: ratatui rendering
//! - [`config`]: CLI flags with a persistent flag file

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod ui;
