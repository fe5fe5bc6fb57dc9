//! Rope-backed text buffer for the input pane.
//!
//! Provides cursor management and char-indexed editing operations,
//! designed for integration into the TEA architecture.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
