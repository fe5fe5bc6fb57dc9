//! Markdown document conversion and display types.
//!
//! This module holds the markup-conversion half of the editor binding:
//! - Parsing markdown with comrak
//! - Rendering to styled, wrapped lines for display

mod parser;
mod types;

pub use parser::{parse, parse_with_layout};
pub use types::{Document, InlineSpan, InlineStyle, LineType, RenderedLine};
