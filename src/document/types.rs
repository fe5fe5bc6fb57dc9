//! Core document types.

/// Inline styling flags accumulated while walking the comrak AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InlineStyle {
    /// Bold (`**text**`)
    pub strong: bool,
    /// Italic (`*text*`)
    pub emphasis: bool,
    /// Inline code (`` `text` ``)
    pub code: bool,
    /// Strikethrough (`~~text~~`)
    pub strikethrough: bool,
    /// Link text
    pub link: bool,
}

/// A run of text with uniform inline styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// The kind of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Heading with its level (1-6)
    Heading(u8),
    /// Regular paragraph text
    Paragraph,
    /// Line inside a fenced or indented code block
    CodeBlock,
    /// Line inside a block quote
    BlockQuote,
    /// List item line with its nesting depth
    ListItem(usize),
    /// Thematic break (`---`)
    HorizontalRule,
    /// Blank separator line
    Empty,
}

/// A single display line of converted markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    line_type: LineType,
    spans: Option<Vec<InlineSpan>>,
}

impl RenderedLine {
    /// Create a line without inline span detail.
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: None,
        }
    }

    /// Create a line carrying styled inline spans.
    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans: Some(spans),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> LineType {
        self.line_type
    }

    pub fn spans(&self) -> Option<&[InlineSpan]> {
        self.spans.as_deref()
    }
}

/// A converted markdown document: the retained source and its display lines.
///
/// The document is the derived half of the editor binding: it is always the
/// conversion of the raw text it was built from, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    source: String,
    lines: Vec<RenderedLine>,
}

impl Document {
    /// Create an empty document.
    pub const fn empty() -> Self {
        Self {
            source: String::new(),
            lines: Vec::new(),
        }
    }

    pub(crate) const fn from_lines(source: String, lines: Vec<RenderedLine>) -> Self {
        Self { source, lines }
    }

    /// The raw text this document was converted from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Total number of display lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All display lines.
    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    /// A specific display line by index.
    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }

    /// Display lines from `offset` to `offset + count`, clamped.
    pub fn visible_lines(&self, offset: usize, count: usize) -> &[RenderedLine] {
        let start = offset.min(self.lines.len());
        let end = (start + count).min(self.lines.len());
        &self.lines[start..end]
    }
}
