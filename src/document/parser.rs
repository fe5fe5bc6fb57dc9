//! Markdown conversion with comrak.
//!
//! Converts a raw markdown string into display markup: a flat list of
//! styled, width-wrapped [`RenderedLine`]s. Conversion is a pure function
//! of the source text and the layout width.

use anyhow::Result;
use comrak::nodes::{AstNode, ListDelimType, ListType, NodeList, NodeValue};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{Document, InlineSpan, InlineStyle, LineType, RenderedLine};

impl Document {
    /// Convert markdown source at the default 80-column layout.
    ///
    /// # Errors
    /// Conversion itself cannot fail; the `Result` mirrors the fallible
    /// re-layout path callers share with [`Document::parse_with_layout`].
    pub fn parse(source: &str) -> Result<Self> {
        parse(source)
    }

    /// Convert markdown source, wrapping to `width` columns.
    ///
    /// # Errors
    /// See [`Document::parse`].
    pub fn parse_with_layout(source: &str, width: u16) -> Result<Self> {
        parse_with_layout(source, width)
    }
}

/// Convert markdown source at the default 80-column layout.
///
/// # Errors
/// See [`Document::parse`].
pub fn parse(source: &str) -> Result<Document> {
    parse_with_layout(source, 80)
}

/// Convert markdown source, wrapping to `width` columns.
///
/// # Errors
/// See [`Document::parse`].
pub fn parse_with_layout(source: &str, width: u16) -> Result<Document> {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let wrap_width = usize::from(width.max(1));
    let mut lines = Vec::new();
    for child in root.children() {
        render_block(child, &mut lines, wrap_width, 0);
    }
    while lines.last().is_some_and(|l| l.line_type() == LineType::Empty) {
        lines.pop();
    }

    Ok(Document::from_lines(source.to_string(), lines))
}

fn create_options() -> Options {
    let mut options = Options::default();

    // GFM extensions supported by the preview
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    options
}

fn render_block<'a>(
    node: &'a AstNode<'a>,
    lines: &mut Vec<RenderedLine>,
    wrap_width: usize,
    list_depth: usize,
) {
    match &node.data.borrow().value {
        NodeValue::Heading(heading) => {
            let spans = collect_inline_spans(node);
            let prefix = format!("{} ", "#".repeat(heading.level as usize));
            let continuation = " ".repeat(prefix.len());
            push_wrapped(
                lines,
                &spans,
                wrap_width,
                &prefix,
                &continuation,
                LineType::Heading(heading.level),
            );
            push_blank(lines);
        }

        NodeValue::Paragraph => {
            let spans = collect_inline_spans(node);
            push_wrapped(lines, &spans, wrap_width, "", "", LineType::Paragraph);
            push_blank(lines);
        }

        NodeValue::CodeBlock(code) => {
            for raw_line in code.literal.lines() {
                lines.push(RenderedLine::new(
                    format!("  {raw_line}"),
                    LineType::CodeBlock,
                ));
            }
            push_blank(lines);
        }

        NodeValue::HtmlBlock(html) => {
            for raw_line in html.literal.lines() {
                lines.push(RenderedLine::new(raw_line.to_string(), LineType::Paragraph));
            }
            push_blank(lines);
        }

        NodeValue::BlockQuote => {
            render_blockquote(node, lines, wrap_width, 1);
            push_blank(lines);
        }

        NodeValue::List(list) => {
            render_list(node, *list, lines, wrap_width, list_depth);
            if list_depth == 0 {
                push_blank(lines);
            }
        }

        NodeValue::ThematicBreak => {
            lines.push(RenderedLine::new(
                "─".repeat(wrap_width.min(80)),
                LineType::HorizontalRule,
            ));
            push_blank(lines);
        }

        NodeValue::FrontMatter(_) => {}

        _ => {
            for child in node.children() {
                render_block(child, lines, wrap_width, list_depth);
            }
        }
    }
}

fn render_blockquote<'a>(
    node: &'a AstNode<'a>,
    lines: &mut Vec<RenderedLine>,
    wrap_width: usize,
    quote_depth: usize,
) {
    let prefix = "│ ".repeat(quote_depth);

    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Paragraph => {
                let spans = collect_inline_spans(child);
                push_wrapped(lines, &spans, wrap_width, &prefix, &prefix, LineType::BlockQuote);
            }
            NodeValue::BlockQuote => {
                render_blockquote(child, lines, wrap_width, quote_depth + 1);
            }
            _ => {
                let text = extract_text(child);
                for raw_line in text.lines() {
                    let spans = vec![InlineSpan::new(raw_line, InlineStyle::default())];
                    push_wrapped(lines, &spans, wrap_width, &prefix, &prefix, LineType::BlockQuote);
                }
            }
        }
    }
}

fn render_list<'a>(
    node: &'a AstNode<'a>,
    list: NodeList,
    lines: &mut Vec<RenderedLine>,
    wrap_width: usize,
    depth: usize,
) {
    let mut index = list.start;
    for item in node.children() {
        let marker = item_marker(item, list, index);
        render_item(item, lines, wrap_width, depth, &marker);
        index += 1;
    }
}

fn item_marker<'a>(item: &'a AstNode<'a>, list: NodeList, index: usize) -> String {
    if let NodeValue::TaskItem(symbol) = &item.data.borrow().value {
        return if symbol.is_some() { "✓ " } else { "□ " }.to_string();
    }
    match list.list_type {
        ListType::Bullet => "• ".to_string(),
        ListType::Ordered => {
            let delimiter = match list.delimiter {
                ListDelimType::Period => '.',
                ListDelimType::Paren => ')',
            };
            format!("{index}{delimiter} ")
        }
    }
}

fn render_item<'a>(
    item: &'a AstNode<'a>,
    lines: &mut Vec<RenderedLine>,
    wrap_width: usize,
    depth: usize,
    marker: &str,
) {
    let indent = "  ".repeat(depth);
    let first_prefix = format!("{indent}{marker}");
    let next_prefix = format!("{indent}{}", " ".repeat(UnicodeWidthStr::width(marker)));
    let mut rendered_any = false;

    for child in item.children() {
        match &child.data.borrow().value {
            NodeValue::Paragraph => {
                let spans = collect_inline_spans(child);
                let prefix = if rendered_any { &next_prefix } else { &first_prefix };
                push_wrapped(
                    lines,
                    &spans,
                    wrap_width,
                    prefix,
                    &next_prefix,
                    LineType::ListItem(depth),
                );
                rendered_any = true;
            }
            NodeValue::List(sublist) => {
                if !rendered_any {
                    lines.push(RenderedLine::new(
                        first_prefix.trim_end().to_string(),
                        LineType::ListItem(depth),
                    ));
                    rendered_any = true;
                }
                render_list(child, *sublist, lines, wrap_width, depth + 1);
            }
            NodeValue::CodeBlock(code) => {
                for raw_line in code.literal.lines() {
                    lines.push(RenderedLine::new(
                        format!("{next_prefix}{raw_line}"),
                        LineType::CodeBlock,
                    ));
                }
                rendered_any = true;
            }
            _ => {
                let text = extract_text(child);
                for raw_line in text.lines() {
                    let spans = vec![InlineSpan::new(raw_line, InlineStyle::default())];
                    let prefix = if rendered_any { &next_prefix } else { &first_prefix };
                    push_wrapped(
                        lines,
                        &spans,
                        wrap_width,
                        prefix,
                        &next_prefix,
                        LineType::ListItem(depth),
                    );
                    rendered_any = true;
                }
            }
        }
    }

    if !rendered_any {
        lines.push(RenderedLine::new(
            first_prefix.trim_end().to_string(),
            LineType::ListItem(depth),
        ));
    }
}

/// Append a blank separator line unless the last line is already blank.
fn push_blank(lines: &mut Vec<RenderedLine>) {
    if lines.last().is_some_and(|l| l.line_type() == LineType::Empty) {
        return;
    }
    if lines.is_empty() {
        return;
    }
    lines.push(RenderedLine::new(String::new(), LineType::Empty));
}

fn push_wrapped(
    lines: &mut Vec<RenderedLine>,
    spans: &[InlineSpan],
    wrap_width: usize,
    first_prefix: &str,
    cont_prefix: &str,
    line_type: LineType,
) {
    for line_spans in wrap_spans(spans, wrap_width, first_prefix, cont_prefix) {
        let content = spans_to_string(&line_spans);
        lines.push(RenderedLine::with_spans(content, line_type, line_spans));
    }
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

/// Greedy word wrap of styled spans to `width` display columns.
///
/// The first line carries `first_prefix`, continuation lines `cont_prefix`.
/// Words wider than a whole line are hard-broken at character boundaries so
/// a pathological token cannot produce an overwide line.
fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    first_prefix: &str,
    cont_prefix: &str,
) -> Vec<Vec<InlineSpan>> {
    let width = width.max(1);
    let words = split_words(spans);

    let mut out: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current = line_start(first_prefix);
    let mut current_width = UnicodeWidthStr::width(first_prefix);
    let mut has_content = false;

    for (word, style) in words {
        let word_width = UnicodeWidthStr::width(word.as_str());
        let space = usize::from(has_content);

        if has_content && current_width + space + word_width > width {
            out.push(std::mem::replace(&mut current, line_start(cont_prefix)));
            current_width = UnicodeWidthStr::width(cont_prefix);
            has_content = false;
        }

        if has_content {
            push_span(&mut current, " ", style);
            current_width += 1;
        }

        if current_width + word_width > width {
            // Overlong word: hard-break at character boundaries.
            let mut chunk = String::new();
            let mut chunk_width = 0usize;
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + chunk_width + ch_width > width && !chunk.is_empty() {
                    push_span(&mut current, &chunk, style);
                    out.push(std::mem::replace(&mut current, line_start(cont_prefix)));
                    current_width = UnicodeWidthStr::width(cont_prefix);
                    chunk.clear();
                    chunk_width = 0;
                }
                chunk.push(ch);
                chunk_width += ch_width;
            }
            if !chunk.is_empty() {
                push_span(&mut current, &chunk, style);
                current_width += chunk_width;
            }
        } else {
            push_span(&mut current, &word, style);
            current_width += word_width;
        }
        has_content = true;
    }

    if has_content {
        out.push(current);
    } else if out.is_empty() && !first_prefix.trim().is_empty() {
        // An empty item still shows its marker.
        out.push(current);
    }
    out
}

fn line_start(prefix: &str) -> Vec<InlineSpan> {
    if prefix.is_empty() {
        Vec::new()
    } else {
        vec![InlineSpan::new(prefix, InlineStyle::default())]
    }
}

fn push_span(line: &mut Vec<InlineSpan>, text: &str, style: InlineStyle) {
    if let Some(last) = line.last_mut()
        && last.style() == style
    {
        *last = InlineSpan::new(format!("{}{}", last.text(), text), style);
        return;
    }
    line.push(InlineSpan::new(text, style));
}

/// Flatten spans into whitespace-separated words, preserving style.
fn split_words(spans: &[InlineSpan]) -> Vec<(String, InlineStyle)> {
    let mut words = Vec::new();
    for span in spans {
        for word in span.text().split_whitespace() {
            words.push((word.to_string(), span.style()));
        }
    }
    words
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_inline_recursive(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    match &node.data.borrow().value {
        // Nested blocks are rendered separately
        NodeValue::List(_) | NodeValue::Item(_) | NodeValue::TaskItem(_) => {}
        NodeValue::Text(text) => {
            spans.push(InlineSpan::new(text.clone(), style));
        }
        NodeValue::Code(code) => {
            let mut code_style = style;
            code_style.code = true;
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::Emph => {
            let mut next = style;
            next.emphasis = true;
            for child in node.children() {
                collect_inline_recursive(child, next, spans);
            }
        }
        NodeValue::Strong => {
            let mut next = style;
            next.strong = true;
            for child in node.children() {
                collect_inline_recursive(child, next, spans);
            }
        }
        NodeValue::Strikethrough => {
            let mut next = style;
            next.strikethrough = true;
            for child in node.children() {
                collect_inline_recursive(child, next, spans);
            }
        }
        NodeValue::Link(link) => {
            let mut next = style;
            next.link = true;
            let before = spans.len();
            for child in node.children() {
                collect_inline_recursive(child, next, spans);
            }
            if spans.len() == before {
                spans.push(InlineSpan::new(link.url.clone(), next));
            }
        }
        NodeValue::Image(_) => {
            let alt = extract_text(node);
            let mut next = style;
            next.emphasis = true;
            spans.push(InlineSpan::new(format!("[image: {alt}]"), next));
        }
        NodeValue::HtmlInline(html) => {
            spans.push(InlineSpan::new(html.clone(), style));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ", style));
        }
        _ => {
            for child in node.children() {
                collect_inline_recursive(child, style, spans);
            }
        }
    }
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(code) => text.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push('\n'),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_converts_to_heading_markup() {
        let doc = Document::parse("# привет").unwrap();
        let line = doc.line_at(0).unwrap();
        assert_eq!(line.line_type(), LineType::Heading(1));
        assert_eq!(line.content(), "# привет");
    }

    #[test]
    fn test_heading_levels() {
        let doc = Document::parse("### deep").unwrap();
        assert_eq!(doc.line_at(0).unwrap().line_type(), LineType::Heading(3));
        assert_eq!(doc.line_at(0).unwrap().content(), "### deep");
    }

    #[test]
    fn test_paragraph_with_inline_styles() {
        let doc = Document::parse("plain **bold** and *italic* and `code`").unwrap();
        let spans = doc.line_at(0).unwrap().spans().unwrap();
        assert!(spans.iter().any(|s| s.style().strong && s.text().contains("bold")));
        assert!(spans.iter().any(|s| s.style().emphasis && s.text().contains("italic")));
        assert!(spans.iter().any(|s| s.style().code && s.text().contains("code")));
    }

    #[test]
    fn test_strikethrough_span_is_marked() {
        let doc = Document::parse("keep ~~gone~~ keep").unwrap();
        let spans = doc.line_at(0).unwrap().spans().unwrap();
        assert!(
            spans
                .iter()
                .any(|s| s.style().strikethrough && s.text().contains("gone"))
        );
    }

    #[test]
    fn test_code_block_renders_verbatim() {
        let doc = Document::parse("```\nlet x = 1;\nlet y = 2;\n```").unwrap();
        let code_lines: Vec<_> = doc
            .lines()
            .iter()
            .filter(|l| l.line_type() == LineType::CodeBlock)
            .collect();
        assert_eq!(code_lines.len(), 2);
        assert_eq!(code_lines[0].content(), "  let x = 1;");
        assert_eq!(code_lines[1].content(), "  let y = 2;");
    }

    #[test]
    fn test_indented_code_block_renders_verbatim() {
        let doc = Document::parse("para\n\n    let x = 1;\n    let y = 2;").unwrap();
        let code_lines: Vec<_> = doc
            .lines()
            .iter()
            .filter(|l| l.line_type() == LineType::CodeBlock)
            .collect();
        assert_eq!(code_lines.len(), 2);
        assert_eq!(code_lines[0].content(), "  let x = 1;");
        assert_eq!(code_lines[1].content(), "  let y = 2;");
    }

    #[test]
    fn test_block_quote_gets_bar_prefix() {
        let doc = Document::parse("> quoted text").unwrap();
        let line = doc.line_at(0).unwrap();
        assert_eq!(line.line_type(), LineType::BlockQuote);
        assert!(line.content().starts_with("│ "));
    }

    #[test]
    fn test_bullet_list_markers() {
        let doc = Document::parse("- one\n- two").unwrap();
        assert_eq!(doc.line_at(0).unwrap().content(), "• one");
        assert_eq!(doc.line_at(1).unwrap().content(), "• two");
        assert_eq!(doc.line_at(0).unwrap().line_type(), LineType::ListItem(0));
    }

    #[test]
    fn test_ordered_list_numbers_from_start() {
        let doc = Document::parse("3. three\n4. four").unwrap();
        assert_eq!(doc.line_at(0).unwrap().content(), "3. three");
        assert_eq!(doc.line_at(1).unwrap().content(), "4. four");
    }

    #[test]
    fn test_task_list_markers() {
        let doc = Document::parse("- [x] done\n- [ ] open").unwrap();
        assert_eq!(doc.line_at(0).unwrap().content(), "✓ done");
        assert_eq!(doc.line_at(1).unwrap().content(), "□ open");
    }

    #[test]
    fn test_nested_list_indents() {
        let doc = Document::parse("- outer\n  - inner").unwrap();
        assert_eq!(doc.line_at(0).unwrap().content(), "• outer");
        assert_eq!(doc.line_at(1).unwrap().content(), "  • inner");
        assert_eq!(doc.line_at(1).unwrap().line_type(), LineType::ListItem(1));
    }

    #[test]
    fn test_thematic_break() {
        let doc = Document::parse_with_layout("---", 20).unwrap();
        let line = doc.line_at(0).unwrap();
        assert_eq!(line.line_type(), LineType::HorizontalRule);
        assert_eq!(line.content(), "─".repeat(20));
    }

    #[test]
    fn test_long_paragraph_wraps_to_width() {
        let md = "word ".repeat(40);
        let doc = Document::parse_with_layout(&md, 20).unwrap();
        assert!(doc.line_count() > 1);
        for line in doc.lines() {
            assert!(
                unicode_width::UnicodeWidthStr::width(line.content()) <= 20,
                "line exceeds width: {:?}",
                line.content()
            );
        }
    }

    #[test]
    fn test_wide_characters_wrap_by_display_width() {
        // CJK characters are two columns wide
        let md = "漢字 ".repeat(20);
        let doc = Document::parse_with_layout(&md, 10).unwrap();
        for line in doc.lines() {
            assert!(unicode_width::UnicodeWidthStr::width(line.content()) <= 10);
        }
    }

    #[test]
    fn test_overlong_word_is_hard_broken() {
        let md = "a".repeat(50);
        let doc = Document::parse_with_layout(&md, 10).unwrap();
        assert!(doc.line_count() >= 5);
        for line in doc.lines() {
            assert!(unicode_width::UnicodeWidthStr::width(line.content()) <= 10);
        }
    }

    #[test]
    fn test_link_text_is_marked() {
        let doc = Document::parse("see [the docs](https://example.com)").unwrap();
        let spans = doc.line_at(0).unwrap().spans().unwrap();
        assert!(spans.iter().any(|s| s.style().link && s.text().contains("docs")));
    }

    #[test]
    fn test_bare_url_autolinks() {
        let doc = Document::parse("visit https://example.com today").unwrap();
        let spans = doc.line_at(0).unwrap().spans().unwrap();
        assert!(spans.iter().any(|s| s.style().link));
    }

    #[test]
    fn test_empty_source_gives_empty_document() {
        let doc = Document::parse("").unwrap();
        assert_eq!(doc.line_count(), 0);
    }

    #[test]
    fn test_no_trailing_blank_lines() {
        let doc = Document::parse("# Title\n\nbody\n\n\n").unwrap();
        assert!(doc.lines().last().is_some_and(|l| l.line_type() != LineType::Empty));
    }

    #[test]
    fn test_source_is_retained() {
        let doc = Document::parse("# Title").unwrap();
        assert_eq!(doc.source(), "# Title");
    }

    #[test]
    fn test_blocks_are_separated_by_single_blank() {
        let doc = Document::parse("# Title\n\nfirst\n\nsecond").unwrap();
        let blank_runs = doc
            .lines()
            .windows(2)
            .filter(|w| {
                w[0].line_type() == LineType::Empty && w[1].line_type() == LineType::Empty
            })
            .count();
        assert_eq!(blank_runs, 0);
    }
}
