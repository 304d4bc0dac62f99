//! Markdown parsing with comrak.
//!
//! Produces display-ready lines. Fenced blocks are dispatched by info
//! string: `mermaid` reserves a diagram slot, any other language tag goes
//! through syntect, untagged fences render as plain code. Parsing never
//! fails; unknown constructs degrade to their literal text.

use std::collections::HashMap;

use comrak::nodes::{AstNode, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{DiagramBlock, Document, InlineSpan, InlineStyle, LineType, RenderedLine};

const CODE_RIGHT_PADDING: usize = 3;

impl Document {
    /// Parse markdown at the default layout width.
    pub fn parse(source: &str) -> Self {
        parse_with_layout(source, 80, &HashMap::new())
    }

    pub fn parse_with_layout(source: &str, width: u16) -> Self {
        parse_with_layout(source, width, &HashMap::new())
    }
}

/// Comrak options used everywhere: GFM extensions on, nothing exotic.
pub fn create_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options
}

/// Parse markdown into a document laid out for `width` columns.
///
/// `diagram_heights` maps slot index to the number of rows reserved for its
/// rendered art; slots without an entry reserve a single row. Re-parsing
/// with updated heights is how diagram results get room on screen.
pub fn parse_with_layout(
    source: &str,
    width: u16,
    diagram_heights: &HashMap<usize, usize>,
) -> Document {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let mut renderer = Renderer {
        lines: Vec::new(),
        diagrams: Vec::new(),
        wrap_width: usize::from(width.max(1)),
        diagram_heights,
    };
    renderer.walk(root, 0, None);

    Document::from_parts(source.to_string(), renderer.lines, renderer.diagrams)
}

struct Renderer<'h> {
    lines: Vec<RenderedLine>,
    diagrams: Vec<DiagramBlock>,
    wrap_width: usize,
    diagram_heights: &'h HashMap<usize, usize>,
}

impl Renderer<'_> {
    fn walk<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, list_marker: Option<&str>) {
        match &node.data.borrow().value {
            NodeValue::Document => {
                for child in node.children() {
                    self.walk(child, depth, list_marker);
                }
            }

            NodeValue::Heading(heading) => {
                let text = extract_text(node);
                self.ensure_trailing_empty(1);
                let prefix = "#".repeat(usize::from(heading.level));
                self.lines.push(RenderedLine::new(
                    format!("{prefix} {text}"),
                    LineType::Heading(heading.level),
                ));
                self.push_empty();
            }

            NodeValue::Paragraph => {
                let images = collect_paragraph_images(node);
                if images.is_empty() {
                    let spans = collect_inline_spans(node);
                    self.push_wrapped(&spans, LineType::Paragraph, "", "");
                } else {
                    for (alt, src) in images {
                        self.push_image_placeholder(&alt, &src);
                    }
                }
                self.push_empty();
            }

            NodeValue::CodeBlock(code_block) => {
                self.push_fenced_block(&code_block.info, &code_block.literal);
            }

            NodeValue::List(list) => {
                let list_depth = depth + 1;
                let delimiter = match list.delimiter {
                    comrak::nodes::ListDelimType::Paren => ')',
                    comrak::nodes::ListDelimType::Period => '.',
                };
                let count = node.children().count();
                let number_width = (list.start + count.saturating_sub(1)).to_string().len();

                for (index, child) in node.children().enumerate() {
                    let marker = match list.list_type {
                        comrak::nodes::ListType::Bullet => "• ".to_string(),
                        comrak::nodes::ListType::Ordered => {
                            format!("{:>number_width$}{delimiter} ", list.start + index)
                        }
                    };
                    self.walk(child, list_depth, Some(&marker));
                }
            }

            NodeValue::Item(_) | NodeValue::TaskItem(_) => {
                self.render_list_item(node, depth, list_marker);
            }

            NodeValue::BlockQuote => {
                self.render_blockquote(node, 1);
                self.push_empty();
            }

            NodeValue::ThematicBreak => {
                self.lines.push(RenderedLine::new(
                    "─".repeat(self.wrap_width.min(40)),
                    LineType::HorizontalRule,
                ));
                self.push_empty();
            }

            NodeValue::Table(_) => {
                for line in render_table(node, self.wrap_width) {
                    self.lines.push(RenderedLine::new(line, LineType::Table));
                }
                self.push_empty();
            }

            NodeValue::FootnoteDefinition(def) => {
                let label = format!("[^{}]: ", def.name);
                let continuation = " ".repeat(label.len());
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Paragraph, &label, &continuation);
                self.push_empty();
            }

            NodeValue::Image(image) => {
                let alt = extract_text(node);
                self.push_image_placeholder(&alt, &image.url);
            }

            _ => {
                for child in node.children() {
                    self.walk(child, depth, list_marker);
                }
            }
        }
    }

    /// Route a fenced block: diagram slot, highlighted code, or plain code.
    fn push_fenced_block(&mut self, info: &str, literal: &str) {
        let language = info.split_whitespace().next().filter(|s| !s.is_empty());
        if language == Some("mermaid") {
            self.push_diagram_slot(literal);
            return;
        }

        let content_width = literal
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .min(self.wrap_width.saturating_sub(4).max(1));
        let frame_inner = content_width + 2 + CODE_RIGHT_PADDING;
        let label = format!(" {} ", language.unwrap_or("code"));
        let visible_label: String = label.chars().take(frame_inner).collect();
        self.lines.push(RenderedLine::new(
            format!(
                "┌{visible_label}{}┐",
                "─".repeat(frame_inner.saturating_sub(visible_label.chars().count()))
            ),
            LineType::CodeBlock,
        ));

        for spans in crate::highlight::highlight_code(language, literal) {
            let trimmed = truncate_spans(&spans, content_width);
            let trimmed_len: usize = trimmed.iter().map(|s| s.text().chars().count()).sum();
            let padding =
                " ".repeat(content_width.saturating_sub(trimmed_len) + CODE_RIGHT_PADDING);

            let mut line_spans = vec![InlineSpan::new("│ ".to_string(), InlineStyle::default())];
            line_spans.extend(trimmed);
            line_spans.push(InlineSpan::new(
                format!("{padding} │"),
                InlineStyle::default(),
            ));
            let content = spans_to_string(&line_spans);
            self.lines
                .push(RenderedLine::with_spans(content, LineType::CodeBlock, line_spans));
        }

        self.lines.push(RenderedLine::new(
            format!("└{}┘", "─".repeat(frame_inner)),
            LineType::CodeBlock,
        ));
        self.push_empty();
    }

    /// Reserve rows for a diagram; the art is spliced in at draw time.
    fn push_diagram_slot(&mut self, literal: &str) {
        let slot = self.diagrams.len();
        let source = literal.trim_end_matches('\n').to_string();
        let height = self
            .diagram_heights
            .get(&slot)
            .copied()
            .unwrap_or(1)
            .max(1);
        let start = self.lines.len();
        for _ in 0..height {
            self.lines
                .push(RenderedLine::new(String::new(), LineType::Diagram));
        }
        self.diagrams.push(DiagramBlock {
            slot,
            source,
            line_range: start..self.lines.len(),
        });
        self.push_empty();
    }

    fn push_image_placeholder(&mut self, alt: &str, src: &str) {
        let shown = if alt.is_empty() { src } else { alt };
        self.lines.push(RenderedLine::new(
            format!("[Image: {shown}]"),
            LineType::Image,
        ));
    }

    fn render_list_item<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        depth: usize,
        list_marker: Option<&str>,
    ) {
        let indent = "  ".repeat(depth.saturating_sub(1));
        let marker = find_task_marker(node).map_or_else(
            || list_marker.unwrap_or("- ").to_string(),
            |task| format!("{task} "),
        );
        let prefix_first = format!("{indent}{marker}");
        let prefix_next = format!("{indent}{}", " ".repeat(marker.chars().count()));
        let mut rendered_any = false;

        for child in node.children() {
            match &child.data.borrow().value {
                NodeValue::Paragraph | NodeValue::TaskItem(_) => {
                    let spans = collect_inline_spans(child);
                    let prefix = if rendered_any {
                        &prefix_next
                    } else {
                        &prefix_first
                    };
                    self.push_wrapped(&spans, LineType::ListItem(depth), prefix, &prefix_next);
                    rendered_any = true;
                }
                _ => self.walk(child, depth, None),
            }
        }

        if !rendered_any {
            let spans = collect_inline_spans(node);
            self.push_wrapped(
                &spans,
                LineType::ListItem(depth),
                &prefix_first,
                &prefix_next,
            );
        }
    }

    fn render_blockquote<'a>(&mut self, node: &'a AstNode<'a>, quote_depth: usize) {
        let prefix = {
            let mut p = String::from("  ");
            for _ in 0..quote_depth {
                p.push_str("│ ");
            }
            p
        };

        for child in node.children() {
            match &child.data.borrow().value {
                NodeValue::Paragraph => {
                    let spans = collect_inline_spans(child);
                    self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                }
                NodeValue::BlockQuote => {
                    self.render_blockquote(child, quote_depth + 1);
                }
                _ => {
                    let text = extract_text(child);
                    for raw_line in text.lines() {
                        let spans =
                            vec![InlineSpan::new(raw_line.to_string(), InlineStyle::default())];
                        self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                    }
                }
            }
        }
    }

    fn push_wrapped(
        &mut self,
        spans: &[InlineSpan],
        line_type: LineType,
        prefix_first: &str,
        prefix_next: &str,
    ) {
        for line_spans in wrap_spans(spans, self.wrap_width, prefix_first, prefix_next) {
            let content = spans_to_string(&line_spans);
            self.lines
                .push(RenderedLine::with_spans(content, line_type, line_spans));
        }
    }

    fn push_empty(&mut self) {
        self.lines
            .push(RenderedLine::new(String::new(), LineType::Empty));
    }

    fn ensure_trailing_empty(&mut self, count: usize) {
        let existing = self
            .lines
            .iter()
            .rev()
            .take_while(|line| matches!(line.line_type(), LineType::Empty))
            .count();
        for _ in existing..count {
            self.push_empty();
        }
    }
}

fn render_table<'a>(table_node: &'a AstNode<'a>, wrap_width: usize) -> Vec<String> {
    let (alignments, mut rows, has_header) = collect_table_rows(table_node);
    if rows.is_empty() {
        return Vec::new();
    }

    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if num_cols == 0 {
        return Vec::new();
    }
    for row in &mut rows {
        row.resize(num_cols, String::new());
    }

    let mut col_widths = vec![1_usize; num_cols];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            col_widths[idx] = col_widths[idx].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    // Row width is 1 + sum(col_width + 3); shrink the widest column until
    // the table fits.
    let max_table_width = wrap_width.max(4);
    while 1 + col_widths.iter().sum::<usize>() + (3 * num_cols) > max_table_width {
        let Some((widest_idx, _)) = col_widths.iter().enumerate().max_by_key(|(_, w)| *w) else {
            break;
        };
        if col_widths[widest_idx] <= 1 {
            break;
        }
        col_widths[widest_idx] -= 1;
    }

    let mut lines = vec![table_border(&col_widths, '┌', '┬', '┐')];
    for (idx, row) in rows.iter().enumerate() {
        lines.push(table_row(row, &col_widths, &alignments));
        if has_header && idx == 0 {
            lines.push(table_border(&col_widths, '├', '┼', '┤'));
        }
    }
    lines.push(table_border(&col_widths, '└', '┴', '┘'));
    lines
}

fn collect_table_rows<'a>(
    table_node: &'a AstNode<'a>,
) -> (Vec<TableAlignment>, Vec<Vec<String>>, bool) {
    let alignments = match &table_node.data.borrow().value {
        NodeValue::Table(table) => table.alignments.clone(),
        _ => Vec::new(),
    };

    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        let NodeValue::TableRow(is_header) = row_node.data.borrow().value else {
            continue;
        };
        has_header |= is_header;

        let mut cells = Vec::new();
        for cell_node in row_node.children() {
            if !matches!(cell_node.data.borrow().value, NodeValue::TableCell) {
                continue;
            }
            let cell = extract_text(cell_node)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            cells.push(cell);
        }
        rows.push(cells);
    }

    (alignments, rows, has_header)
}

fn table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let mut out = String::new();
    out.push(left);
    for (idx, width) in widths.iter().enumerate() {
        out.push_str(&"─".repeat(width + 2));
        if idx + 1 < widths.len() {
            out.push(middle);
        }
    }
    out.push(right);
    out
}

fn table_row(cells: &[String], widths: &[usize], alignments: &[TableAlignment]) -> String {
    let mut out = String::new();
    out.push('│');
    for (idx, width) in widths.iter().enumerate() {
        let content = truncate_to_width(cells.get(idx).map_or("", String::as_str), *width);
        let padding = width.saturating_sub(UnicodeWidthStr::width(content.as_str()));

        out.push(' ');
        match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
            TableAlignment::Right => {
                out.push_str(&" ".repeat(padding));
                out.push_str(&content);
            }
            TableAlignment::Center => {
                let left_pad = padding / 2;
                out.push_str(&" ".repeat(left_pad));
                out.push_str(&content);
                out.push_str(&" ".repeat(padding - left_pad));
            }
            TableAlignment::Left | TableAlignment::None => {
                out.push_str(&content);
                out.push_str(&" ".repeat(padding));
            }
        }
        out.push_str(" │");
    }
    out
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(c) => {
            text.push('`');
            text.push_str(&c.literal);
            text.push('`');
        }
        NodeValue::FootnoteReference(reference) => {
            text.push_str(&format!("[^{}]", reference.name));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push('\n'),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_inline_spans_recursive(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) => {}
        NodeValue::Text(t) => spans.push(InlineSpan::new(t.clone(), style)),
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                emphasis: false,
                strong: false,
                strikethrough: false,
                ..style
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::Emph => {
            let next = InlineStyle {
                emphasis: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strong => {
            let next = InlineStyle {
                strong: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strikethrough => {
            let next = InlineStyle {
                strikethrough: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Link(_) => {
            let next = InlineStyle {
                link: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), style));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
        }
        _ => {
            for child in node.children() {
                collect_inline_spans_recursive(child, style, spans);
            }
        }
    }
}

fn find_task_marker<'a>(node: &'a AstNode<'a>) -> Option<&'static str> {
    // The list item itself carries the TaskItem value.
    if let NodeValue::TaskItem(symbol) = &node.data.borrow().value {
        return Some(if symbol.is_some() { "✓" } else { "□" });
    }
    for child in node.children() {
        if let Some(found) = find_task_marker(child) {
            return Some(found);
        }
    }
    None
}

fn collect_paragraph_images<'a>(node: &'a AstNode<'a>) -> Vec<(String, String)> {
    let mut images = Vec::new();
    collect_paragraph_images_recursive(node, &mut images);
    images
}

fn collect_paragraph_images_recursive<'a>(
    node: &'a AstNode<'a>,
    images: &mut Vec<(String, String)>,
) {
    if let NodeValue::Image(image) = &node.data.borrow().value {
        images.push((extract_text(node), image.url.clone()));
        return;
    }
    for child in node.children() {
        collect_paragraph_images_recursive(child, images);
    }
}

/// Word-wrap styled spans to `width`, applying prefixes per line.
fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let mut tokens: Vec<InlineSpan> = Vec::new();
    for span in spans {
        tokens.extend(split_inline_tokens(span));
    }

    let start_line = |prefix: &str| -> (Vec<InlineSpan>, usize) {
        if prefix.is_empty() {
            (Vec::new(), 0)
        } else {
            (
                vec![InlineSpan::new(prefix.to_string(), InlineStyle::default())],
                prefix.chars().count(),
            )
        }
    };

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let (mut current, mut current_len) = start_line(prefix_first);
    let mut has_word = false;

    for token in tokens {
        let token_len = token.text().chars().count();
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            lines.push(std::mem::take(&mut current));
            (current, current_len) = start_line(prefix_next);
            has_word = false;
        }
        if token_is_ws && !has_word {
            // Drop leading whitespace at wrapped line starts.
            continue;
        }

        current_len += token_len;
        has_word = has_word || !token_is_ws;
        current.push(token);
    }

    if current.is_empty() && !prefix_first.is_empty() {
        current.push(InlineSpan::new(
            prefix_first.to_string(),
            InlineStyle::default(),
        ));
    }
    lines.push(current);
    lines
}

/// Split a span into alternating word and whitespace tokens.
fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        match ws_state {
            Some(state) if state == is_ws => buf.push(ch),
            Some(_) => {
                out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
                buf.push(ch);
                ws_state = Some(is_ws);
            }
            None => {
                buf.push(ch);
                ws_state = Some(is_ws);
            }
        }
    }
    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

fn truncate_spans(spans: &[InlineSpan], max_len: usize) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut remaining = max_len;
    for span in spans {
        if remaining == 0 {
            break;
        }
        let taken: String = span.text().chars().take(remaining).collect();
        let count = taken.chars().count();
        if count > 0 {
            out.push(InlineSpan::new(taken, span.style()));
            remaining -= count;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_source() {
        let doc = Document::parse("");
        assert_eq!(doc.line_count(), 0);
    }

    #[test]
    fn test_parse_paragraph() {
        let doc = Document::parse("Hello world");
        assert!(doc
            .visible_lines(0, 10)
            .iter()
            .any(|l| l.content().contains("Hello world")));
    }

    #[test]
    fn test_parse_heading_renders_prefix() {
        let doc = Document::parse("# Title");
        let lines = doc.visible_lines(0, 10);
        assert!(lines
            .iter()
            .any(|l| l.content() == "# Title" && *l.line_type() == LineType::Heading(1)));
    }

    #[test]
    fn test_mermaid_fence_becomes_diagram_slot() {
        let doc = Document::parse("```mermaid\nflowchart TD\n  A --> B\n```");
        assert_eq!(doc.diagrams().len(), 1);
        let block = &doc.diagrams()[0];
        assert_eq!(block.slot, 0);
        assert_eq!(block.source, "flowchart TD\n  A --> B");
        assert!(!block.source.ends_with('\n'));
    }

    #[test]
    fn test_mermaid_slots_numbered_in_order() {
        let doc = Document::parse("```mermaid\ngraph TD\nA\n```\n\ntext\n\n```mermaid\ngraph LR\nB\n```");
        assert_eq!(doc.diagrams().len(), 2);
        assert_eq!(doc.diagrams()[0].slot, 0);
        assert_eq!(doc.diagrams()[1].slot, 1);
        assert!(doc.diagrams()[0].source.contains('A'));
        assert!(doc.diagrams()[1].source.contains('B'));
    }

    #[test]
    fn test_diagram_heights_reserve_rows() {
        let heights = HashMap::from([(0usize, 5usize)]);
        let doc = parse_with_layout("```mermaid\ngraph TD\nA\n```", 80, &heights);
        let block = &doc.diagrams()[0];
        assert_eq!(block.line_range.len(), 5);
        for idx in block.line_range.clone() {
            assert_eq!(*doc.line_at(idx).unwrap().line_type(), LineType::Diagram);
        }
    }

    #[test]
    fn test_default_diagram_height_is_one_row() {
        let doc = Document::parse("```mermaid\ngraph TD\nA\n```");
        assert_eq!(doc.diagrams()[0].line_range.len(), 1);
    }

    #[test]
    fn test_tagged_fence_is_framed_code() {
        let doc = Document::parse("```rust\nfn main() {}\n```");
        let lines = doc.visible_lines(0, 10);
        let code: Vec<_> = lines
            .iter()
            .filter(|l| *l.line_type() == LineType::CodeBlock)
            .collect();
        assert_eq!(code.len(), 3);
        assert!(code[0].content().starts_with("┌ rust "));
        assert!(code[1].content().contains("fn main() {}"));
        assert!(code[2].content().starts_with('└'));
        assert!(doc.diagrams().is_empty());
    }

    #[test]
    fn test_untagged_fence_is_plain_code() {
        let doc = Document::parse("```\nraw text\n```");
        let lines = doc.visible_lines(0, 10);
        assert!(lines.iter().any(|l| l.content().starts_with("┌ code ")));
    }

    #[test]
    fn test_paragraph_before_mermaid_still_renders() {
        let doc = Document::parse("A paragraph.\n\n```mermaid\nnot actually parsed here\n```");
        let lines = doc.visible_lines(0, 20);
        assert!(lines.iter().any(|l| l.content().contains("A paragraph.")));
        assert_eq!(doc.diagrams().len(), 1);
    }

    #[test]
    fn test_gfm_table_fits_width() {
        let md = "| Very long heading | Value |\n|---|---:|\n| some really long content | 12345 |";
        let doc = Document::parse_with_layout(md, 24);
        for line in doc
            .visible_lines(0, 20)
            .iter()
            .filter(|l| *l.line_type() == LineType::Table)
        {
            assert!(UnicodeWidthStr::width(line.content()) <= 24);
        }
    }

    #[test]
    fn test_gfm_table_has_borders_and_header_rule() {
        let doc = Document::parse("| A | B |\n|---|---|\n| 1 | 2 |");
        let table: Vec<_> = doc
            .visible_lines(0, 10)
            .into_iter()
            .filter(|l| *l.line_type() == LineType::Table)
            .map(|l| l.content().to_string())
            .collect();
        assert!(table[0].starts_with('┌'));
        assert!(table.iter().any(|l| l.starts_with('├')));
        assert!(table.last().unwrap().starts_with('└'));
    }

    #[test]
    fn test_paragraph_wraps_to_width() {
        let md = "This is a long paragraph that should wrap at the specified width.";
        let doc = Document::parse_with_layout(md, 20);
        let para: Vec<_> = doc
            .visible_lines(0, 100)
            .into_iter()
            .filter(|l| *l.line_type() == LineType::Paragraph)
            .collect();
        assert!(para.len() > 1);
        for line in para {
            assert!(line.content().len() <= 20);
        }
    }

    #[test]
    fn test_blockquote_prefix() {
        let doc = Document::parse("> quoted text");
        assert!(doc
            .visible_lines(0, 10)
            .iter()
            .any(|l| l.content().starts_with("  │ ") && *l.line_type() == LineType::BlockQuote));
    }

    #[test]
    fn test_task_list_markers() {
        let doc = Document::parse("- [x] Done\n- [ ] Todo");
        let lines = doc.visible_lines(0, 10);
        assert!(lines.iter().any(|l| l.content().contains('✓')));
        assert!(lines.iter().any(|l| l.content().contains('□')));
    }

    #[test]
    fn test_ordered_list_numbers() {
        let doc = Document::parse("1. first\n2. second");
        let lines = doc.visible_lines(0, 10);
        assert!(lines.iter().any(|l| l.content().starts_with("1. first")));
        assert!(lines.iter().any(|l| l.content().starts_with("2. second")));
    }

    #[test]
    fn test_image_renders_placeholder() {
        let doc = Document::parse("![Alt text](image.png)");
        assert!(doc
            .visible_lines(0, 10)
            .iter()
            .any(|l| l.content() == "[Image: Alt text]" && *l.line_type() == LineType::Image));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let md = "# T\n\npara *em* **strong**\n\n```mermaid\ngraph TD\nA --> B\n```\n\n- a\n- b";
        let first = Document::parse(md);
        let second = Document::parse(md);
        assert_eq!(first.line_count(), second.line_count());
        for idx in 0..first.line_count() {
            assert_eq!(first.line_at(idx), second.line_at(idx));
        }
        assert_eq!(first.diagrams(), second.diagrams());
    }

    #[test]
    fn test_strikethrough_sets_style() {
        let doc = Document::parse("~~gone~~");
        let styled = doc.visible_lines(0, 5).iter().any(|l| {
            l.spans()
                .is_some_and(|s| s.iter().any(|sp| sp.style().strikethrough))
        });
        assert!(styled);
    }

    #[test]
    fn test_pathological_input_does_not_panic() {
        let _ = Document::parse("```mermaid");
        let _ = Document::parse("| a |\n|");
        let _ = Document::parse(&"> ".repeat(200));
        let _ = Document::parse("[l](");
    }
}
