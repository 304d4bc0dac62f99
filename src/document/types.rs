//! Core document types.

use std::ops::Range;

/// A parsed and rendered markdown document.
///
/// Lines are display-ready; diagram blocks describe where asynchronous
/// diagram art (or its error panel) gets spliced in.
#[derive(Debug, Clone, Default)]
pub struct Document {
    source: String,
    lines: Vec<RenderedLine>,
    diagrams: Vec<DiagramBlock>,
}

impl Document {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Render each source line verbatim as a paragraph.
    pub fn from_plain_text(source: &str) -> Self {
        let lines = source
            .lines()
            .map(|line| RenderedLine::new(line.to_string(), LineType::Paragraph))
            .collect();
        Self {
            source: source.to_string(),
            lines,
            diagrams: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        source: String,
        lines: Vec<RenderedLine>,
        diagrams: Vec<DiagramBlock>,
    ) -> Self {
        Self {
            source,
            lines,
            diagrams,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lines from `offset` to `offset + count`, for the viewport.
    pub fn visible_lines(&self, offset: usize, count: usize) -> Vec<&RenderedLine> {
        self.lines.iter().skip(offset).take(count).collect()
    }

    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Diagram blocks in slot order.
    pub fn diagrams(&self) -> &[DiagramBlock] {
        &self.diagrams
    }
}

/// A fenced diagram block discovered during parsing.
///
/// `slot` is the block's index within the document and the key for render
/// scheduling; `line_range` is the reserved region in the rendered lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    pub slot: usize,
    /// Fence body with the trailing newline trimmed.
    pub source: String,
    pub line_range: Range<usize>,
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    line_type: LineType,
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Inline spans, if any were produced for this line.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
    pub fg: Option<InlineColor>,
    pub bg: Option<InlineColor>,
}

/// RGB color for inline styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Normal paragraph text
    Paragraph,
    /// Heading with level (1-6)
    Heading(u8),
    /// Code block line
    CodeBlock,
    /// Block quote line
    BlockQuote,
    /// List item with nesting level
    ListItem(usize),
    /// Table row
    Table,
    /// Horizontal rule
    HorizontalRule,
    /// Reserved diagram region
    Diagram,
    /// Image placeholder
    Image,
    /// Empty line
    Empty,
}
