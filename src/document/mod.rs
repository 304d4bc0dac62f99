//! Markdown document parsing and rendering.
//!
//! This module handles:
//! - Parsing markdown with comrak (GFM extensions)
//! - Routing `mermaid` fences to diagram slots
//! - Rendering to styled lines for display

mod parser;
mod types;

pub use parser::{create_options, parse_with_layout};
pub use types::{
    DiagramBlock, Document, InlineColor, InlineSpan, InlineStyle, LineType, RenderedLine,
};
