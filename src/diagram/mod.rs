//! Diagram rendering for mermaid-style source blocks.
//!
//! Supports a flowchart subset (`flowchart`/`graph` with TD/TB/LR direction,
//! rectangular/rounded/decision nodes, solid and plain edges with optional
//! labels) and a sequence subset (`sequenceDiagram` with solid and dashed
//! messages). Output is line-oriented text art suitable for splicing into a
//! rendered document.
//!
//! Rendering is synchronous here; [`worker`] wraps it in a background thread
//! for the interactive path.

pub mod layout;
pub mod parser;
pub mod render;
pub mod worker;

use thiserror::Error;

pub use worker::{DiagramWorker, RenderRequest, RenderResult};

/// Rendering options, passed explicitly to every render call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramConfig {
    /// Use ASCII-only output instead of unicode box drawing.
    pub ascii: bool,
}

/// Errors from diagram parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("empty diagram source")]
    Empty,
    #[error("unsupported diagram type '{0}'")]
    UnsupportedType(String),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// Render diagram source to text-art lines.
///
/// # Errors
/// Returns a `DiagramError` when the source is empty, names an unsupported
/// diagram type, or contains a statement the parser does not recognize.
pub fn render(source: &str, config: &DiagramConfig) -> Result<Vec<String>, DiagramError> {
    match parser::parse(source)? {
        parser::Diagram::Flowchart(flow) => Ok(render::render_flowchart(&flow, config)),
        parser::Diagram::Sequence(seq) => Ok(render::render_sequence(&seq, config)),
    }
}
