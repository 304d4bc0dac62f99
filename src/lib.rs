// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. tabular::TableData)
    clippy::module_name_repetitions
)]

//! # Markpane
//!
//! A split-pane terminal editor with live preview.
//!
//! The left pane is a plain-text editor; the right pane renders whatever
//! the buffer holds:
//! - Markdown, with syntax-highlighted code blocks and text diagrams
//!   rendered from `mermaid` fences
//! - Delimited data (CSV and friends) as an editable grid
//! - HTML as a sandboxed plain-text projection
//!
//! ## Architecture
//!
//! Markpane uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Markdown parsing and rendering
//! - [`tabular`]: Delimited-text parse and serialize
//! - [`html`]: HTML text projection
//! - [`diagram`]: Text diagram rendering and the async render worker
//! - [`editor`]: The text buffer and cursor
//! - [`export`]: HTML export for the clipboard
//! - [`ui`]: Terminal UI components
//! - [`highlight`]: Syntax highlighting

pub mod app;
pub mod config;
pub mod diagram;
pub mod document;
pub mod editor;
pub mod export;
pub mod highlight;
pub mod html;
pub mod samples;
pub mod tabular;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::Document;
    pub use crate::tabular::{Separator, TableData};
    pub use crate::ui::viewport::Viewport;
}
