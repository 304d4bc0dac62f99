//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{
    ContentMode, DiagramSlot, DiagramStatus, Focus, LayoutMode, Model, TableInteraction,
    ToastLevel,
};
pub use update::{Message, refresh_preview, update};

use crate::tabular::Separator;

/// Owns the terminal and runs the event loop.
pub struct App {
    initial_text: String,
    content_mode: ContentMode,
    layout: LayoutMode,
    separator: Separator,
    debounce_ms: u64,
    ascii_diagrams: bool,
}

impl App {
    pub fn new(initial_text: String, content_mode: ContentMode) -> Self {
        Self {
            initial_text,
            content_mode,
            layout: LayoutMode::Split,
            separator: Separator::Comma,
            debounce_ms: crate::config::DEFAULT_DEBOUNCE_MS,
            ascii_diagrams: false,
        }
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub const fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Delay between the last edit and diagram re-rendering.
    #[must_use]
    pub const fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Draw diagrams with plain ASCII instead of box-drawing characters.
    #[must_use]
    pub const fn with_ascii_diagrams(mut self, ascii: bool) -> Self {
        self.ascii_diagrams = ascii;
        self
    }
}
