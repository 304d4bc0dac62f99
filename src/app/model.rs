use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::document::Document;
use crate::editor::EditorBuffer;
use crate::tabular::{Separator, TableData};
use crate::ui::viewport::Viewport;

/// What the buffer holds, and therefore which preview surface is active.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    Markdown,
    Csv,
    Html,
}

impl ContentMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Markdown => Self::Csv,
            Self::Csv => Self::Html,
            Self::Html => Self::Markdown,
        }
    }
}

/// Pane arrangement.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Edit,
    Split,
    Preview,
}

impl LayoutMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Split => "split",
            Self::Preview => "preview",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Edit => Self::Split,
            Self::Split => Self::Preview,
            Self::Preview => Self::Edit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Interaction state of the table preview surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableInteraction {
    Viewing,
    /// Editing the cell under the cursor; `input` is the draft value.
    EditingCell { input: String },
    /// Naming a column to insert after the cursor column.
    InsertingColumn { input: String },
}

/// State of one diagram slot.
///
/// `generation` increments whenever the slot's source changes; results
/// carrying an older generation are discarded on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSlot {
    pub generation: u64,
    pub source: String,
    pub status: DiagramStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramStatus {
    Pending,
    Rendered(Vec<String>),
    Failed(String),
}

impl DiagramSlot {
    /// Rows this slot needs in the rendered document.
    pub fn layout_height(&self) -> usize {
        match &self.status {
            DiagramStatus::Pending => 1,
            DiagramStatus::Rendered(art) => art.len().max(1),
            // Error header plus the raw source.
            DiagramStatus::Failed(_) => 1 + self.source.lines().count(),
        }
    }
}

/// The complete application state.
pub struct Model {
    /// The edited text, single source of truth for every preview.
    pub buffer: EditorBuffer,
    pub content_mode: ContentMode,
    pub layout: LayoutMode,
    pub separator: Separator,
    pub focus: Focus,
    /// Rendered markdown (markdown mode only).
    pub document: Document,
    /// Parse result for csv mode; `Err` carries the messages for the
    /// error panel.
    pub table: Result<TableData, Vec<String>>,
    pub interaction: TableInteraction,
    /// Cell cursor as (row, column); row indexes data rows.
    pub table_cursor: (usize, usize),
    /// Plain-text projection for html mode.
    pub html_lines: Vec<String>,
    /// Diagram slots keyed by index within the document.
    pub diagram_slots: HashMap<usize, DiagramSlot>,
    diagram_generation: u64,
    pub preview_viewport: Viewport,
    /// First visible line of the editor pane.
    pub editor_scroll: usize,
    pub terminal_size: (u16, u16),
    /// Set by edits; cleared when the preview is refreshed.
    pub preview_dirty: bool,
    pub ascii_diagrams: bool,
    toast: Option<Toast>,
    pub should_quit: bool,
}

impl Model {
    pub fn new(
        text: &str,
        content_mode: ContentMode,
        layout: LayoutMode,
        separator: Separator,
        terminal_size: (u16, u16),
    ) -> Self {
        let mut model = Self {
            buffer: EditorBuffer::from_text(text),
            content_mode,
            layout,
            separator,
            focus: Focus::Editor,
            document: Document::empty(),
            table: Ok(TableData::default()),
            interaction: TableInteraction::Viewing,
            table_cursor: (0, 0),
            html_lines: Vec::new(),
            diagram_slots: HashMap::new(),
            diagram_generation: 0,
            preview_viewport: Viewport::new(
                terminal_size.0,
                terminal_size.1.saturating_sub(1),
                0,
            ),
            editor_scroll: 0,
            terminal_size,
            preview_dirty: true,
            ascii_diagrams: false,
            toast: None,
            should_quit: false,
        };
        if layout == LayoutMode::Preview {
            model.focus = Focus::Preview;
        }
        model
    }

    pub const fn next_diagram_generation(&mut self) -> u64 {
        self.diagram_generation += 1;
        self.diagram_generation
    }

    /// Width available to the preview pane under the current layout.
    pub fn preview_width(&self) -> u16 {
        crate::ui::preview_content_width(self.terminal_size.0, self.layout)
    }

    /// The cursor column doubles as the insertion point for new columns.
    pub fn cursor_column(&self) -> usize {
        self.table_cursor.1
    }

    pub fn clamp_table_cursor(&mut self) {
        let Ok(table) = &self.table else {
            self.table_cursor = (0, 0);
            return;
        };
        let max_row = table.row_count().saturating_sub(1);
        let max_col = table.column_count().saturating_sub(1);
        self.table_cursor.0 = self.table_cursor.0.min(max_row);
        self.table_cursor.1 = self.table_cursor.1.min(max_col);
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    /// Drop an expired toast; true if one was dropped.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("content_mode", &self.content_mode)
            .field("layout", &self.layout)
            .field("separator", &self.separator)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

// Default exists so the event loop can `std::mem::take` the model around
// the pure update call.
impl Default for Model {
    fn default() -> Self {
        Self::new(
            "",
            ContentMode::Markdown,
            LayoutMode::Split,
            Separator::Comma,
            (80, 24),
        )
    }
}
