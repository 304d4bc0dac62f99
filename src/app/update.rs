//! Pure state transitions.
//!
//! [`update`] consumes a model and a message and returns the next model.
//! Side effects (clipboard, worker submission) happen elsewhere; the only
//! thing computed here that escapes is the set of diagram render requests
//! produced by [`refresh_preview`].

use std::collections::HashMap;

use crate::diagram::{RenderRequest, RenderResult};
use crate::document::parse_with_layout;
use crate::editor::Direction;
use crate::tabular;

use super::model::{
    ContentMode, DiagramSlot, DiagramStatus, Focus, LayoutMode, Model, TableInteraction,
    ToastLevel,
};

/// Every event the application reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    CycleLayout,
    CycleContentMode,
    CycleSeparator,
    ToggleFocus,
    ClearBuffer,
    LoadSample,
    /// Clipboard write happens in the effects pass.
    CopyAsHtml,
    InsertChar(char),
    InsertNewline,
    Backspace,
    DeleteForward,
    MoveCursor(Direction),
    MoveHome,
    MoveEnd,
    MoveWordLeft,
    MoveWordRight,
    ScrollPreview(isize),
    PagePreview(isize),
    PreviewTop,
    PreviewBottom,
    TableMove(Direction),
    TableBeginEdit,
    TableBeginInsertColumn,
    TableAddRow,
    TableInput(char),
    TableBackspace,
    TableCommit,
    TableCancel,
    DiagramResult(RenderResult),
    Resize(u16, u16),
}

/// Apply a message to the model.
pub fn update(mut model: Model, message: Message) -> Model {
    match message {
        Message::Quit => model.should_quit = true,

        Message::CycleLayout => {
            model.layout = model.layout.next();
            model.focus = match model.layout {
                LayoutMode::Edit => Focus::Editor,
                LayoutMode::Preview => Focus::Preview,
                LayoutMode::Split => model.focus,
            };
            // Pane widths changed, rewrap.
            model.preview_dirty = true;
        }

        Message::CycleContentMode => {
            model.content_mode = model.content_mode.next();
            model.interaction = TableInteraction::Viewing;
            model.table_cursor = (0, 0);
            model.diagram_slots.clear();
            model.preview_dirty = true;
        }

        Message::CycleSeparator => {
            model.separator = model.separator.next();
            model.show_toast(
                ToastLevel::Info,
                format!("Separator: {}", model.separator.label()),
            );
            if model.content_mode == ContentMode::Csv {
                model.interaction = TableInteraction::Viewing;
                model.preview_dirty = true;
            }
        }

        Message::ToggleFocus => {
            if model.layout == LayoutMode::Split {
                model.focus = match model.focus {
                    Focus::Editor => Focus::Preview,
                    Focus::Preview => Focus::Editor,
                };
            }
        }

        Message::ClearBuffer => {
            model.buffer.set_text("");
            model.interaction = TableInteraction::Viewing;
            model.table_cursor = (0, 0);
            model.diagram_slots.clear();
            model.preview_dirty = true;
            model.show_toast(ToastLevel::Info, "Buffer cleared");
        }

        Message::LoadSample => {
            model
                .buffer
                .set_text(crate::samples::for_mode(model.content_mode));
            model.interaction = TableInteraction::Viewing;
            model.table_cursor = (0, 0);
            model.preview_dirty = true;
            model.show_toast(
                ToastLevel::Info,
                format!("Loaded {} sample", model.content_mode.label()),
            );
        }

        // Applied in the effects pass; nothing changes here.
        Message::CopyAsHtml => {}

        Message::InsertChar(ch) => {
            model.buffer.insert_char(ch);
            model.preview_dirty = true;
        }
        Message::InsertNewline => {
            model.buffer.split_line();
            model.preview_dirty = true;
        }
        Message::Backspace => {
            model.buffer.delete_back();
            model.preview_dirty = true;
        }
        Message::DeleteForward => {
            model.buffer.delete_forward();
            model.preview_dirty = true;
        }
        Message::MoveCursor(direction) => model.buffer.move_cursor(direction),
        Message::MoveHome => model.buffer.move_home(),
        Message::MoveEnd => model.buffer.move_end(),
        Message::MoveWordLeft => model.buffer.move_word_left(),
        Message::MoveWordRight => model.buffer.move_word_right(),

        Message::ScrollPreview(delta) => scroll_preview(&mut model, delta),
        Message::PagePreview(pages) => {
            let step = isize::try_from(model.preview_viewport.height()).unwrap_or(isize::MAX);
            scroll_preview(&mut model, pages.saturating_mul(step));
        }
        Message::PreviewTop => model.preview_viewport.go_to_top(),
        Message::PreviewBottom => model.preview_viewport.go_to_bottom(),

        Message::TableMove(direction) => {
            if model.interaction == TableInteraction::Viewing {
                move_table_cursor(&mut model, direction);
            }
        }
        Message::TableBeginEdit => begin_cell_edit(&mut model),
        Message::TableBeginInsertColumn => {
            if model.interaction == TableInteraction::Viewing && model.table.is_ok() {
                model.interaction = TableInteraction::InsertingColumn {
                    input: String::new(),
                };
            }
        }
        Message::TableAddRow => add_table_row(&mut model),
        Message::TableInput(ch) => match &mut model.interaction {
            TableInteraction::EditingCell { input }
            | TableInteraction::InsertingColumn { input } => input.push(ch),
            TableInteraction::Viewing => {}
        },
        Message::TableBackspace => match &mut model.interaction {
            TableInteraction::EditingCell { input }
            | TableInteraction::InsertingColumn { input } => {
                input.pop();
            }
            TableInteraction::Viewing => {}
        },
        Message::TableCommit => commit_table_interaction(&mut model),
        Message::TableCancel => model.interaction = TableInteraction::Viewing,

        Message::DiagramResult(result) => apply_diagram_result(&mut model, &result),

        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model
                .preview_viewport
                .resize(width, height.saturating_sub(1));
            model.preview_dirty = true;
        }
    }
    model
}

fn scroll_preview(model: &mut Model, delta: isize) {
    if delta < 0 {
        model.preview_viewport.scroll_up(delta.unsigned_abs());
    } else {
        model.preview_viewport.scroll_down(delta.unsigned_abs());
    }
}

fn move_table_cursor(model: &mut Model, direction: Direction) {
    let Ok(table) = &model.table else { return };
    if table.is_empty() {
        return;
    }
    let (row, col) = model.table_cursor;
    model.table_cursor = match direction {
        Direction::Up => (row.saturating_sub(1), col),
        Direction::Down => ((row + 1).min(table.row_count().saturating_sub(1)), col),
        Direction::Left => (row, col.saturating_sub(1)),
        Direction::Right => (row, (col + 1).min(table.column_count().saturating_sub(1))),
    };
}

fn begin_cell_edit(model: &mut Model) {
    if model.interaction != TableInteraction::Viewing {
        return;
    }
    let Ok(table) = &model.table else { return };
    let (row, col) = model.table_cursor;
    let Some(current) = table.cell(row, col) else {
        return;
    };
    model.interaction = TableInteraction::EditingCell {
        input: current.to_string(),
    };
}

fn add_table_row(model: &mut Model) {
    let Ok(table) = &mut model.table else { return };
    if table.headers().is_empty() {
        model.show_toast(ToastLevel::Warning, "No columns to add a row to");
        return;
    }
    table.push_empty_row();
    model.table_cursor.0 = table.row_count().saturating_sub(1);
    write_table_back(model);
}

fn commit_table_interaction(model: &mut Model) {
    match std::mem::replace(&mut model.interaction, TableInteraction::Viewing) {
        TableInteraction::Viewing => {}
        TableInteraction::EditingCell { input } => {
            let (row, col) = model.table_cursor;
            if let Ok(table) = &mut model.table {
                table.set_cell(row, col, input);
                write_table_back(model);
            }
        }
        TableInteraction::InsertingColumn { input } => {
            let after = model.cursor_column();
            if let Ok(table) = &mut model.table {
                if table.insert_column(after, &input) {
                    model.table_cursor.1 = after + 1;
                    write_table_back(model);
                } else {
                    model.show_toast(
                        ToastLevel::Warning,
                        "Column name must be non-empty and unique",
                    );
                }
            }
        }
    }
}

/// Serialize the table back into the buffer. The next preview refresh
/// re-parses it, so the surface always shows what the buffer holds.
fn write_table_back(model: &mut Model) {
    let Ok(table) = &model.table else { return };
    match tabular::serialize(table, model.separator) {
        Ok(text) => {
            model.buffer.set_text(&text);
            model.preview_dirty = true;
        }
        Err(err) => {
            tracing::warn!("table write-back failed: {err}");
            model.show_toast(ToastLevel::Error, format!("Write-back failed: {err}"));
        }
    }
}

fn apply_diagram_result(model: &mut Model, result: &RenderResult) {
    let Some(slot) = model.diagram_slots.get_mut(&result.slot) else {
        tracing::debug!(slot = result.slot, "result for removed diagram slot");
        return;
    };
    if slot.generation != result.generation {
        tracing::debug!(
            slot = result.slot,
            got = result.generation,
            want = slot.generation,
            "stale diagram result"
        );
        return;
    }
    slot.status = match &result.outcome {
        Ok(art) => DiagramStatus::Rendered(art.clone()),
        Err(message) => DiagramStatus::Failed(message.clone()),
    };
    if model.content_mode == ContentMode::Markdown {
        reflow_markdown(model);
    }
}

/// Rebuild the active preview surface from the buffer.
///
/// Returns render requests for diagram slots whose source changed; the
/// caller debounces and forwards them to the render worker.
pub fn refresh_preview(model: &mut Model) -> Vec<RenderRequest> {
    model.preview_dirty = false;
    match model.content_mode {
        ContentMode::Markdown => refresh_markdown(model),
        ContentMode::Csv => {
            refresh_table(model);
            Vec::new()
        }
        ContentMode::Html => {
            model.html_lines = crate::html::project(&model.buffer.text());
            model
                .preview_viewport
                .set_total_lines(model.html_lines.len());
            Vec::new()
        }
    }
}

fn refresh_markdown(model: &mut Model) -> Vec<RenderRequest> {
    let width = model.preview_width();
    let probe = parse_with_layout(&model.buffer.text(), width, &HashMap::new());

    let mut requests = Vec::new();
    for block in probe.diagrams() {
        let unchanged = model
            .diagram_slots
            .get(&block.slot)
            .is_some_and(|slot| slot.source == block.source);
        if unchanged {
            continue;
        }
        let generation = model.next_diagram_generation();
        model.diagram_slots.insert(
            block.slot,
            DiagramSlot {
                generation,
                source: block.source.clone(),
                status: DiagramStatus::Pending,
            },
        );
        requests.push(RenderRequest {
            slot: block.slot,
            generation,
            source: block.source.clone(),
        });
    }

    // Slots past the end of the document no longer exist.
    let block_count = probe.diagrams().len();
    model.diagram_slots.retain(|slot, _| *slot < block_count);

    reflow_markdown(model);
    requests
}

/// Re-parse markdown with each slot's current display height.
fn reflow_markdown(model: &mut Model) {
    let heights: HashMap<usize, usize> = model
        .diagram_slots
        .iter()
        .map(|(slot, state)| (*slot, state.layout_height()))
        .collect();
    model.document = parse_with_layout(&model.buffer.text(), model.preview_width(), &heights);
    model
        .preview_viewport
        .set_total_lines(model.document.line_count());
}

fn refresh_table(model: &mut Model) {
    model.table = tabular::parse(&model.buffer.text(), model.separator)
        .map_err(|err| err.messages());
    model.clamp_table_cursor();
    let total = match &model.table {
        // Borders, header row and header rule.
        Ok(table) => table.row_count() + 4,
        Err(messages) => messages.len() + 1,
    };
    model.preview_viewport.set_total_lines(total);
}
