//! Markdown and html preview surfaces.
//!
//! Markdown lines come from the rendered document; rows typed
//! `LineType::Diagram` are spliced with the owning slot's current state
//! (placeholder, art, or error panel).

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{DiagramStatus, Model};
use crate::document::LineType;

use super::style::{style_for_inline, style_for_line_type};

pub fn render_markdown(model: &Model, frame: &mut Frame, area: Rect) {
    if model.buffer.is_empty() {
        render_placeholder(frame, area, "Type markdown in the editor to preview it here.");
        return;
    }

    let offset = model.preview_viewport.offset();
    let visible = model
        .document
        .visible_lines(offset, model.preview_viewport.height() as usize);

    let mut content: Vec<Line> = Vec::new();
    for (row, line) in visible.iter().enumerate() {
        let line_idx = offset + row;
        if *line.line_type() == LineType::Diagram {
            content.push(diagram_line(model, line_idx));
            continue;
        }

        let line_style = style_for_line_type(line.line_type());
        if let Some(spans) = line.spans() {
            let styled = spans
                .iter()
                .map(|span| {
                    Span::styled(
                        span.text().to_string(),
                        style_for_inline(line_style, span.style()),
                    )
                })
                .collect::<Vec<_>>();
            content.push(Line::from(styled));
        } else {
            content.push(Line::styled(line.content().to_string(), line_style));
        }
    }

    frame.render_widget(Paragraph::new(content), area);
}

/// The display row for one line of a diagram region.
fn diagram_line(model: &Model, line_idx: usize) -> Line<'static> {
    let Some(block) = model
        .document
        .diagrams()
        .iter()
        .find(|block| block.line_range.contains(&line_idx))
    else {
        return Line::raw("");
    };
    let row = line_idx - block.line_range.start;

    let Some(slot) = model.diagram_slots.get(&block.slot) else {
        return Line::raw("");
    };
    match &slot.status {
        DiagramStatus::Pending => {
            if row == 0 {
                Line::styled(
                    "… rendering diagram",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )
            } else {
                Line::raw("")
            }
        }
        DiagramStatus::Rendered(art) => {
            Line::raw(art.get(row).cloned().unwrap_or_default())
        }
        // Error panel: one header row, then the raw source verbatim.
        DiagramStatus::Failed(message) => {
            if row == 0 {
                Line::styled(
                    format!("Diagram syntax error: {message}"),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            } else {
                let source_line = slot
                    .source
                    .lines()
                    .nth(row - 1)
                    .unwrap_or_default()
                    .to_string();
                Line::styled(source_line, Style::default().fg(Color::DarkGray))
            }
        }
    }
}

pub fn render_html(model: &Model, frame: &mut Frame, area: Rect) {
    if model.html_lines.is_empty() {
        render_placeholder(frame, area, "Type HTML in the editor to preview its text here.");
        return;
    }
    let range = model.preview_viewport.visible_range();
    let content: Vec<Line> = model
        .html_lines
        .iter()
        .skip(range.start)
        .take(range.len())
        .map(|line| Line::raw(line.clone()))
        .collect();
    frame.render_widget(Paragraph::new(content), area);
}

pub(super) fn render_placeholder(frame: &mut Frame, area: Rect, text: &str) {
    let placeholder = Paragraph::new(text.to_string()).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    );
    frame.render_widget(placeholder, area);
}
