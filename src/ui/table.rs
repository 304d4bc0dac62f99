//! The delimited-data preview surface.
//!
//! A bordered grid with a cell cursor. Enter edits the cell under the
//! cursor, `c` inserts a column after the cursor column, `n` appends a
//! row; commits serialize straight back into the editor buffer.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Focus, Model, TableInteraction};
use crate::tabular::TableData;

const MAX_COLUMN_WIDTH: usize = 24;

pub fn render_table(model: &Model, frame: &mut Frame, area: Rect) {
    if model.buffer.text().trim().is_empty() {
        super::preview::render_placeholder(
            frame,
            area,
            "No data to display. Type or paste delimited text in the editor.",
        );
        return;
    }

    match &model.table {
        Err(messages) => render_error_panel(frame, area, messages),
        Ok(table) if table.is_empty() => {
            super::preview::render_placeholder(
                frame,
                area,
                "No data to display. Type or paste delimited text in the editor.",
            );
        }
        Ok(table) => render_grid(model, table, frame, area),
    }
}

fn render_error_panel(frame: &mut Frame, area: Rect, messages: &[String]) {
    let mut content = vec![Line::styled(
        "Failed to parse input",
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )];
    for message in messages {
        content.push(Line::styled(
            message.clone(),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(content), area);
}

fn render_grid(model: &Model, table: &TableData, frame: &mut Frame, area: Rect) {
    let widths = column_widths(table);
    let focused = model.focus == Focus::Preview;
    let (cursor_row, cursor_col) = model.table_cursor;

    let prompt = prompt_line(model);
    let grid_height = area.height.saturating_sub(u16::from(prompt.is_some())) as usize;

    let mut content: Vec<Line> = Vec::new();
    content.push(border_line(&widths, '┌', '┬', '┐'));
    content.push(header_line(table, &widths));
    content.push(border_line(&widths, '├', '┼', '┤'));

    // Keep the cursor row on screen inside the remaining grid rows.
    let data_rows_visible = grid_height.saturating_sub(4).max(1);
    let first_row = cursor_row.saturating_sub(data_rows_visible.saturating_sub(1));
    for (row_idx, row) in table
        .rows()
        .iter()
        .enumerate()
        .skip(first_row)
        .take(data_rows_visible)
    {
        content.push(data_line(
            row,
            &widths,
            focused.then_some((cursor_row, cursor_col)),
            row_idx,
        ));
    }
    content.push(border_line(&widths, '└', '┴', '┘'));

    frame.render_widget(Paragraph::new(content), area);

    if let Some(prompt) = prompt {
        let prompt_area = Rect {
            y: area.y + area.height.saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(prompt, prompt_area);
    }
}

fn prompt_line(model: &Model) -> Option<Paragraph<'static>> {
    let text = match &model.interaction {
        TableInteraction::Viewing => return None,
        TableInteraction::EditingCell { input } => format!("Edit cell: {input}▏"),
        TableInteraction::InsertingColumn { input } => format!("New column name: {input}▏"),
    };
    Some(
        Paragraph::new(text).style(Style::default().bg(Color::Blue).fg(Color::White)),
    )
}

fn column_widths(table: &TableData) -> Vec<usize> {
    let mut widths: Vec<usize> = table
        .headers()
        .iter()
        .map(|header| UnicodeWidthStr::width(header.as_str()).max(3))
        .collect();
    for row in table.rows() {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
            }
        }
    }
    for width in &mut widths {
        *width = (*width).min(MAX_COLUMN_WIDTH);
    }
    widths
}

fn border_line(widths: &[usize], left: char, middle: char, right: char) -> Line<'static> {
    let mut out = String::new();
    out.push(left);
    for (idx, width) in widths.iter().enumerate() {
        out.push_str(&"─".repeat(width + 2));
        if idx + 1 < widths.len() {
            out.push(middle);
        }
    }
    out.push(right);
    Line::styled(out, Style::default().fg(Color::DarkGray))
}

fn header_line(table: &TableData, widths: &[usize]) -> Line<'static> {
    let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];
    for (idx, width) in widths.iter().enumerate() {
        let header = table.headers().get(idx).map_or("", String::as_str);
        spans.push(Span::styled(
            format!(" {} ", pad_cell(header, *width)),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

fn data_line(
    row: &[String],
    widths: &[usize],
    cursor: Option<(usize, usize)>,
    row_idx: usize,
) -> Line<'static> {
    let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];
    for (col_idx, width) in widths.iter().enumerate() {
        let cell = row.get(col_idx).map_or("", String::as_str);
        let under_cursor = cursor == Some((row_idx, col_idx));
        let style = if under_cursor {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        spans.push(Span::styled(
            format!(" {} ", pad_cell(cell, *width)),
            style,
        ));
        spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

fn pad_cell(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::parse;

    #[test]
    fn test_column_widths_fit_content() {
        let table = parse("name,age\nAlexandria,3", crate::tabular::Separator::Comma).unwrap();
        let widths = column_widths(&table);
        assert_eq!(widths[0], "Alexandria".len());
        assert_eq!(widths[1], 3);
    }

    #[test]
    fn test_column_widths_are_capped() {
        let long = "x".repeat(100);
        let table = parse(&format!("h\n{long}"), crate::tabular::Separator::Comma).unwrap();
        assert_eq!(column_widths(&table)[0], MAX_COLUMN_WIDTH);
    }

    #[test]
    fn test_pad_cell_pads_and_truncates() {
        assert_eq!(pad_cell("ab", 4), "ab  ");
        assert_eq!(pad_cell("abcdef", 4), "abcd");
    }
}
