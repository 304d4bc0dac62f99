use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{Focus, LayoutMode, Model};

use super::{EDITOR_GUTTER_GAP, PREVIEW_LEFT_PADDING, preview, status, table};

/// Columns available for preview content under a layout.
pub fn preview_content_width(total_width: u16, layout: LayoutMode) -> u16 {
    let pane = match layout {
        LayoutMode::Split => split_panes(Rect::new(0, 0, total_width, 1))[1].width,
        LayoutMode::Edit | LayoutMode::Preview => total_width,
    };
    pane.saturating_sub(PREVIEW_LEFT_PADDING + 1).max(1)
}

pub fn split_panes(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
}

/// Render the complete UI.
pub fn view(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let toast_active = model.active_toast().is_some();
    let footer_rows = 1 + u16::from(toast_active);

    let main_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(1 + u16::from(toast_active)),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    match model.layout {
        LayoutMode::Edit => render_editor(model, frame, main_area),
        LayoutMode::Preview => render_preview_pane(model, frame, main_area, false),
        LayoutMode::Split => {
            let panes = split_panes(main_area);
            render_editor(model, frame, panes[0]);
            render_preview_pane(model, frame, panes[1], true);
        }
    }

    if toast_active {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, status_area);
}

fn render_preview_pane(model: &Model, frame: &mut Frame, area: Rect, bordered: bool) {
    let inner = if bordered {
        let focused = model.focus == Focus::Preview;
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_style(if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    } else {
        area
    };
    let content = Rect {
        x: inner.x + PREVIEW_LEFT_PADDING,
        width: inner.width.saturating_sub(PREVIEW_LEFT_PADDING),
        ..inner
    };
    frame.render_widget(Clear, content);
    match model.content_mode {
        crate::app::ContentMode::Markdown => preview::render_markdown(model, frame, content),
        crate::app::ContentMode::Html => preview::render_html(model, frame, content),
        crate::app::ContentMode::Csv => table::render_table(model, frame, content),
    }
}

fn render_editor(model: &mut Model, frame: &mut Frame, area: Rect) {
    let visible_height = area.height as usize;
    model.editor_scroll = editor_scroll_start(
        model.editor_scroll,
        model.buffer.cursor().line,
        visible_height,
    );

    let buf = &model.buffer;
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines) as usize;
    let cursor = buf.cursor();
    let show_cursor = model.focus == Focus::Editor;

    let start = model.editor_scroll;
    let end = (start + visible_height).min(total_lines);

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!(
            "{:>gutter_width$}{}",
            line_idx + 1,
            " ".repeat(EDITOR_GUTTER_GAP)
        );
        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];

        if show_cursor && line_idx == cursor.line {
            spans.extend(cursor_line_spans(&line_text, cursor.col));
        } else {
            spans.push(Span::raw(line_text));
        }
        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

/// Keep the cursor line inside the window, scrolling only when it leaves.
fn editor_scroll_start(current: usize, cursor_line: usize, height: usize) -> usize {
    if height == 0 {
        return current;
    }
    if cursor_line < current {
        cursor_line
    } else if cursor_line >= current + height {
        cursor_line + 1 - height
    } else {
        current
    }
}

/// Split an editor line into before-cursor, cursor cell, and after-cursor
/// spans. `col` is a byte offset on a char boundary.
fn cursor_line_spans(line_text: &str, col: usize) -> Vec<Span<'static>> {
    let col = col.min(line_text.len());
    let before = &line_text[..col];
    let cursor_char = line_text[col..].chars().next().unwrap_or(' ');
    let after = &line_text[(col + cursor_char.len_utf8()).min(line_text.len())..];

    let mut spans = Vec::new();
    if !before.is_empty() {
        spans.push(Span::raw(before.to_string()));
    }
    spans.push(Span::styled(
        cursor_char.to_string(),
        Style::default().bg(Color::White).fg(Color::Black),
    ));
    if !after.is_empty() {
        spans.push(Span::raw(after.to_string()));
    }
    spans
}

pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else {
        6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_width_split_is_half_the_terminal() {
        let split = preview_content_width(100, LayoutMode::Split);
        let full = preview_content_width(100, LayoutMode::Preview);
        assert!(split < full);
        assert!(split >= 40);
    }

    #[test]
    fn test_preview_width_never_zero() {
        assert!(preview_content_width(1, LayoutMode::Split) >= 1);
        assert!(preview_content_width(0, LayoutMode::Preview) >= 1);
    }

    #[test]
    fn test_editor_scroll_follows_cursor_down() {
        assert_eq!(editor_scroll_start(0, 30, 24), 7);
    }

    #[test]
    fn test_editor_scroll_follows_cursor_up() {
        assert_eq!(editor_scroll_start(20, 5, 24), 5);
    }

    #[test]
    fn test_editor_scroll_stable_when_cursor_visible() {
        assert_eq!(editor_scroll_start(10, 20, 24), 10);
    }

    #[test]
    fn test_cursor_spans_cover_the_line() {
        let spans = cursor_line_spans("hello", 2);
        let text: String = spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_cursor_at_end_of_line_shows_a_cell() {
        let spans = cursor_line_spans("hi", 2);
        let text: String = spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(text, "hi ");
    }

    #[test]
    fn test_cursor_on_multibyte_char() {
        let spans = cursor_line_spans("a→b", 1);
        let text: String = spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(text, "a→b");
    }

    #[test]
    fn test_line_number_width_grows() {
        assert_eq!(line_number_width(5), 2);
        assert_eq!(line_number_width(500), 3);
        assert_eq!(line_number_width(5000), 4);
    }
}
