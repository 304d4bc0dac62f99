use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{ContentMode, Focus, Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let cursor = model.buffer.cursor();
    let focus = match model.focus {
        Focus::Editor => "editor",
        Focus::Preview => "preview",
    };
    let separator = if model.content_mode == ContentMode::Csv {
        format!("  sep:{}", model.separator.label())
    } else {
        String::new()
    };
    let keys = match (model.focus, model.content_mode) {
        (Focus::Preview, ContentMode::Csv) => "Enter:edit c:col n:row",
        (Focus::Preview, _) => "↑↓:scroll",
        (Focus::Editor, _) => "F2:layout F3:mode F4:sep",
    };

    let status = format!(
        " {} | {} | {}{}  Ln {}, Col {}  {}  ^Y:copy ^K:clear ^G:sample ^Q:quit",
        model.content_mode.label(),
        model.layout.label(),
        focus,
        separator,
        cursor.line + 1,
        cursor.col + 1,
        keys,
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
