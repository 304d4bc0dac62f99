use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::app::{App, Message, Model};
use crate::editor::Direction;

use super::model::{ContentMode, Focus, LayoutMode, TableInteraction};

impl App {
    pub(super) fn handle_event(&self, event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                handle_key(key.code, key.modifiers, model)
            }
            Event::Resize(width, height) => Some(Message::Resize(*width, *height)),
            _ => None,
        }
    }
}

fn handle_key(code: KeyCode, modifiers: KeyModifiers, model: &Model) -> Option<Message> {
    // Global chords work everywhere except mid table prompt, where Esc
    // must stay available for cancel.
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('q') => return Some(Message::Quit),
            KeyCode::Char('k') => return Some(Message::ClearBuffer),
            KeyCode::Char('g') => return Some(Message::LoadSample),
            KeyCode::Char('y') => return Some(Message::CopyAsHtml),
            _ => {}
        }
    }
    match code {
        KeyCode::F(2) => return Some(Message::CycleLayout),
        KeyCode::F(3) => return Some(Message::CycleContentMode),
        KeyCode::F(4) => return Some(Message::CycleSeparator),
        KeyCode::Tab if model.layout == LayoutMode::Split => {
            if model.interaction == TableInteraction::Viewing {
                return Some(Message::ToggleFocus);
            }
        }
        _ => {}
    }

    match model.focus {
        Focus::Editor => editor_key(code, modifiers),
        Focus::Preview => preview_key(code, model),
    }
}

fn editor_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Message> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Left => Some(Message::MoveWordLeft),
            KeyCode::Right => Some(Message::MoveWordRight),
            _ => None,
        };
    }
    match code {
        KeyCode::Char(ch) => Some(Message::InsertChar(ch)),
        KeyCode::Enter => Some(Message::InsertNewline),
        KeyCode::Backspace => Some(Message::Backspace),
        KeyCode::Delete => Some(Message::DeleteForward),
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
        KeyCode::Home => Some(Message::MoveHome),
        KeyCode::End => Some(Message::MoveEnd),
        _ => None,
    }
}

fn preview_key(code: KeyCode, model: &Model) -> Option<Message> {
    if model.content_mode == ContentMode::Csv {
        return table_key(code, model);
    }
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Message::ScrollPreview(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Message::ScrollPreview(1)),
        KeyCode::PageUp => Some(Message::PagePreview(-1)),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Message::PagePreview(1)),
        KeyCode::Home | KeyCode::Char('g') => Some(Message::PreviewTop),
        KeyCode::End | KeyCode::Char('G') => Some(Message::PreviewBottom),
        _ => None,
    }
}

fn table_key(code: KeyCode, model: &Model) -> Option<Message> {
    match &model.interaction {
        TableInteraction::Viewing => match code {
            KeyCode::Up => Some(Message::TableMove(Direction::Up)),
            KeyCode::Down => Some(Message::TableMove(Direction::Down)),
            KeyCode::Left => Some(Message::TableMove(Direction::Left)),
            KeyCode::Right => Some(Message::TableMove(Direction::Right)),
            KeyCode::Enter => Some(Message::TableBeginEdit),
            KeyCode::Char('c') => Some(Message::TableBeginInsertColumn),
            KeyCode::Char('n') => Some(Message::TableAddRow),
            _ => None,
        },
        TableInteraction::EditingCell { .. } | TableInteraction::InsertingColumn { .. } => {
            match code {
                KeyCode::Enter => Some(Message::TableCommit),
                KeyCode::Esc => Some(Message::TableCancel),
                KeyCode::Backspace => Some(Message::TableBackspace),
                KeyCode::Char(ch) => Some(Message::TableInput(ch)),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::Separator;

    fn model_with(layout: LayoutMode, mode: ContentMode) -> Model {
        Model::new("", mode, layout, Separator::Comma, (80, 24))
    }

    #[test]
    fn test_ctrl_q_quits_from_anywhere() {
        let model = model_with(LayoutMode::Split, ContentMode::Markdown);
        assert_eq!(
            handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL, &model),
            Some(Message::Quit)
        );
    }

    #[test]
    fn test_plain_q_is_an_edit_keystroke() {
        let model = model_with(LayoutMode::Split, ContentMode::Markdown);
        assert_eq!(
            handle_key(KeyCode::Char('q'), KeyModifiers::NONE, &model),
            Some(Message::InsertChar('q'))
        );
    }

    #[test]
    fn test_tab_toggles_focus_only_in_split() {
        let split = model_with(LayoutMode::Split, ContentMode::Markdown);
        assert_eq!(
            handle_key(KeyCode::Tab, KeyModifiers::NONE, &split),
            Some(Message::ToggleFocus)
        );
        let edit = model_with(LayoutMode::Edit, ContentMode::Markdown);
        assert_ne!(
            handle_key(KeyCode::Tab, KeyModifiers::NONE, &edit),
            Some(Message::ToggleFocus)
        );
    }

    #[test]
    fn test_function_keys_cycle_modes() {
        let model = model_with(LayoutMode::Split, ContentMode::Markdown);
        assert_eq!(
            handle_key(KeyCode::F(2), KeyModifiers::NONE, &model),
            Some(Message::CycleLayout)
        );
        assert_eq!(
            handle_key(KeyCode::F(3), KeyModifiers::NONE, &model),
            Some(Message::CycleContentMode)
        );
        assert_eq!(
            handle_key(KeyCode::F(4), KeyModifiers::NONE, &model),
            Some(Message::CycleSeparator)
        );
    }

    #[test]
    fn test_preview_focus_scrolls() {
        let mut model = model_with(LayoutMode::Split, ContentMode::Markdown);
        model.focus = Focus::Preview;
        assert_eq!(
            handle_key(KeyCode::Down, KeyModifiers::NONE, &model),
            Some(Message::ScrollPreview(1))
        );
        assert_eq!(
            handle_key(KeyCode::PageDown, KeyModifiers::NONE, &model),
            Some(Message::PagePreview(1))
        );
    }

    #[test]
    fn test_table_viewing_keys() {
        let mut model = model_with(LayoutMode::Split, ContentMode::Csv);
        model.focus = Focus::Preview;
        assert_eq!(
            handle_key(KeyCode::Enter, KeyModifiers::NONE, &model),
            Some(Message::TableBeginEdit)
        );
        assert_eq!(
            handle_key(KeyCode::Char('c'), KeyModifiers::NONE, &model),
            Some(Message::TableBeginInsertColumn)
        );
        assert_eq!(
            handle_key(KeyCode::Char('n'), KeyModifiers::NONE, &model),
            Some(Message::TableAddRow)
        );
    }

    #[test]
    fn test_table_prompt_keys() {
        let mut model = model_with(LayoutMode::Split, ContentMode::Csv);
        model.focus = Focus::Preview;
        model.interaction = TableInteraction::EditingCell {
            input: String::new(),
        };
        assert_eq!(
            handle_key(KeyCode::Char('x'), KeyModifiers::NONE, &model),
            Some(Message::TableInput('x'))
        );
        assert_eq!(
            handle_key(KeyCode::Esc, KeyModifiers::NONE, &model),
            Some(Message::TableCancel)
        );
        assert_eq!(
            handle_key(KeyCode::Enter, KeyModifiers::NONE, &model),
            Some(Message::TableCommit)
        );
    }

    #[test]
    fn test_tab_stays_out_of_table_prompts() {
        let mut model = model_with(LayoutMode::Split, ContentMode::Csv);
        model.focus = Focus::Preview;
        model.interaction = TableInteraction::InsertingColumn {
            input: String::new(),
        };
        assert_eq!(handle_key(KeyCode::Tab, KeyModifiers::NONE, &model), None);
    }
}
