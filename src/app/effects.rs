use std::io::{Write, stdout};

use base64::Engine;

use crate::app::{Message, Model, ToastLevel};
use crate::export;

use super::model::ContentMode;

pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
    if matches!(msg, Message::CopyAsHtml) {
        copy_as_html(model);
    }
}

fn copy_as_html(model: &mut Model) {
    let source = model.buffer.text();
    let html = match model.content_mode {
        ContentMode::Markdown => export::markdown_to_html(&source),
        ContentMode::Csv => export::csv_to_html(&source, model.separator),
        // Already HTML; copy the buffer verbatim.
        ContentMode::Html => source,
    };
    match copy_to_clipboard(&html) {
        Ok(()) => model.show_toast(ToastLevel::Info, "HTML copied to clipboard"),
        Err(err) => model.show_toast(ToastLevel::Error, format!("Copy failed: {err}")),
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

#[cfg(test)]
mod tests {
    use super::osc52_sequence;

    #[test]
    fn test_osc52_sequence_encodes_text() {
        let seq = osc52_sequence("hi");
        assert_eq!(seq, "\x1b]52;c;aGk=\x07");
    }
}
