//! Sandboxed HTML preview.
//!
//! Projects an HTML buffer to plain text: no network fetches, no script
//! or style evaluation. Script, style and head subtrees are dropped
//! wholesale, remaining tags are stripped, and entities are decoded.

use once_cell::sync::Lazy;
use regex::Regex;

// One alternation per element; the regex crate has no backreferences, so
// the closing tag is spelled out for each.
static DROPPED_SUBTREES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<head\b[^>]*>.*?</head\s*>",
    )
    .expect("dropped subtree regex")
});

static COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex"));

// Tags that end a visual line when projected to text.
static BLOCK_BREAKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)</?(p|div|section|article|header|footer|main|nav|ul|ol|table|tr|blockquote|pre|h[1-6])\b[^>]*>|<(br|hr)\s*/?>|</li\s*>",
    )
    .expect("block break regex")
});

static LIST_ITEM_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<li\b[^>]*>").expect("list item regex"));

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex"));

/// Project HTML source to display lines.
///
/// Whitespace inside a line collapses the way a browser would collapse it;
/// consecutive blank lines collapse to one.
pub fn project(source: &str) -> Vec<String> {
    let text = to_text(source);
    if text.is_empty() {
        Vec::new()
    } else {
        text.lines().map(str::to_string).collect()
    }
}

/// The plain-text rendering of `source`.
pub fn to_text(source: &str) -> String {
    let without_subtrees = DROPPED_SUBTREES.replace_all(source, "");
    let without_comments = COMMENTS.replace_all(&without_subtrees, "");
    let with_breaks = BLOCK_BREAKS.replace_all(&without_comments, "\n");
    let with_bullets = LIST_ITEM_OPEN.replace_all(&with_breaks, "\n• ");
    let stripped = ANY_TAG.replace_all(&with_bullets, "");
    let decoded = html_escape::decode_html_entities(stripped.as_ref());

    let mut lines: Vec<String> = Vec::new();
    for raw in decoded.lines() {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if lines.last().is_some_and(String::is_empty) || lines.is_empty() {
                continue;
            }
            lines.push(String::new());
        } else {
            lines.push(collapsed);
        }
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_simple_tags() {
        assert_eq!(to_text("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn test_drops_script_content() {
        let html = "<p>before</p><script>alert('x');</script><p>after</p>";
        let text = to_text(html);
        assert!(text.contains("before"));
        assert!(text.contains("after"));
        assert!(!text.contains("alert"));
    }

    #[test]
    fn test_drops_style_and_head() {
        let html = "<head><title>T</title></head><style>body { color: red }</style><p>visible</p>";
        assert_eq!(to_text(html), "visible");
    }

    #[test]
    fn test_drops_comments() {
        assert_eq!(to_text("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn test_decodes_entities() {
        assert_eq!(to_text("<p>a &amp; b &lt;c&gt;</p>"), "a & b <c>");
    }

    #[test]
    fn test_block_tags_break_lines() {
        let lines = project("<h1>Title</h1><p>First</p><p>Second</p>");
        assert_eq!(lines, vec!["Title", "First", "Second"]);
    }

    #[test]
    fn test_list_items_get_bullets() {
        let lines = project("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(lines, vec!["• one", "• two"]);
    }

    #[test]
    fn test_collapses_blank_runs() {
        let lines = project("<p>a</p>\n\n\n\n<p>b</p>");
        assert!(lines.len() <= 3);
        assert_eq!(lines.first().map(String::as_str), Some("a"));
        assert_eq!(lines.last().map(String::as_str), Some("b"));
    }

    #[test]
    fn test_empty_input() {
        assert!(project("").is_empty());
        assert!(project("<script>only()</script>").is_empty());
    }

    #[test]
    fn test_drops_every_subtree_kind_in_one_document() {
        let html = "<head><meta charset=\"utf-8\"></head>\
                    <style>.a { color: red }</style>\
                    <p>kept</p>\
                    <script src=\"x.js\">run()</script>";
        assert_eq!(to_text(html), "kept");
    }

    #[test]
    fn test_case_insensitive_script_removal() {
        let text = to_text("<SCRIPT>evil()</SCRIPT><p>ok</p>");
        assert!(!text.contains("evil"));
        assert!(text.contains("ok"));
    }
}
