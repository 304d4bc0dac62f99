//! HTML export for the copy action.
//!
//! Each content mode has its own projection: markdown goes through comrak,
//! delimited data becomes an escaped `<table>`, and HTML buffers are copied
//! verbatim.

use crate::document::create_options;
use crate::tabular::{Separator, TableData};

/// Convert markdown to an HTML fragment with the same GFM extensions the
/// preview uses.
pub fn markdown_to_html(source: &str) -> String {
    comrak::markdown_to_html(source, &create_options())
}

/// Render the buffer's table as an HTML `<table>`.
///
/// Falls back to an empty table when the buffer has no parseable rows; cell
/// text is entity-escaped.
pub fn csv_to_html(source: &str, separator: Separator) -> String {
    let table = crate::tabular::parse(source, separator).unwrap_or_default();
    table_to_html(&table)
}

pub fn table_to_html(table: &TableData) -> String {
    let mut out = String::from("<table>\n");

    if !table.headers().is_empty() {
        out.push_str("  <thead>\n    <tr>");
        for header in table.headers() {
            out.push_str("<th>");
            out.push_str(&html_escape::encode_text(header));
            out.push_str("</th>");
        }
        out.push_str("</tr>\n  </thead>\n");
    }

    out.push_str("  <tbody>\n");
    for row in table.rows() {
        out.push_str("    <tr>");
        for cell in row {
            out.push_str("<td>");
            out.push_str(&html_escape::encode_text(cell));
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("  </tbody>\n</table>\n");
    out
}
