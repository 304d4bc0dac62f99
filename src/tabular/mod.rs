//! Delimited-text parsing and serialization.
//!
//! Wraps the csv crate with a header-aware record model. Parsing is
//! best-effort: malformed rows are skipped and their errors collected, and
//! only a parse that recovers zero records while seeing at least one error
//! is reported as a failure.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field separator used for both parsing and serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Comma,
    Semicolon,
    Tab,
    Pipe,
}

impl Separator {
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Semicolon => b';',
            Self::Tab => b'\t',
            Self::Pipe => b'|',
        }
    }

    /// Human-readable name for the status bar.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Tab => "tab",
            Self::Pipe => "pipe",
        }
    }

    /// The next separator in cycling order.
    pub const fn next(self) -> Self {
        match self {
            Self::Comma => Self::Semicolon,
            Self::Semicolon => Self::Tab,
            Self::Tab => Self::Pipe,
            Self::Pipe => Self::Comma,
        }
    }
}

/// Errors from the tabular adapter.
#[derive(Debug, Error)]
pub enum TabularError {
    /// No records could be recovered and at least one row failed to parse.
    #[error("no rows could be parsed")]
    NoRecoverableRows {
        /// One message per failed row.
        messages: Vec<String>,
    },
    /// The serializer failed (should not happen for in-memory writes).
    #[error("serialization failed: {0}")]
    Serialize(#[from] csv::Error),
}

impl TabularError {
    /// All collected per-row messages, for the error panel.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::NoRecoverableRows { messages } => messages.clone(),
            Self::Serialize(err) => vec![err.to_string()],
        }
    }
}

/// An ordered header list plus ordered records.
///
/// Invariant: every row has exactly `headers.len()` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut data = Self { headers, rows };
        data.normalize_rows();
        data
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Replace a single cell value. Out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, value: String) {
        if let Some(r) = self.rows.get_mut(row)
            && let Some(cell) = r.get_mut(col)
        {
            *cell = value;
        }
    }

    /// Insert a new header after column `after`, giving every row an empty
    /// value at that position.
    ///
    /// Blank names (after trimming) and names that duplicate an existing
    /// header leave the data untouched and return false.
    pub fn insert_column(&mut self, after: usize, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.headers.iter().any(|h| h == name) {
            return false;
        }
        let at = (after + 1).min(self.headers.len());
        self.headers.insert(at, name.to_string());
        for row in &mut self.rows {
            row.insert(at, String::new());
        }
        true
    }

    /// Append a record with one empty value per header.
    pub fn push_empty_row(&mut self) {
        self.rows.push(vec![String::new(); self.headers.len()]);
    }

    /// Pad short rows and truncate long rows to the header count.
    fn normalize_rows(&mut self) {
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }
}

/// Parse delimited text into a header row plus records.
///
/// The first row is the header. Rows shorter than the header are padded
/// with empty fields; longer rows are truncated. Rows the underlying
/// reader rejects are skipped with their error collected.
///
/// Empty or whitespace-only input yields an empty `TableData` (the caller
/// shows a placeholder, not an error).
///
/// # Errors
/// Returns `TabularError::NoRecoverableRows` only when errors occurred and
/// not a single record survived.
pub fn parse(text: &str, separator: Separator) -> Result<TableData, TabularError> {
    if text.trim().is_empty() {
        return Ok(TableData::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut messages: Vec<String> = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                let fields: Vec<String> = record.iter().map(ToString::to_string).collect();
                if headers.is_empty() {
                    headers = fields;
                } else {
                    rows.push(fields);
                }
            }
            Err(err) => {
                tracing::debug!(row = idx, error = %err, "skipping malformed row");
                messages.push(format!("row {}: {err}", idx + 1));
            }
        }
    }

    if headers.is_empty() && rows.is_empty() && !messages.is_empty() {
        return Err(TabularError::NoRecoverableRows { messages });
    }

    Ok(TableData::new(headers, rows))
}

/// Serialize a record set back to delimited text.
///
/// Left-inverse of [`parse`] for any data this application produces:
/// fields containing the separator, quotes, or newlines are quoted by the
/// writer. No trailing newline is emitted.
///
/// # Errors
/// Returns `TabularError::Serialize` if the underlying writer fails.
pub fn serialize(data: &TableData, separator: Separator) -> Result<String, TabularError> {
    if data.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(separator.as_byte())
        .from_writer(Vec::new());

    writer.write_record(data.headers())?;
    for row in data.rows() {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    while text.ends_with('\n') || text.ends_with('\r') {
        text.pop();
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(text: &str) -> TableData {
        parse(text, Separator::Comma).expect("parse")
    }

    #[test]
    fn test_parse_basic() {
        let data = parse_ok("name,age\nAlice,30\nBob,25");
        assert_eq!(data.headers(), ["name", "age"]);
        assert_eq!(data.rows(), [vec!["Alice", "30"], vec!["Bob", "25"]]);
    }

    #[test]
    fn test_parse_empty_input_is_ok() {
        let data = parse_ok("");
        assert!(data.is_empty());
        let data = parse_ok("   \n  ");
        assert!(data.is_empty());
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let data = parse_ok("a,b,c\n1,2");
        assert_eq!(data.rows()[0], vec!["1", "2", ""]);
    }

    #[test]
    fn test_parse_truncates_long_rows() {
        let data = parse_ok("a,b\n1,2,3,4");
        assert_eq!(data.rows()[0], vec!["1", "2"]);
    }

    #[test]
    fn test_parse_semicolon() {
        let data = parse("x;y\n1;2", Separator::Semicolon).expect("parse");
        assert_eq!(data.headers(), ["x", "y"]);
        assert_eq!(data.rows()[0], vec!["1", "2"]);
    }

    #[test]
    fn test_parse_quoted_field_with_separator() {
        let data = parse_ok("name,note\n\"Doe, Jane\",hi");
        assert_eq!(data.rows()[0][0], "Doe, Jane");
    }

    #[test]
    fn test_parse_collects_row_errors() {
        // An unclosed quote makes the reader reject the remainder. With the
        // header already recovered, the parse still succeeds.
        let data = parse_ok("a,b\n\"unterminated,2");
        assert_eq!(data.headers(), ["a", "b"]);
    }

    #[test]
    fn test_serialize_no_trailing_newline() {
        let data = parse_ok("name,age\nAlice,30\nBob,25");
        let text = serialize(&data, Separator::Comma).expect("serialize");
        assert_eq!(text, "name,age\nAlice,30\nBob,25");
    }

    #[test]
    fn test_serialize_quotes_embedded_separator() {
        let mut data = parse_ok("name,note\nAlice,hi");
        data.set_cell(0, 1, "a,b".to_string());
        let text = serialize(&data, Separator::Comma).expect("serialize");
        let back = parse(&text, Separator::Comma).expect("reparse");
        assert_eq!(back.cell(0, 1), Some("a,b"));
    }

    #[test]
    fn test_serialize_empty_table() {
        let text = serialize(&TableData::default(), Separator::Comma).expect("serialize");
        assert_eq!(text, "");
    }

    #[test]
    fn test_edit_cell_scenario() {
        let mut data = parse_ok("name,age\nAlice,30\nBob,25");
        data.set_cell(1, 1, "26".to_string());
        let text = serialize(&data, Separator::Comma).expect("serialize");
        assert_eq!(text, "name,age\nAlice,30\nBob,26");
    }

    #[test]
    fn test_insert_column_after_first() {
        let mut data = parse_ok("a,b\n1,2");
        assert!(data.insert_column(0, "mid"));
        assert_eq!(data.headers(), ["a", "mid", "b"]);
        assert_eq!(data.rows()[0], vec!["1", "", "2"]);
    }

    #[test]
    fn test_insert_column_blank_name_is_noop() {
        let mut data = parse_ok("a,b\n1,2");
        assert!(!data.insert_column(0, "   "));
        assert_eq!(data.headers(), ["a", "b"]);
    }

    #[test]
    fn test_insert_column_duplicate_name_is_noop() {
        let mut data = parse_ok("a,b\n1,2");
        assert!(!data.insert_column(0, "b"));
        assert_eq!(data.headers(), ["a", "b"]);
    }

    #[test]
    fn test_inserted_column_survives_roundtrip() {
        let mut data = parse_ok("a,b\n1,2");
        data.insert_column(1, "c");
        let text = serialize(&data, Separator::Comma).expect("serialize");
        let back = parse(&text, Separator::Comma).expect("reparse");
        assert_eq!(back.headers(), ["a", "b", "c"]);
        assert_eq!(back.rows()[0], vec!["1", "2", ""]);
    }

    #[test]
    fn test_push_empty_row() {
        let mut data = parse_ok("a,b\n1,2");
        data.push_empty_row();
        assert_eq!(data.row_count(), 2);
        assert_eq!(data.rows()[1], vec!["", ""]);
    }

    #[test]
    fn test_separator_cycling_covers_all() {
        let mut sep = Separator::Comma;
        let mut seen = vec![sep];
        for _ in 0..3 {
            sep = sep.next();
            seen.push(sep);
        }
        assert_eq!(sep.next(), Separator::Comma);
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_header_only_input() {
        let data = parse_ok("a,b,c");
        assert_eq!(data.headers(), ["a", "b", "c"]);
        assert_eq!(data.row_count(), 0);
    }
}
