//! Splits a CSV spreadsheet export into header-keyed rows.
//!
//! This is intentionally not a general CSV reader: the export has one fixed
//! schema, fields are split on every comma and quoting is not understood.

use super::flashcard_models::FlashcardError;

/// Line terminator used by the spreadsheet export.
pub const LINE_TERMINATOR: &str = "\r\n";
pub const FIELD_DELIMITER: char = ',';

/// One data line, keyed by the header column it sits under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// 1-based position of the line after the header.
    pub line: usize,
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(header, _)| header == key)
            .map(|(_, value)| value.as_str())
    }

    #[allow(dead_code)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(header, _)| header.as_str())
    }

    #[allow(dead_code)]
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Decodes raw export bytes. The export is always UTF-8, so anything else is
/// reported rather than lossily patched.
pub fn decode_export(bytes: &[u8]) -> Result<String, FlashcardError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| FlashcardError::InvalidEncoding(e.to_string()))
}

/// Parses header + data lines into rows.
///
/// Short lines leave their trailing headers out of the row, long lines have
/// their extra fields dropped. Completely empty lines (such as the one after
/// a trailing terminator) are skipped.
pub fn parse_rows(text: &str) -> Vec<Row> {
    let mut lines = text.split(LINE_TERMINATOR);
    let header: Vec<&str> = match lines.next() {
        Some(line) if !line.is_empty() => line.split(FIELD_DELIMITER).collect(),
        _ => return Vec::new(),
    };

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let line_number = index + 1;
        if line.is_empty() {
            tracing::debug!("Skipping empty line {} in export", line_number);
            continue;
        }

        let row = Row {
            line: line_number,
            fields: header
                .iter()
                .zip(line.split(FIELD_DELIMITER))
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        };
        if row.len() < header.len() {
            tracing::debug!(
                "Line {} has {} of {} fields",
                line_number,
                row.len(),
                header.len()
            );
        }
        rows.push(row);
    }
    rows
}
