use super::flashcard_models::{CategoryTable, Entry, FlashcardError};
use super::sheet_parser::Row;
use super::tone::convert_pinyin;

pub const WEEK_FIELD: &str = "Week";
pub const TERM_FIELD: &str = "Chinese";
pub const PINYIN_FIELD: &str = "Pinyin";

fn required<'a>(row: &'a Row, field: &'static str) -> Result<&'a str, FlashcardError> {
    row.get(field).ok_or(FlashcardError::MissingField {
        field,
        line: row.line,
    })
}

/// Builds the `<parent>/<week>` category key.
pub fn category_key(parent: &str, week: &str) -> String {
    format!("{}/{}", parent, week)
}

/// Turns one row into an entry under `parent`.
pub fn entry_from_row(parent: &str, row: &Row) -> Result<Entry, FlashcardError> {
    let week = required(row, WEEK_FIELD)?;
    let term = required(row, TERM_FIELD)?;
    let pinyin = required(row, PINYIN_FIELD)?;

    Ok(Entry::new(
        category_key(parent, week),
        term,
        convert_pinyin(pinyin),
    ))
}

/// Buckets rows into categories. The first row missing a required field
/// aborts the whole grouping.
pub fn group_rows<'a, I>(parent: &str, rows: I) -> Result<CategoryTable, FlashcardError>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut table = CategoryTable::new();
    for row in rows {
        table.push(entry_from_row(parent, row)?);
    }
    Ok(table)
}
