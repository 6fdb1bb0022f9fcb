//! Pleco flashcard import format.
//!
//! ```text
//! // Y2021/1
//! 猫	mao1
//! 狗	gou3
//! ```

use chrono::NaiveDate;

use super::flashcard_models::CategoryTable;

const CATEGORY_PREFIX: &str = "// ";

/// Renders the table as import text. Lines are joined with `\n` and there is
/// no trailing newline; tabs inside values are written as-is.
pub fn render_import(table: &CategoryTable) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(table.len() + table.entry_count());
    for (category, entries) in table.iter() {
        lines.push(format!("{}{}", CATEGORY_PREFIX, category));
        for entry in entries {
            lines.push(format!("{}\t{}", entry.term(), entry.transliteration()));
        }
    }
    lines.join("\n")
}

/// `<YYYY-MM-DD>_pleco_import.txt`
pub fn import_file_name(date: NaiveDate) -> String {
    format!("{}_pleco_import.txt", date.format("%Y-%m-%d"))
}
