use super::flashcard_models::{FlashcardError, ImportFile};
use super::grouping::group_rows;
use super::pleco_format::render_import;
use super::sheet_parser::{decode_export, parse_rows};

/// Runs the whole export-to-import transformation.
pub fn build_import(export: &[u8], parent: &str) -> Result<ImportFile, FlashcardError> {
    let text = decode_export(export)?;
    let rows = parse_rows(&text);
    let table = group_rows(parent, &rows)?;

    if table.is_empty() {
        tracing::warn!("Export contained no vocabulary rows");
    } else {
        tracing::debug!(
            "Grouped {} rows under '{}' into {}",
            rows.len(),
            parent,
            table.categories().join(", ")
        );
    }

    Ok(ImportFile {
        contents: render_import(&table),
        category_count: table.len(),
        entry_count: table.entry_count(),
    })
}
