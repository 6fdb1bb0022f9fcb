use std::collections::HashMap;

use thiserror::Error;

/// Errors raised while turning a spreadsheet export into an import file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlashcardError {
    #[error("Export is not valid UTF-8: {0}")]
    InvalidEncoding(String),
    #[error("Row {line} is missing required field '{field}'")]
    MissingField { field: &'static str, line: usize },
}

/// One flashcard: a term and its numbered-tone transliteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    category: String,
    term: String,
    transliteration: String,
}

impl Entry {
    pub fn new(
        category: impl Into<String>,
        term: impl Into<String>,
        transliteration: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            term: term.into(),
            transliteration: transliteration.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn transliteration(&self) -> &str {
        &self.transliteration
    }
}

/// Entries bucketed by category key, in the order categories were first seen.
///
/// Every entry lives in the bucket named by its own `category`, so the
/// bucket key and the entry can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    buckets: Vec<(String, Vec<Entry>)>,
    index: HashMap<String, usize>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to its category, creating the bucket on first sight.
    pub fn push(&mut self, entry: Entry) {
        match self.index.get(entry.category()) {
            Some(&slot) => self.buckets[slot].1.push(entry),
            None => {
                let key = entry.category().to_string();
                self.index.insert(key.clone(), self.buckets.len());
                self.buckets.push((key, vec![entry]));
            }
        }
    }

    #[allow(dead_code)]
    pub fn get(&self, category: &str) -> Option<&[Entry]> {
        self.index
            .get(category)
            .map(|&slot| self.buckets[slot].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.buckets
            .iter()
            .map(|(key, entries)| (key.as_str(), entries.as_slice()))
    }

    pub fn categories(&self) -> Vec<&str> {
        self.buckets.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|(_, entries)| entries.len()).sum()
    }
}

/// Rendered import text plus a few numbers worth logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    pub contents: String,
    pub category_count: usize,
    pub entry_count: usize,
}
