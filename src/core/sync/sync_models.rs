use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::flashcards::FlashcardError;
use crate::core::remote_store::{LookupError, RemoteStoreError};

pub const DEFAULT_SOURCE_SHEET: &str = "Chinese Words";
pub const DEFAULT_EXPORT_FOLDER: &str = "pleco";
pub const DEFAULT_PARENT_CATEGORY: &str = "Y2021";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteStoreError),
    #[error("{0}")]
    Lookup(#[from] LookupError),
    #[error("Could not find '{0}' in the remote store")]
    NotFound(String),
    #[error("Could not build import file: {0}")]
    Flashcards(#[from] FlashcardError),
    #[error("Could not write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("Could not read confirmation: {0}")]
    Prompt(String),
}

/// Names and locations for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Exact name of the spreadsheet to export.
    pub source_sheet: String,
    /// Exact name of the folder the import file is uploaded into.
    pub export_folder: String,
    /// Prefix for every category, e.g. `Y2021` gives `Y2021/<week>`.
    pub parent_category: String,
    /// Local directory the import file is written to before upload.
    pub output_dir: PathBuf,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source_sheet: DEFAULT_SOURCE_SHEET.to_string(),
            export_folder: DEFAULT_EXPORT_FOLDER.to_string(),
            parent_category: DEFAULT_PARENT_CATEGORY.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Uploaded { file_id: String, local_path: PathBuf },
    Updated { file_id: String, local_path: PathBuf },
    /// An import with the same name already existed and the operator kept it.
    Skipped { existing_id: String, local_path: PathBuf },
}

/// Where the rendered import file lands locally.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, std::io::Error>;
}

/// Asks whether an existing remote import may be overwritten.
#[async_trait]
pub trait OverwritePrompt: Send + Sync {
    async fn confirm_overwrite(&self, name: &str, existing_id: &str) -> Result<bool, SyncError>;
}
