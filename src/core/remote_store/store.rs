use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a remote document store.
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Remote API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not decode response: {0}")]
    Decode(String),
}

/// A file or folder as the remote store names it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
}

impl RemoteFile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    /// Any non-folder object.
    File,
    Folder,
}

/// What the sync workflow needs from the document store. Calls are made one
/// at a time and are never retried.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every object of `kind` whose name is `name`. Implementations may return
    /// extra near-matches; callers filter with [`exact_match`](super::exact_match).
    async fn search(&self, name: &str, kind: RemoteKind)
        -> Result<Vec<RemoteFile>, RemoteStoreError>;

    /// Exports a spreadsheet as CSV bytes.
    async fn export_csv(&self, id: &str) -> Result<Vec<u8>, RemoteStoreError>;

    /// Uploads a local file into `parent_id`, returning the new object's id.
    async fn upload(
        &self,
        local_path: &Path,
        parent_id: &str,
        name: &str,
    ) -> Result<String, RemoteStoreError>;

    /// Replaces the contents of an existing object.
    async fn update(&self, local_path: &Path, id: &str) -> Result<(), RemoteStoreError>;
}
