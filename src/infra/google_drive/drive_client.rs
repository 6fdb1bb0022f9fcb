use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::google_auth::GoogleAuth;
use crate::core::remote_store::{
    Page, PageSource, Paginator, RemoteFile, RemoteKind, RemoteStore, RemoteStoreError,
};

const DRIVE_BASE_URL: &str = "https://www.googleapis.com";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const CSV_MIME_TYPE: &str = "text/csv";
const TEXT_MIME_TYPE: &str = "text/plain";
const LIST_FIELDS: &str = "nextPageToken, files(id, name)";
const MULTIPART_BOUNDARY: &str = "pleco_sync_part";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewFileMetadata<'a> {
    name: &'a str,
    parents: Vec<&'a str>,
    mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

/// Picks a boundary that does not occur anywhere in `contents`.
fn multipart_boundary(contents: &[u8]) -> String {
    let mut boundary = MULTIPART_BOUNDARY.to_string();
    let mut attempt = 0u32;
    while contents
        .windows(boundary.len())
        .any(|window| window == boundary.as_bytes())
    {
        attempt += 1;
        boundary = format!("{}_{}", MULTIPART_BOUNDARY, attempt);
    }
    boundary
}

/// `multipart/related` body carrying the metadata and the content together,
/// so a file is created with its content or not at all.
fn multipart_body(boundary: &str, metadata_json: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(metadata_json.len() + contents.len() + 256);
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{}\r\n",
            boundary, metadata_json
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!("--{}\r\nContent-Type: {}\r\n\r\n", boundary, TEXT_MIME_TYPE).as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--", boundary).as_bytes());
    body
}

/// Escapes a value for use inside a single-quoted Drive query string.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Builds the `q` parameter for an exact-name search.
pub fn name_query(name: &str, kind: RemoteKind) -> String {
    let mime_clause = match kind {
        RemoteKind::Folder => format!("mimeType = '{}'", FOLDER_MIME_TYPE),
        RemoteKind::File => format!("mimeType != '{}'", FOLDER_MIME_TYPE),
    };
    format!(
        "name = '{}' and {} and trashed = false",
        escape_query_value(name),
        mime_clause
    )
}

fn into_page(list: FileList) -> Page<RemoteFile> {
    Page {
        items: list
            .files
            .into_iter()
            .map(|f| RemoteFile::new(f.id, f.name))
            .collect(),
        next_token: list.next_page_token,
    }
}

/// Google Drive v3 REST client. Every call is a single awaited request.
pub struct DriveClient {
    client: Client,
    auth: GoogleAuth,
    base_url: String,
}

impl DriveClient {
    pub fn new(auth: GoogleAuth) -> Self {
        Self {
            client: Client::new(),
            auth,
            base_url: DRIVE_BASE_URL.to_string(),
        }
    }

    /// Creates a client with credentials from environment variables.
    pub async fn from_env() -> Result<Self, RemoteStoreError> {
        Ok(Self::new(GoogleAuth::from_env().await?))
    }

    fn files_url(&self) -> String {
        format!("{}/drive/v3/files", self.base_url)
    }

    fn media_url(&self, id: &str) -> String {
        format!("{}/upload/drive/v3/files/{}?uploadType=media", self.base_url, id)
    }

    fn multipart_url(&self) -> String {
        format!("{}/upload/drive/v3/files?uploadType=multipart&fields=id", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteStoreError> {
        let token = self.auth.get_access_token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| RemoteStoreError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteStoreError::Api { status, body });
        }
        Ok(response)
    }

    async fn list_page(
        &self,
        query: &str,
        page_token: Option<String>,
    ) -> Result<Page<RemoteFile>, RemoteStoreError> {
        let mut params = vec![
            ("q", query.to_string()),
            ("spaces", "drive".to_string()),
            ("fields", LIST_FIELDS.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response = self
            .send(self.client.get(self.files_url()).query(&params))
            .await?;
        let list: FileList = response
            .json()
            .await
            .map_err(|e| RemoteStoreError::Decode(e.to_string()))?;
        Ok(into_page(list))
    }

    async fn put_media(&self, local_path: &Path, id: &str) -> Result<(), RemoteStoreError> {
        let body = tokio::fs::read(local_path).await?;
        self.send(
            self.client
                .patch(self.media_url(id))
                .header("Content-Type", TEXT_MIME_TYPE)
                .body(body),
        )
        .await?;
        Ok(())
    }
}

/// One paged search query against a [`DriveClient`].
struct DriveSearch<'a> {
    client: &'a DriveClient,
    query: String,
}

#[async_trait]
impl<'a> PageSource for DriveSearch<'a> {
    type Item = RemoteFile;
    type Error = RemoteStoreError;

    async fn fetch_page(
        &mut self,
        token: Option<String>,
    ) -> Result<Page<RemoteFile>, RemoteStoreError> {
        self.client.list_page(&self.query, token).await
    }
}

#[async_trait]
impl RemoteStore for DriveClient {
    async fn search(
        &self,
        name: &str,
        kind: RemoteKind,
    ) -> Result<Vec<RemoteFile>, RemoteStoreError> {
        let query = name_query(name, kind);
        tracing::debug!("Searching Drive: {}", query);

        let found = Paginator::new(DriveSearch {
            client: self,
            query,
        })
        .collect_all()
        .await?;

        tracing::debug!("Drive search for '{}' returned {} result(s)", name, found.len());
        Ok(found)
    }

    async fn export_csv(&self, id: &str) -> Result<Vec<u8>, RemoteStoreError> {
        let url = format!("{}/{}/export", self.files_url(), id);
        let response = self
            .send(self.client.get(url).query(&[("mimeType", CSV_MIME_TYPE)]))
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteStoreError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn upload(
        &self,
        local_path: &Path,
        parent_id: &str,
        name: &str,
    ) -> Result<String, RemoteStoreError> {
        // Read before any request so a missing file leaves nothing behind.
        let contents = tokio::fs::read(local_path).await?;
        let metadata = NewFileMetadata {
            name,
            parents: vec![parent_id],
            mime_type: TEXT_MIME_TYPE,
        };
        let metadata_json =
            serde_json::to_string(&metadata).map_err(|e| RemoteStoreError::Decode(e.to_string()))?;
        let boundary = multipart_boundary(&contents);

        let response = self
            .send(
                self.client
                    .post(self.multipart_url())
                    .header(
                        "Content-Type",
                        format!("multipart/related; boundary={}", boundary),
                    )
                    .body(multipart_body(&boundary, &metadata_json, &contents)),
            )
            .await?;
        let created: CreatedFile = response
            .json()
            .await
            .map_err(|e| RemoteStoreError::Decode(e.to_string()))?;
        Ok(created.id)
    }

    async fn update(&self, local_path: &Path, id: &str) -> Result<(), RemoteStoreError> {
        self.put_media(local_path, id).await
    }
}
