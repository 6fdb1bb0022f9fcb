// The sync workflow: find the spreadsheet and destination folder, turn the
// export into a Pleco import, save it locally, then upload it or (after
// asking) overwrite the previous upload. Nothing here knows about HTTP or the
// terminal; those arrive through the traits in `sync_models`.

use chrono::NaiveDate;

use super::sync_models::{OutputSink, OverwritePrompt, SyncConfig, SyncError, SyncOutcome};
use crate::core::flashcards::{build_import, import_file_name};
use crate::core::remote_store::{exact_match, RemoteKind, RemoteStore};

pub struct SyncService<R: RemoteStore, O: OutputSink, P: OverwritePrompt> {
    remote: R,
    output: O,
    prompt: P,
    config: SyncConfig,
}

impl<R: RemoteStore, O: OutputSink, P: OverwritePrompt> SyncService<R, O, P> {
    pub fn new(remote: R, output: O, prompt: P, config: SyncConfig) -> Self {
        Self {
            remote,
            output,
            prompt,
            config,
        }
    }

    /// Looks up exactly one object by name. Missing objects are errors here:
    /// the workflow cannot continue without the sheet or the folder.
    async fn require_one(&self, name: &str, kind: RemoteKind) -> Result<String, SyncError> {
        let candidates = self.remote.search(name, kind).await?;
        exact_match(name, &candidates)?.ok_or_else(|| SyncError::NotFound(name.to_string()))
    }

    /// Runs the whole workflow, naming the import after `date`.
    pub async fn run(&self, date: NaiveDate) -> Result<SyncOutcome, SyncError> {
        let sheet_id = self
            .require_one(&self.config.source_sheet, RemoteKind::File)
            .await?;
        tracing::info!("Found sheet '{}' ({})", self.config.source_sheet, sheet_id);

        let folder_id = self
            .require_one(&self.config.export_folder, RemoteKind::Folder)
            .await?;
        tracing::info!("Found folder '{}' ({})", self.config.export_folder, folder_id);

        let export = self.remote.export_csv(&sheet_id).await?;
        let import = build_import(&export, &self.config.parent_category)?;
        tracing::info!(
            "Built import with {} entries across {} categories",
            import.entry_count,
            import.category_count
        );

        let file_name = import_file_name(date);
        let local_path = self.output.write(&file_name, &import.contents).await?;
        tracing::info!("Wrote {}", local_path.display());

        // TODO: scope this search to the export folder once nested lookups exist
        let existing = self.remote.search(&file_name, RemoteKind::File).await?;
        match exact_match(&file_name, &existing)? {
            None => {
                let file_id = self.remote.upload(&local_path, &folder_id, &file_name).await?;
                tracing::info!("Uploaded {} as {}", file_name, file_id);
                Ok(SyncOutcome::Uploaded {
                    file_id,
                    local_path,
                })
            }
            Some(existing_id) => {
                tracing::info!("Found existing file {} ({})", file_name, existing_id);
                if self.prompt.confirm_overwrite(&file_name, &existing_id).await? {
                    self.remote.update(&local_path, &existing_id).await?;
                    tracing::info!("Updated {}", existing_id);
                    Ok(SyncOutcome::Updated {
                        file_id: existing_id,
                        local_path,
                    })
                } else {
                    tracing::info!("Skipping update of {}", existing_id);
                    Ok(SyncOutcome::Skipped {
                        existing_id,
                        local_path,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::remote_store::{LookupError, RemoteFile, RemoteStoreError};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    const EXPORT: &[u8] = b"Week,Chinese,Pinyin\r\n1,\xe7\x8c\xab,mao\xcc\x84\r\n";

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Upload { parent_id: String, name: String },
        Update { id: String },
    }

    fn unavailable() -> RemoteStoreError {
        RemoteStoreError::Api {
            status: 503,
            body: "backend unavailable".to_string(),
        }
    }

    // Simple in-memory store for testing
    struct FakeStore {
        files: Vec<RemoteFile>,
        folders: Vec<RemoteFile>,
        export: Vec<u8>,
        fail_writes: bool,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                files: vec![RemoteFile::new("sheet-1", "Chinese Words")],
                folders: vec![RemoteFile::new("folder-1", "pleco")],
                export: EXPORT.to_vec(),
                fail_writes: false,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl RemoteStore for FakeStore {
        async fn search(
            &self,
            name: &str,
            kind: RemoteKind,
        ) -> Result<Vec<RemoteFile>, RemoteStoreError> {
            let pool = match kind {
                RemoteKind::File => &self.files,
                RemoteKind::Folder => &self.folders,
            };
            Ok(pool.iter().filter(|f| f.name == name).cloned().collect())
        }

        async fn export_csv(&self, id: &str) -> Result<Vec<u8>, RemoteStoreError> {
            assert_eq!(id, "sheet-1");
            Ok(self.export.clone())
        }

        async fn upload(
            &self,
            _local_path: &Path,
            parent_id: &str,
            name: &str,
        ) -> Result<String, RemoteStoreError> {
            if self.fail_writes {
                return Err(unavailable());
            }
            self.calls.lock().unwrap().push(Call::Upload {
                parent_id: parent_id.to_string(),
                name: name.to_string(),
            });
            Ok("new-1".to_string())
        }

        async fn update(&self, _local_path: &Path, id: &str) -> Result<(), RemoteStoreError> {
            if self.fail_writes {
                return Err(unavailable());
            }
            self.calls.lock().unwrap().push(Call::Update { id: id.to_string() });
            Ok(())
        }
    }

    struct MemorySink {
        written: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl OutputSink for MemorySink {
        async fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, std::io::Error> {
            self.written
                .lock()
                .unwrap()
                .push((file_name.to_string(), contents.to_string()));
            Ok(PathBuf::from("output").join(file_name))
        }
    }

    struct FixedAnswer(bool);

    #[async_trait]
    impl OverwritePrompt for FixedAnswer {
        async fn confirm_overwrite(&self, _: &str, _: &str) -> Result<bool, SyncError> {
            Ok(self.0)
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 9, 1).unwrap()
    }

    fn service(
        store: FakeStore,
        answer: bool,
    ) -> (
        SyncService<FakeStore, MemorySink, FixedAnswer>,
        Arc<Mutex<Vec<(String, String)>>>,
    ) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = MemorySink {
            written: Arc::clone(&written),
        };
        let svc = SyncService::new(store, sink, FixedAnswer(answer), SyncConfig::default());
        (svc, written)
    }

    #[tokio::test]
    async fn test_uploads_when_no_previous_import() {
        let store = FakeStore::new();
        let calls = Arc::clone(&store.calls);
        let (svc, written) = service(store, false);

        let outcome = svc.run(date()).await.unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::Uploaded {
                file_id: "new-1".to_string(),
                local_path: PathBuf::from("output/2021-09-01_pleco_import.txt"),
            }
        );
        assert_eq!(
            *written.lock().unwrap(),
            vec![(
                "2021-09-01_pleco_import.txt".to_string(),
                "// Y2021/1\n猫\tmao1".to_string()
            )]
        );
        assert_eq!(
            *calls.lock().unwrap(),
            vec![Call::Upload {
                parent_id: "folder-1".to_string(),
                name: "2021-09-01_pleco_import.txt".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_updates_existing_import_when_confirmed() {
        let mut store = FakeStore::new();
        store
            .files
            .push(RemoteFile::new("old-1", "2021-09-01_pleco_import.txt"));
        let calls = Arc::clone(&store.calls);
        let (svc, _) = service(store, true);

        let outcome = svc.run(date()).await.unwrap();

        assert!(matches!(outcome, SyncOutcome::Updated { ref file_id, .. } if file_id == "old-1"));
        assert_eq!(
            *calls.lock().unwrap(),
            vec![Call::Update {
                id: "old-1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_skips_existing_import_when_declined() {
        let mut store = FakeStore::new();
        store
            .files
            .push(RemoteFile::new("old-1", "2021-09-01_pleco_import.txt"));
        let calls = Arc::clone(&store.calls);
        let (svc, written) = service(store, false);

        let outcome = svc.run(date()).await.unwrap();

        assert!(matches!(outcome, SyncOutcome::Skipped { ref existing_id, .. } if existing_id == "old-1"));
        assert!(calls.lock().unwrap().is_empty());
        // the local file is still written
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_sheet_is_not_found() {
        let mut store = FakeStore::new();
        store.files.clear();
        let (svc, written) = service(store, true);

        let err = svc.run(date()).await.unwrap_err();
        assert!(matches!(err, SyncError::NotFound(ref name) if name == "Chinese Words"));
        assert!(written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_folders_are_ambiguous() {
        let mut store = FakeStore::new();
        store.folders.push(RemoteFile::new("folder-2", "pleco"));
        let (svc, _) = service(store, true);

        let err = svc.run(date()).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Lookup(LookupError::Ambiguous { count: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_bad_export_halts_before_writing() {
        let mut store = FakeStore::new();
        store.export = b"Week,Chinese\r\n1,x".to_vec();
        let calls = Arc::clone(&store.calls);
        let (svc, written) = service(store, true);

        let err = svc.run(date()).await.unwrap_err();
        assert!(matches!(err, SyncError::Flashcards(_)));
        assert!(written.lock().unwrap().is_empty());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_previous_imports_are_ambiguous() {
        let mut store = FakeStore::new();
        store
            .files
            .push(RemoteFile::new("old-1", "2021-09-01_pleco_import.txt"));
        store
            .files
            .push(RemoteFile::new("old-2", "2021-09-01_pleco_import.txt"));
        let calls = Arc::clone(&store.calls);
        let (svc, written) = service(store, true);

        let err = svc.run(date()).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::Lookup(LookupError::Ambiguous { ref name, count: 2 })
                if name == "2021-09-01_pleco_import.txt"
        ));
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_upload_is_reported() {
        let mut store = FakeStore::new();
        store.fail_writes = true;
        let calls = Arc::clone(&store.calls);
        let (svc, _) = service(store, true);

        let err = svc.run(date()).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::Remote(RemoteStoreError::Api { status: 503, .. })
        ));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_is_reported() {
        let mut store = FakeStore::new();
        store
            .files
            .push(RemoteFile::new("old-1", "2021-09-01_pleco_import.txt"));
        store.fail_writes = true;
        let (svc, _) = service(store, true);

        let err = svc.run(date()).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::Remote(RemoteStoreError::Api { status: 503, .. })
        ));
    }
}
