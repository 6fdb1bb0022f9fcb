pub mod sync_models;
pub mod sync_service;

pub use sync_models::{OutputSink, OverwritePrompt, SyncConfig, SyncError, SyncOutcome};
pub use sync_service::SyncService;
