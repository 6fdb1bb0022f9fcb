// This is the entry point of the Pleco sync tool.
//
// **Architecture Overview:**
// - `core/` = Business logic (flashcard conversion, sync workflow, traits)
// - `infra/` = Implementations of core traits (Google Drive, local disk, terminal)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Run one sync and report how it ended

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use std::path::PathBuf;

use anyhow::Context;

use crate::core::sync::sync_models::{
    DEFAULT_EXPORT_FOLDER, DEFAULT_OUTPUT_DIR, DEFAULT_PARENT_CATEGORY, DEFAULT_SOURCE_SHEET,
};
use crate::core::sync::{OverwritePrompt, SyncConfig, SyncError, SyncOutcome, SyncService};
use crate::infra::google_drive::DriveClient;
use crate::infra::output::{FixedAnswer, LocalOutputDir, TerminalPrompt};

/// Builds the sync configuration from a variable lookup (the process
/// environment in production).
fn load_sync_config<F>(lookup: F) -> SyncConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str, default: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    SyncConfig {
        source_sheet: get("PLECO_SOURCE_SHEET", DEFAULT_SOURCE_SHEET),
        export_folder: get("PLECO_EXPORT_FOLDER", DEFAULT_EXPORT_FOLDER),
        parent_category: get("PLECO_PARENT_CATEGORY", DEFAULT_PARENT_CATEGORY),
        output_dir: PathBuf::from(get("PLECO_OUTPUT_DIR", DEFAULT_OUTPUT_DIR)),
    }
}

/// Accepts the usual spellings of an on/off switch.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" | "" => Some(false),
        _ => None,
    }
}

fn assume_yes<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup("PLECO_ASSUME_YES") else {
        return false;
    };
    parse_flag(&value).unwrap_or_else(|| {
        tracing::warn!(
            "Ignoring unrecognised PLECO_ASSUME_YES value '{}'; will ask before overwriting",
            value
        );
        false
    })
}

/// Either a pre-set answer or a real question on the terminal.
enum Prompt {
    Fixed(FixedAnswer),
    Terminal(TerminalPrompt<tokio::io::BufReader<tokio::io::Stdin>>),
}

#[async_trait::async_trait]
impl OverwritePrompt for Prompt {
    async fn confirm_overwrite(&self, name: &str, existing_id: &str) -> Result<bool, SyncError> {
        match self {
            Prompt::Fixed(p) => p.confirm_overwrite(name, existing_id).await,
            Prompt::Terminal(p) => p.confirm_overwrite(name, existing_id).await,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let env = |key: &str| std::env::var(key).ok();
    let config = load_sync_config(env);
    tracing::info!(
        "Syncing '{}' into folder '{}' as {}/<week>",
        config.source_sheet,
        config.export_folder,
        config.parent_category
    );

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let drive = DriveClient::from_env()
        .await
        .context("Failed to set up Google Drive credentials")?;
    let output = LocalOutputDir::new(&config.output_dir);
    let prompt = if assume_yes(env) {
        Prompt::Fixed(FixedAnswer(true))
    } else {
        Prompt::Terminal(TerminalPrompt::stdin())
    };

    let service = SyncService::new(drive, output, prompt, config);

    let today = chrono::Local::now().date_naive();
    let outcome = service.run(today).await.context("Sync failed")?;

    match outcome {
        SyncOutcome::Uploaded {
            file_id,
            local_path,
        } => println!("Uploaded {} as {}", local_path.display(), file_id),
        SyncOutcome::Updated {
            file_id,
            local_path,
        } => println!("Updated {} from {}", file_id, local_path.display()),
        SyncOutcome::Skipped {
            existing_id,
            local_path,
        } => println!(
            "Kept existing file {}; new import left at {}",
            existing_id,
            local_path.display()
        ),
    }

    Ok(())
}
