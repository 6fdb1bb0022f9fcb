use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::core::sync::OutputSink;

/// Writes import files into a local directory, creating it on first use.
pub struct LocalOutputDir {
    dir: PathBuf,
}

impl LocalOutputDir {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl OutputSink for LocalOutputDir {
    async fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents).await?;
        Ok(path)
    }
}
