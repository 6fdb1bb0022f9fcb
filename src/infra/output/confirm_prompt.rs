use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::core::sync::{OverwritePrompt, SyncError};

/// Only an exact `y` (surrounding whitespace ignored) counts as consent.
pub fn is_yes(answer: &str) -> bool {
    answer.trim() == "y"
}

/// Asks on stdout and reads the answer from any line reader, stdin by default.
pub struct TerminalPrompt<R> {
    input: Mutex<R>,
}

impl TerminalPrompt<BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> TerminalPrompt<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

#[async_trait]
impl<R> OverwritePrompt for TerminalPrompt<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn confirm_overwrite(&self, name: &str, existing_id: &str) -> Result<bool, SyncError> {
        let mut stdout = tokio::io::stdout();
        let question = format!("Found existing file {} ({}). Overwrite? y/n ", name, existing_id);
        stdout
            .write_all(question.as_bytes())
            .await
            .map_err(|e| SyncError::Prompt(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| SyncError::Prompt(e.to_string()))?;

        let mut answer = String::new();
        self.input
            .lock()
            .await
            .read_line(&mut answer)
            .await
            .map_err(|e| SyncError::Prompt(e.to_string()))?;
        Ok(is_yes(&answer))
    }
}

/// Answers every overwrite question the same way without asking.
pub struct FixedAnswer(pub bool);

#[async_trait]
impl OverwritePrompt for FixedAnswer {
    async fn confirm_overwrite(&self, name: &str, _existing_id: &str) -> Result<bool, SyncError> {
        tracing::info!("Overwrite of {} pre-answered: {}", name, self.0);
        Ok(self.0)
    }
}
