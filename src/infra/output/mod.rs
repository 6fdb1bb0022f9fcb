pub mod confirm_prompt;
pub mod file_output;

pub use confirm_prompt::{FixedAnswer, TerminalPrompt};
pub use file_output::LocalOutputDir;
