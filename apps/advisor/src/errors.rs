use std::path::PathBuf;

use thiserror::Error;

use crate::extractor::ExtractError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Anything that reaches `main` ends the run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0:#}")]
    Config(#[from] anyhow::Error),

    #[error("No input received")]
    NoInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error extracting text from PDF: {0}")]
    Extract(#[from] ExtractError),

    #[error("No text extracted from PDF: {}", .0.display())]
    EmptyDocument(PathBuf),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl AppError {
    /// True when the run never got past loading the resume.
    pub fn is_startup_failure(&self) -> bool {
        matches!(
            self,
            AppError::Config(_)
                | AppError::NoInput
                | AppError::Extract(_)
                | AppError::EmptyDocument(_)
        )
    }
}
