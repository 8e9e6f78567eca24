//! CLI error type

use std::path::PathBuf;

use crate::pipeline::PipelineError;

/// Errors reported by the schema2script binary
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {}: {}", .0.display(), .1)]
    FileReadError(PathBuf, String),

    #[error("Failed to write output: {0}")]
    OutputError(String),

    #[error("{}", .0.user_message())]
    PipelineError(#[from] PipelineError),
}
