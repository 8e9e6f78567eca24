//! Error types for pipeline operations
//!
//! Each stage error is wrapped as-is so callers can match on the kind and
//! walk the source chain; [`PipelineError::user_message`] adds hints for CLI
//! output.

use std::path::PathBuf;
use thiserror::Error;

use crate::export::{GenerationError, UnsupportedDialectError};
use crate::import::{SchemaParsingError, UnsupportedFormatError};

/// Errors that can occur during pipeline execution
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Pipeline configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration file is not valid TOML for [`PipelineConfig`](super::PipelineConfig)
    #[error("Invalid configuration file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    #[error(transparent)]
    UnsupportedDialect(#[from] UnsupportedDialectError),

    /// Parse stage failed
    #[error("Failed to parse schema: {0}")]
    Parsing(#[from] SchemaParsingError),

    /// Generate stage failed
    #[error("Failed to generate script: {0}")]
    Generation(#[from] GenerationError),

    /// IO error with path context
    #[error("IO error with {path}: {message}")]
    IoErrorWithPath {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Create an IO error with path context
    pub fn io_with_path(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::IoErrorWithPath {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Name of the stage that failed, if the error came from one
    pub fn stage_name(&self) -> Option<&'static str> {
        match self {
            PipelineError::UnsupportedFormat(_) | PipelineError::Parsing(_) => Some("parse"),
            PipelineError::UnsupportedDialect(_) | PipelineError::Generation(_) => Some("generate"),
            _ => None,
        }
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::ConfigError(msg) => {
                format!("Configuration error: {msg}\n\nHint: Check your configuration file.")
            }
            PipelineError::UnsupportedFormat(e) => {
                format!("{e}\n\nHint: Use --format json or --format xml.")
            }
            PipelineError::UnsupportedDialect(e) => {
                format!("{e}\n\nHint: Run `schema2script formats` to list the available dialects.")
            }
            PipelineError::Generation(GenerationError::UnmappedType { .. }) => {
                format!("{self}\n\nHint: The generic dialect accepts any type name.")
            }
            PipelineError::IoErrorWithPath { path, message, source } => {
                format!(
                    "Cannot access {} while {message}: {source}\n\nHint: Check that the file exists and the path is correct.",
                    path.display()
                )
            }
            _ => self.to_string(),
        }
    }
}
