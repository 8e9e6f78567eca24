//! Pipeline configuration types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::PipelineError;
use crate::export::{DialectKind, UnsupportedDialectError};
use crate::import::SchemaFormat;

/// Main pipeline configuration
///
/// Loaded from TOML; every field is optional in the file:
///
/// ```toml
/// dialect = "oracle"
/// format = "xml"
/// output = "schema.sql"
/// verbose = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Target dialect key
    pub dialect: String,
    /// Input format key; derived from the file extension when absent
    pub format: Option<String>,
    /// Where to write the script; stdout when absent
    pub output: Option<PathBuf>,
    /// Verbose output
    pub verbose: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::Generic.name().to_string(),
            format: None,
            output: None,
            verbose: false,
        }
    }
}

impl PipelineConfig {
    /// Create a new pipeline config
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, PipelineError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::io_with_path(path, "reading configuration", e))?;
        tracing::debug!("Loaded pipeline configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Set the target dialect
    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = dialect.into();
        self
    }

    /// Set the input format
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the output file
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn dialect_kind(&self) -> Result<DialectKind, UnsupportedDialectError> {
        self.dialect.parse()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Err(e) = self.dialect_kind() {
            return Err(format!(
                "{} (expected one of: {})",
                e,
                DialectKind::all().iter().map(|d| d.name()).collect::<Vec<_>>().join(", ")
            ));
        }

        if let Some(Err(e)) = self.format.as_deref().map(str::parse::<SchemaFormat>) {
            return Err(format!(
                "{} (expected one of: {})",
                e,
                SchemaFormat::all().iter().map(|f| f.name()).collect::<Vec<_>>().join(", ")
            ));
        }

        Ok(())
    }
}
