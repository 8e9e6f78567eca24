//! Schema-to-script pipeline
//!
//! Orchestrates the two stages:
//! - **Parse**: select a parser for the input format and build a [`SchemaModel`]
//! - **Generate**: select a generator for the dialect and produce the DDL script
//!
//! # Example
//!
//! ```rust
//! use schema2script::pipeline::{Pipeline, PipelineConfig};
//!
//! let json = br#"[{"tableName": "employee", "columns": [
//!     {"name": "id", "type": "INT", "primaryKey": true},
//!     {"name": "name", "type": "VARCHAR(100)"}
//! ]}]"#;
//!
//! let pipeline = Pipeline::new(PipelineConfig::new().with_dialect("oracle")).unwrap();
//! let output = pipeline.run(json, "json").unwrap();
//! assert!(output.script.starts_with("CREATE TABLE employee ("));
//! ```

mod config;
mod error;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};

use std::path::{Path, PathBuf};

use crate::export::{DialectKind, select_generator};
use crate::import::{SchemaFormat, select_parser};
use crate::models::SchemaModel;

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The parsed model
    pub model: SchemaModel,
    pub dialect: DialectKind,
    /// Generated DDL script
    pub script: String,
}

/// Runs parse and generate for one configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate().map_err(PipelineError::ConfigError)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse `bytes` as `format_key` and generate the configured dialect's script.
    pub fn run(&self, bytes: &[u8], format_key: &str) -> PipelineResult<PipelineOutput> {
        let model = self.parse(bytes, format_key)?;
        self.generate(model)
    }

    /// Read and process a schema file.
    ///
    /// The format comes from the configuration when set, otherwise from the
    /// file extension.
    pub fn run_file(&self, path: &Path) -> PipelineResult<PipelineOutput> {
        let format = match &self.config.format {
            Some(format) => format.parse::<SchemaFormat>()?,
            None => SchemaFormat::from_path(path)?,
        };
        let bytes = std::fs::read(path)
            .map_err(|e| PipelineError::io_with_path(path, "reading schema", e))?;

        let mut model = self.parse(&bytes, format.name())?;
        model.set_source(path);
        self.generate(model)
    }

    /// Write the script to the configured output file.
    ///
    /// Returns the path written, or `None` when no output file is configured.
    pub fn write_output(&self, output: &PipelineOutput) -> PipelineResult<Option<PathBuf>> {
        let Some(path) = &self.config.output else {
            return Ok(None);
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| PipelineError::io_with_path(parent, "creating output directory", e))?;
        }
        std::fs::write(path, &output.script)
            .map_err(|e| PipelineError::io_with_path(path, "writing script", e))?;
        tracing::info!("Script written to {}", path.display());
        Ok(Some(path.clone()))
    }

    fn parse(&self, bytes: &[u8], format_key: &str) -> PipelineResult<SchemaModel> {
        let parser = select_parser(format_key)?;
        tracing::info!("Parsing {} schema", parser.format());
        Ok(parser.parse(bytes)?)
    }

    fn generate(&self, model: SchemaModel) -> PipelineResult<PipelineOutput> {
        let generator = select_generator(&self.config.dialect)?;
        let script = generator.generate(&model)?;
        Ok(PipelineOutput {
            model,
            dialect: generator.kind(),
            script,
        })
    }
}

/// Run the whole pipeline over in-memory input
pub fn generate_script(bytes: &[u8], format_key: &str, dialect_key: &str) -> PipelineResult<String> {
    let pipeline = Pipeline::new(PipelineConfig::new().with_dialect(dialect_key))?;
    Ok(pipeline.run(bytes, format_key)?.script)
}
