//! Generate command implementation

use std::io::Write;
use std::path::PathBuf;

use super::{load_input, resolve_format};
use crate::cli::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Arguments for the `generate` command
pub struct GenerateArgs {
    /// Schema file, or `-` for stdin
    pub input: String,
    pub format: Option<String>,
    pub dialect: Option<String>,
    pub output: Option<PathBuf>,
    /// Configuration file
    pub config_file: Option<PathBuf>,
    pub verbose: bool,
}

/// Build the effective configuration: file values, then command-line overrides.
pub fn build_config(args: &GenerateArgs) -> Result<PipelineConfig, CliError> {
    let mut config = match &args.config_file {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::new(),
    };

    if let Some(dialect) = &args.dialect {
        config = config.with_dialect(dialect);
    }
    if let Some(format) = &args.format {
        config = config.with_format(format);
    }
    if let Some(output) = &args.output {
        config = config.with_output(output);
    }
    if args.verbose {
        config = config.with_verbose(true);
    }
    Ok(config)
}

/// Handle the `generate` command
pub fn handle_generate(args: &GenerateArgs) -> Result<(), CliError> {
    let config = build_config(args)?;
    let input = load_input(&args.input)?;
    let format = resolve_format(config.format.as_deref(), input.path.as_deref())?;

    let pipeline = Pipeline::new(config)?;
    let mut output = pipeline.run(&input.bytes, &format)?;
    if let Some(path) = input.path {
        output.model.set_source(path);
    }

    let written = pipeline.write_output(&output)?;
    if written.is_none() {
        std::io::stdout()
            .write_all(output.script.as_bytes())
            .map_err(|e| CliError::OutputError(e.to_string()))?;
    }

    if pipeline.config().verbose {
        let source = output
            .model
            .source()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdin".to_string());
        eprintln!(
            "Generated {} script for {} table(s) from {}",
            output.dialect,
            output.model.len(),
            source
        );
        if let Some(path) = written {
            eprintln!("Script written to {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> GenerateArgs {
        GenerateArgs {
            input: "schema.json".to_string(),
            format: None,
            dialect: None,
            output: None,
            config_file: None,
            verbose: false,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("schema2script.toml");
        std::fs::write(&config_path, "dialect = \"oracle\"\nformat = \"xml\"\n").unwrap();

        let config = build_config(&GenerateArgs {
            config_file: Some(config_path.clone()),
            ..args()
        })
        .unwrap();
        assert_eq!(config.dialect, "oracle");
        assert_eq!(config.format.as_deref(), Some("xml"));

        let config = build_config(&GenerateArgs {
            config_file: Some(config_path),
            dialect: Some("mysql".to_string()),
            verbose: true,
            ..args()
        })
        .unwrap();
        assert_eq!(config.dialect, "mysql");
        assert_eq!(config.format.as_deref(), Some("xml"));
        assert!(config.verbose);
    }

    #[test]
    fn test_generate_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("schema.xml");
        std::fs::write(
            &input,
            r#"<schema><table name="employee"><column name="id" type="INT" primary-key="true"/></table></schema>"#,
        )
        .unwrap();
        let output = dir.path().join("out").join("schema.sql");

        handle_generate(&GenerateArgs {
            input: input.display().to_string(),
            output: Some(output.clone()),
            dialect: Some("postgres".to_string()),
            ..args()
        })
        .unwrap();

        let script = std::fs::read_to_string(output).unwrap();
        assert!(script.starts_with("CREATE TABLE \"employee\" (\n    \"id\" INTEGER,"));
    }
}
