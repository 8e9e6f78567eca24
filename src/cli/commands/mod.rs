//! CLI command handlers

pub mod formats;
pub mod generate;
pub mod inspect;

pub use formats::handle_formats;
pub use generate::{GenerateArgs, handle_generate};
pub use inspect::{InspectArgs, handle_inspect};

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::error::CliError;
use crate::import::SchemaFormat;

/// Schema input read from a file or stdin
pub(crate) struct Input {
    pub bytes: Vec<u8>,
    /// `None` for stdin
    pub path: Option<PathBuf>,
}

/// Load input content from file or stdin (`-`)
pub(crate) fn load_input(input: &str) -> Result<Input, CliError> {
    if input == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(Input { bytes, path: None })
    } else {
        let path = PathBuf::from(input);
        let bytes = std::fs::read(&path).map_err(|e| CliError::FileReadError(path.clone(), e.to_string()))?;
        Ok(Input {
            bytes,
            path: Some(path),
        })
    }
}

/// Format key from an explicit flag, else from the file extension.
pub(crate) fn resolve_format(explicit: Option<&str>, path: Option<&Path>) -> Result<String, CliError> {
    match (explicit, path) {
        (Some(format), _) => Ok(format.to_string()),
        (None, Some(path)) => SchemaFormat::from_path(path)
            .map(|f| f.name().to_string())
            .map_err(|_| {
                CliError::InvalidArgument(format!(
                    "Cannot determine the format of {}; pass --format json or --format xml",
                    path.display()
                ))
            }),
        (None, None) => Err(CliError::InvalidArgument(
            "--format is required when reading from stdin".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format() {
        assert_eq!(resolve_format(Some("xml"), None).unwrap(), "xml");
        assert_eq!(
            resolve_format(None, Some(Path::new("schema.JSON"))).unwrap(),
            "json"
        );
        assert!(resolve_format(None, Some(Path::new("schema.txt"))).is_err());
        assert!(resolve_format(None, None).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_input("/definitely/not/here.json").err().unwrap();
        assert!(matches!(err, CliError::FileReadError(..)));
    }
}
