//! Inspect command implementation

use super::{load_input, resolve_format};
use crate::cli::error::CliError;
use crate::cli::output::format_model;
use crate::export::JsonSchemaExporter;
use crate::import::select_parser;
use crate::pipeline::PipelineError;
use crate::validation::RelationshipResolver;

/// Arguments for the `inspect` command
pub struct InspectArgs {
    /// Schema file, or `-` for stdin
    pub input: String,
    pub format: Option<String>,
    /// Print the parsed model as JSON instead of a summary
    pub json: bool,
}

/// Handle the `inspect` command
pub fn handle_inspect(args: &InspectArgs) -> Result<(), CliError> {
    let input = load_input(&args.input)?;
    let format = resolve_format(args.format.as_deref(), input.path.as_deref())?;

    let parser = select_parser(&format).map_err(PipelineError::from)?;
    let mut model = parser.parse(&input.bytes).map_err(PipelineError::from)?;
    if let Some(path) = input.path {
        model.set_source(path);
    }

    if args.json {
        let json = JsonSchemaExporter::new()
            .export(&model)
            .map_err(|e| CliError::OutputError(e.to_string()))?;
        print!("{}", json);
        return Ok(());
    }

    print!("{}", format_model(&model));

    // Resolution problems are reported but do not fail inspection
    match RelationshipResolver::new(&model).resolve() {
        Ok(resolved) => {
            let synthesized: Vec<&str> = resolved.synthesized_tables().map(|t| t.name.as_str()).collect();
            if !synthesized.is_empty() {
                println!("\nJoin tables to be synthesized: {}", synthesized.join(", "));
            }
            println!("Creation order: {}", resolved.table_names().join(" -> "));
            for cycle in resolved.cycles() {
                println!("⚠️  Foreign-key cycle: {}", cycle.join(", "));
            }
        }
        Err(e) => println!("\n⚠️  {}", e),
    }
    Ok(())
}
