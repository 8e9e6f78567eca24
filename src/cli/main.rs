//! schema2script command-line interface

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use schema2script::cli::commands::{
    GenerateArgs, InspectArgs, handle_formats, handle_generate, handle_inspect,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema2script")]
#[command(author, version, about = "Generate SQL DDL scripts from XML/JSON schema descriptions", long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a DDL script from a schema file
    Generate {
        /// Schema file, or - for stdin
        input: String,

        /// Input format (json, xml); derived from the file extension by default
        #[arg(short, long)]
        format: Option<String>,

        /// Target dialect (generic, oracle, postgres, mysql)
        #[arg(short, long)]
        dialect: Option<String>,

        /// Output file; stdout by default
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the tables and relationships of a schema file
    Inspect {
        /// Schema file, or - for stdin
        input: String,

        /// Input format (json, xml)
        #[arg(short, long)]
        format: Option<String>,

        /// Print the parsed model as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported input formats and dialects
    Formats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Generate {
            input,
            format,
            dialect,
            output,
            config,
        } => handle_generate(&GenerateArgs {
            input,
            format,
            dialect,
            output,
            config_file: config,
            verbose: cli.verbose,
        })?,
        Commands::Inspect {
            input,
            format,
            json,
        } => handle_inspect(&InspectArgs {
            input,
            format,
            json,
        })?,
        Commands::Formats => handle_formats()?,
    }

    Ok(())
}
