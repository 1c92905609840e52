//! Vectab CLI - Transpose records into vector tables
//!
//! ```bash
//! vectab transpose months.json -k id -o table.csv   # Records file → table
//! vectab parse months.csv                           # Records file → JSON records
//! vectab records table.csv                          # Table → JSON records
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use vectab::logs::{log_error, log_success, LOG_BROADCASTER};
use vectab::{
    parse_file_auto, read_table, transpose_file, transpose_file_to, vectors_to_records,
    ParseOptions, PipelineOptions, SchemaCheck, TransposeOptions,
};

#[derive(Parser)]
#[command(name = "vectab")]
#[command(about = "Transpose uniform records into named vectors", long_about = None)]
struct Cli {
    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpose a records file (JSON array or CSV) into a vector table
    Transpose {
        /// Input records file (.json, anything else is read as CSV)
        input: PathBuf,

        /// Sort records by this field first
        #[arg(short, long, env = "VECTAB_KEY_FIELD")]
        key: Option<String>,

        /// Output table (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Check fields only when they are extracted
        #[arg(long)]
        lazy_schema: bool,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Keep CSV cells as text
        #[arg(long)]
        raw: bool,
    },

    /// Parse a records file and output JSON
    Parse {
        /// Input records file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Keep CSV cells as text
        #[arg(long)]
        raw: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Read a vector table back and output its records as JSON
    Records {
        /// Input table
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if cli.quiet {
        LOG_BROADCASTER.set_echo(false);
    }

    let result = match cli.command {
        Commands::Transpose {
            input,
            key,
            output,
            lazy_schema,
            delimiter,
            raw,
        } => {
            let options = PipelineOptions {
                parse: ParseOptions { delimiter, raw },
                transpose: TransposeOptions {
                    key_field: key,
                    schema_check: if lazy_schema {
                        SchemaCheck::Lazy
                    } else {
                        SchemaCheck::Strict
                    },
                },
            };
            cmd_transpose(&input, output.as_deref(), &options)
        }

        Commands::Parse {
            input,
            delimiter,
            raw,
            output,
        } => cmd_parse(&input, &ParseOptions { delimiter, raw }, output.as_deref()),

        Commands::Records { input, output } => cmd_records(&input, output.as_deref()),
    };

    if let Err(e) = result {
        // Errors are printed even with --quiet
        LOG_BROADCASTER.set_echo(true);
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_transpose(
    input: &Path,
    output: Option<&Path>,
    options: &PipelineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = match output {
        Some(path) => transpose_file(input, path, options)?,
        None => transpose_file_to(input, std::io::stdout().lock(), options)?,
    };

    log_success(format!(
        "{} fields x {} records{}",
        summary.fields.len(),
        summary.record_count,
        summary
            .sorted_by
            .map(|k| format!(", sorted by '{}'", k))
            .unwrap_or_default()
    ));
    Ok(())
}

fn cmd_parse(
    input: &Path,
    options: &ParseOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = parse_file_auto(input, options)?;
    log_success(format!(
        "Parsed {} records ({}, columns: {})",
        parsed.records.len(),
        parsed.encoding,
        parsed.headers.join(", ")
    ));

    let json = serde_json::to_string_pretty(&parsed.records)?;
    write_output(&json, output)
}

fn cmd_records(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let vectors = read_table(input)?;
    let records = vectors_to_records(&vectors)?;
    log_success(format!("{} vectors, {} records", vectors.len(), records.len()));

    let json = serde_json::to_string_pretty(&records)?;
    write_output(&json, output)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log_success(format!("Output written to: {}", p.display()));
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
