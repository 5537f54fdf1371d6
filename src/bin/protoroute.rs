//! Protoroute CLI
//!
//! Prints the HTTP routes declared in a protobuf schema.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use protoroute::render::render_table;
use protoroute::{extract, ApiRoute, ExtractConfig, FileSource};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protoroute")]
#[command(version, about = "List the HTTP routes declared in a protobuf schema", long_about = None)]
struct Cli {
    /// Schema file to read; stdin when omitted or `-`
    schema: Option<PathBuf>,

    /// Substring identifying the HTTP mapping option
    #[arg(long, default_value = protoroute::config::DEFAULT_ANNOTATION)]
    annotation: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Only print methods that have an HTTP mapping
    #[arg(long)]
    mapped_only: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "protoroute=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = ExtractConfig::default().with_annotation(cli.annotation.as_str());

    let mut routes: Vec<ApiRoute> = match &cli.schema {
        Some(path) if path.as_os_str() != "-" => extract(&FileSource::new(path), &config)?,
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read schema from stdin")?;
            extract(text.as_str(), &config)?
        }
    };

    if cli.mapped_only {
        routes.retain(ApiRoute::is_mapped);
    }

    match cli.format {
        Format::Table => print!("{}", render_table(&routes)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&routes)?),
    }
    Ok(())
}
