//! Folio CLI - documentation content pipeline.
//!
//! Provides commands for:
//! - `build`: Render every page to a static output directory
//! - `routes`: List the site's routes
//! - `search`: Search titles, descriptions and bodies
//! - `check`: Report diagnostics and pages that fail to compile

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, RoutesArgs, SearchArgs};
use output::Output;

/// Folio - documentation content pipeline.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Enable info-level logging (otherwise `RUST_LOG` applies).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site to static HTML fragments.
    Build(BuildArgs),
    /// List static routes.
    Routes(RoutesArgs),
    /// Search the documentation.
    Search(SearchArgs),
    /// Check content for diagnostics and compile errors.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(&output),
        Commands::Routes(args) => args.execute(&output),
        Commands::Search(args) => args.execute(&output),
        Commands::Check(args) => args.execute(&output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
