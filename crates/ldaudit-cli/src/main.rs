//! # ldaudit CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros for argument parsing; the audit surface mirrors
//! the Python `scripts/validator.py` CLI it replaces.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ldaudit_cli::audit::{run_audit, AuditArgs};
use ldaudit_cli::check::{run_check, CheckArgs};

/// Corpus auditor for JSON/JSON-LD document sets.
///
/// Batch syntax, JSON-LD structure, schema, and context-conformance checks
/// over example corpora, plus single-pair schema validation.
#[derive(Parser, Debug)]
#[command(name = "ldaudit", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run corpus checks over files and directories.
    Audit(AuditArgs),

    /// Validate a single data file against a single schema file.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("ldaudit CLI starting");

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let verbose = cli.verbose >= 1;

    let result = match cli.command {
        Commands::Audit(args) => run_audit(&args, &cwd, verbose),
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
