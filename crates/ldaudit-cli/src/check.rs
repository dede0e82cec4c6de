//! # Check Subcommand
//!
//! Validates exactly one data file against one explicit schema file,
//! matching the behavior of `scripts/validate_jsonld.py` from the Python
//! tooling. Sibling schemas in the same directory are loaded so `$ref`
//! targets resolve.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use ldaudit_schema::{check_schema, SchemaStore};

/// Arguments for the `ldaudit check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the JSON data file to validate.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Path to the JSON Schema file to validate against.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when the data conforms, 1 when it does not or
/// when either file cannot be used.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let schema_dir = match args.schema.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let store = SchemaStore::load(schema_dir);
    tracing::debug!(schemas = store.schema_count(), "schema registry loaded");

    match check_schema(&args.data, &args.schema, &store) {
        Ok(()) => {
            println!(
                "OK: {} conforms to {}",
                args.data.display(),
                args.schema.display()
            );
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: {} - {e}", args.data.display());
            Ok(1)
        }
    }
}
