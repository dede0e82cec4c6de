//! # ldaudit-cli — CLI Tool for Corpus Auditing
//!
//! Provides the `ldaudit` command-line interface, replacing the Python
//! `scripts/validator.py` and `scripts/validate_jsonld.py` tools with a
//! structured Rust implementation.
//!
//! ## Subcommands
//!
//! - `ldaudit audit` — Batch checks over files and directories: JSON syntax,
//!   JSON-LD structure, schema validation, and context conformance.
//! - `ldaudit check` — One data file against one schema file.
//!
//! ## Exit Codes
//!
//! - `0` — every selected check passed (warnings alone do not fail a run).
//! - `1` — at least one check recorded an error.
//! - `2` — the command line itself was rejected.
//!
//! ```bash
//! ldaudit audit examples/
//! ldaudit audit --syntax --schema examples/ extra_profile.jsonld
//! ldaudit check examples/repo_profile_example.json schemas/repo_profile.schema.json
//! ```

pub mod audit;
pub mod check;
