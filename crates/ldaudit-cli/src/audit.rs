//! # Audit Subcommand
//!
//! Batch checks over files and directories: JSON syntax, JSON-LD structure,
//! schema validation, and context conformance.
//!
//! Matches the behavior of `scripts/validator.py` from the Python tooling:
//! directories are searched recursively, stage flags select a subset of the
//! checks, and a summary block closes the run. Unlike the Python tool, the
//! exit code reflects the verdict, so CI can gate on it.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use ldaudit_core::{check_syntax, config, CorpusLayout, RunSummary, Stage, StageReport};
use ldaudit_jsonld::{check_conformance, check_structure, Conformance};
use ldaudit_schema::{check_schema, SchemaBinding, SchemaStore};

/// Arguments for the `ldaudit audit` subcommand.
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Files or directories to audit. Directories are searched recursively
    /// for .json and .jsonld files.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Check that every selected file parses as JSON.
    #[arg(long)]
    pub syntax: bool,

    /// Check that .jsonld files survive JSON-LD expansion.
    #[arg(long)]
    pub structure: bool,

    /// Check example files against their bound schemas.
    #[arg(long)]
    pub schema: bool,

    /// Check example files against their expected contexts.
    #[arg(long)]
    pub context: bool,

    /// Corpus root holding the schemas/ and contexts/ directories.
    /// When omitted, discovered by walking up from the working directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

/// Which stages an audit run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSelection {
    /// Run the JSON syntax stage.
    pub syntax: bool,
    /// Run the JSON-LD structure stage.
    pub structure: bool,
    /// Run the schema validation stage.
    pub schema: bool,
    /// Run the context conformance stage.
    pub context: bool,
}

impl StageSelection {
    /// Selection with all four stages enabled.
    pub fn all() -> Self {
        Self {
            syntax: true,
            structure: true,
            schema: true,
            context: true,
        }
    }

    /// Selection requested by the stage flags. No flag set means all stages.
    pub fn from_flags(args: &AuditArgs) -> Self {
        if args.syntax || args.structure || args.schema || args.context {
            Self {
                syntax: args.syntax,
                structure: args.structure,
                schema: args.schema,
                context: args.context,
            }
        } else {
            Self::all()
        }
    }
}

/// Execute the audit subcommand.
///
/// Returns exit code: 0 when every selected check passed (or nothing was
/// found to check), 1 when at least one check recorded an error.
pub fn run_audit(args: &AuditArgs, cwd: &Path, verbose: bool) -> Result<u8> {
    let root = match &args.root {
        Some(root) => fs::canonicalize(root).unwrap_or_else(|_| root.clone()),
        None => discover_corpus_root(cwd).unwrap_or_else(|| {
            tracing::warn!("could not locate a corpus root; using the working directory");
            cwd.to_path_buf()
        }),
    };
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "corpus root is not a directory");
    }
    tracing::debug!(root = %root.display(), "corpus root selected");

    let files = discover_files(&args.paths);
    if files.is_empty() {
        println!("No files found to validate.");
        return Ok(0);
    }
    tracing::info!(files = files.len(), "starting audit");

    let layout = CorpusLayout::new(root);
    let summary = run_stages(&layout, &files, StageSelection::from_flags(args), verbose);
    print_summary(&summary);

    Ok(if summary.passed() { 0 } else { 1 })
}

/// Walk up from `start` to find the corpus root.
///
/// The root is identified by the presence of both `schemas/` and `contexts/`
/// directories.
fn discover_corpus_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(config::SCHEMAS_DIR).is_dir() && dir.join(config::CONTEXTS_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Expands the given paths into a deduplicated, sorted list of documents.
///
/// Explicit files are canonicalized; directories contribute every `.json`
/// and `.jsonld` file beneath them; anything else is skipped with a warning.
pub fn discover_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();
    for path in paths {
        if path.is_file() {
            found.insert(fs::canonicalize(path).unwrap_or_else(|_| path.clone()));
        } else if path.is_dir() {
            collect_documents(path, &mut found);
        } else {
            println!(
                "Warning: Path '{}' is not a valid file or directory. Skipping.",
                path.display()
            );
        }
    }
    found.into_iter().collect()
}

fn collect_documents(dir: &Path, found: &mut BTreeSet<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory during discovery");
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            collect_documents(&path, found);
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("json") | Some("jsonld")
        ) {
            found.insert(path);
        }
    }
}

/// Runs the selected stages over `files` in fixed order, printing per-file
/// results as it goes, and returns the collected stage reports.
pub fn run_stages(
    layout: &CorpusLayout,
    files: &[PathBuf],
    selection: StageSelection,
    verbose: bool,
) -> RunSummary {
    let jsonld_files: Vec<PathBuf> = files
        .iter()
        .filter(|p| layout.is_jsonld(p))
        .cloned()
        .collect();
    let example_files: Vec<PathBuf> = files
        .iter()
        .filter(|p| layout.is_example(p))
        .cloned()
        .collect();

    let mut summary = RunSummary::default();
    if selection.syntax {
        summary.stages.push(syntax_stage(files, verbose));
    }
    if selection.structure {
        summary.stages.push(structure_stage(layout, &jsonld_files, verbose));
    }
    if selection.schema {
        let store = SchemaStore::load(layout.schemas_dir());
        tracing::info!(schemas = store.schema_count(), "schema registry loaded");
        summary
            .stages
            .push(schema_stage(layout, &example_files, &store, verbose));
    }
    if selection.context {
        summary.stages.push(context_stage(layout, &example_files, verbose));
    }
    summary
}

fn syntax_stage(files: &[PathBuf], verbose: bool) -> StageReport {
    println!("\n--- {} ---", Stage::Syntax.label());
    let mut report = StageReport::new(Stage::Syntax, files.len());
    for path in files {
        match check_syntax(path) {
            Ok(()) => {
                if verbose {
                    println!("  OK: {}", path.display());
                }
            }
            Err(e) => {
                println!("  FAIL: {} - {e}", path.display());
                report.record_error(path, e.to_string());
            }
        }
    }
    report
}

fn structure_stage(layout: &CorpusLayout, files: &[PathBuf], verbose: bool) -> StageReport {
    println!("\n--- {} ---", Stage::Structure.label());
    let mut report = StageReport::new(Stage::Structure, files.len());
    if files.is_empty() {
        println!("  no .jsonld files among the selected paths");
        return report;
    }
    for path in files {
        match check_structure(layout, path) {
            Ok(()) => {
                if verbose {
                    println!("  OK: {}", path.display());
                }
            }
            Err(e) => {
                println!("  FAIL: {} - {e}", path.display());
                report.record_error(path, e.to_string());
            }
        }
    }
    report
}

fn schema_stage(
    layout: &CorpusLayout,
    files: &[PathBuf],
    store: &SchemaStore,
    verbose: bool,
) -> StageReport {
    println!("\n--- {} ---", Stage::Schema.label());
    // Checked counts validated pairs only; skipped examples stay out of the
    // denominator.
    let mut report = StageReport::new(Stage::Schema, 0);
    if files.is_empty() {
        println!("  no example files among the selected paths");
        return report;
    }
    for path in files {
        let Some(binding) = SchemaBinding::locate(layout, path) else {
            // Skip, do not record: an example without a schema is not a defect.
            if verbose {
                println!("  SKIP: {} - no matching schema", path.display());
            }
            continue;
        };
        report.checked += 1;
        match check_schema(&binding.example, &binding.schema, store) {
            Ok(()) => {
                if verbose {
                    println!("  OK: {}", path.display());
                }
            }
            Err(e) => {
                println!("  FAIL: {} - {e}", path.display());
                report.record_error(path, e.to_string());
            }
        }
    }
    report
}

fn context_stage(layout: &CorpusLayout, files: &[PathBuf], verbose: bool) -> StageReport {
    println!("\n--- {} ---", Stage::Context.label());
    let mut report = StageReport::new(Stage::Context, files.len());
    if files.is_empty() {
        println!("  no example files among the selected paths");
        return report;
    }
    for path in files {
        match check_conformance(layout, path) {
            Ok(Conformance::Matched) => {
                if verbose {
                    println!("  OK: {}", path.display());
                }
            }
            Ok(Conformance::Unmapped { reference }) => {
                let message = format!(
                    "No expected context mapping for \"{}\"; the document expands with the declared context '{reference}'",
                    file_label(path)
                );
                if verbose {
                    println!("  WARN: {} - {message}", path.display());
                }
                report.record_warning(path, message);
            }
            Err(e) => {
                println!("  FAIL: {} - {e}", path.display());
                report.record_error(path, e.to_string());
            }
        }
    }
    report
}

fn print_summary(summary: &RunSummary) {
    println!("\n--- Summary ---");
    for report in &summary.stages {
        println!(
            "{}: {} error(s) out of {} file(s) checked",
            report.stage.label(),
            report.error_count(),
            report.checked
        );
    }
    if summary.passed() {
        println!("\nAll selected checks passed.");
    } else {
        println!("\n{} error(s) found across all checks.", summary.total_errors());
    }
}

fn file_label(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}
