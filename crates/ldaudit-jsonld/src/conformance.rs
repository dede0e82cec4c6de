//! Context conformance check.
//!
//! Examples with an entry in the layout's expected-context table must declare
//! exactly the context file the table names; the check also confirms the
//! document still expands under it. Examples without an entry cannot be held
//! to a specific context, so they pass with a warning when they expand and
//! fail when they do not.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use ldaudit_core::{load_document, CorpusLayout, DocumentError};

use crate::expand::{expand, ExpandError};
use crate::resolver::{soft_canonicalize, ContextResolver};

/// A passing conformance verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conformance {
    /// The document declares the expected context and expands under it.
    Matched,
    /// No expected context is on file for this example; the document expands
    /// with whatever it declares. Callers report this as a warning.
    Unmapped {
        /// The declared context, rendered for reporting.
        reference: String,
    },
}

/// How a mismatched declaration behaved when probed anyway.
#[derive(Debug)]
pub enum MismatchOutcome {
    /// The document expands despite declaring the wrong context.
    StillExpands,
    /// Expansion under the declared context fails too.
    ExpansionFailed(ExpandError),
}

/// Failure of the conformance check for one document.
#[derive(Error, Debug)]
pub enum ConformanceError {
    /// The file failed to load or parse.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The document declares no usable `@context`.
    #[error("Missing '@context' key in the example file")]
    MissingContext,

    /// No expected context is on file and the declared one fails to expand
    /// the document.
    #[error(
        "No expected context mapping for \"{name}\"; expansion with the declared context '{reference}' failed: {source}"
    )]
    UnmappedBroken {
        /// File name of the example.
        name: String,
        /// The declared context, rendered for reporting.
        reference: String,
        /// Why expansion failed.
        source: ExpandError,
    },

    /// The declared context is not the expected one.
    #[error("{}", mismatch_message(expected, declared, resolved.as_deref(), outcome))]
    Mismatch {
        /// Context file the expected-context table names.
        expected: PathBuf,
        /// The declared context, rendered for reporting.
        declared: String,
        /// Local file the declaration resolves to, when it resolves at all.
        resolved: Option<PathBuf>,
        /// Whether the document expands under the declared context anyway.
        outcome: MismatchOutcome,
    },

    /// The declared context is the expected one, but expansion fails under it.
    #[error("JSON-LD expansion error (with expected context path '{}'): {source}", expected.display())]
    ExpectedContextFailed {
        /// Context file the expected-context table names.
        expected: PathBuf,
        /// Why expansion failed.
        source: ExpandError,
    },
}

fn mismatch_message(
    expected: &Path,
    declared: &str,
    resolved: Option<&Path>,
    outcome: &MismatchOutcome,
) -> String {
    let resolved_text = match resolved {
        Some(path) => format!("'{}'", path.display()),
        None => "no local file".to_string(),
    };
    let mut message = format!(
        "Context path mismatch: expected '{}', but found '{declared}' (resolved to {resolved_text})",
        expected.display()
    );
    match outcome {
        MismatchOutcome::StillExpands => {
            message.push_str("; the document still expands with the declared context");
        }
        MismatchOutcome::ExpansionFailed(err) => {
            message.push_str(&format!(
                "; expansion with the declared context also failed: {err}"
            ));
        }
    }
    message
}

/// Checks the document at `path` against the layout's expected-context table.
pub fn check_conformance(
    layout: &CorpusLayout,
    path: &Path,
) -> Result<Conformance, ConformanceError> {
    let document = load_document(path)?;
    let declared = document.get("@context").filter(|v| !is_empty_context(v));
    let Some(declared) = declared else {
        return Err(ConformanceError::MissingContext);
    };

    let resolver = ContextResolver::new(layout);
    let reference = render_reference(declared);

    let Some(expected) = layout.expected_context(path) else {
        // Not in the table: probe with whatever the document declares.
        return match expand(&document, path, &resolver) {
            Ok(()) => Ok(Conformance::Unmapped { reference }),
            Err(source) => Err(ConformanceError::UnmappedBroken {
                name: file_name(path),
                reference,
                source,
            }),
        };
    };
    let expected = soft_canonicalize(expected);

    let resolved = declared
        .as_str()
        .and_then(|declared_str| resolver.normalize(declared_str, path));
    if resolved.as_deref() != Some(expected.as_path()) {
        let outcome = match expand(&document, path, &resolver) {
            Ok(()) => MismatchOutcome::StillExpands,
            Err(err) => MismatchOutcome::ExpansionFailed(err),
        };
        return Err(ConformanceError::Mismatch {
            expected,
            declared: reference,
            resolved,
            outcome,
        });
    }

    match expand(&document, path, &resolver) {
        Ok(()) => Ok(Conformance::Matched),
        Err(source) => Err(ConformanceError::ExpectedContextFailed { expected, source }),
    }
}

/// A context declaration that is present but carries nothing: `null`, the
/// empty string, an empty array, or an empty object.
fn is_empty_context(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        _ => false,
    }
}

fn render_reference(declared: &Value) -> String {
    match declared {
        Value::String(reference) => reference.clone(),
        other => other.to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
