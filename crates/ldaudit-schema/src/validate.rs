//! Schema conformance checking.
//!
//! Validates one example document against one schema file, collecting every
//! violation rather than stopping at the first. Violations carry the
//! instance path in `a->b` form alongside the raw JSON Pointer.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use ldaudit_core::{load_document, DocumentError};

use crate::store::SchemaStore;

/// A single schema violation with its location in the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer within the schema that triggered the violation.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (at path: '{}')",
            self.message,
            pointer_to_arrows(&self.instance_path)
        )
    }
}

/// All violations one validation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations, in the order the validator reported them.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner list.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema validation error: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Failure of the schema check for one example/schema pair.
#[derive(Error, Debug)]
pub enum SchemaCheckError {
    /// The example document failed to load or parse.
    #[error(transparent)]
    Example(#[from] DocumentError),

    /// The bound schema file does not exist.
    #[error("Schema file not found: {}", path.display())]
    SchemaNotFound {
        /// The schema path that was requested.
        path: PathBuf,
    },

    /// The schema file exists but could not be read or parsed.
    #[error("Syntax error in schema file {}: {reason}", path.display())]
    SchemaUnreadable {
        /// The schema file.
        path: PathBuf,
        /// What went wrong, with the parse position when there is one.
        reason: String,
    },

    /// The schema parsed but is not a usable JSON Schema.
    #[error("Invalid schema definition in {}: {reason}", path.display())]
    InvalidSchema {
        /// The schema file.
        path: PathBuf,
        /// The compiler's description of the defect.
        reason: String,
    },

    /// The example does not conform to the schema.
    #[error("{violations}")]
    Violations {
        /// The schema the example was validated against.
        schema: PathBuf,
        /// Every violation found.
        violations: ValidationViolations,
    },
}

/// Validates the example at `example` against the schema file at `schema`.
///
/// The schema file is loaded per call so that schema-side defects surface on
/// the pair that hits them; `store` supplies `$ref` resolution.
pub fn check_schema(
    example: &Path,
    schema: &Path,
    store: &SchemaStore,
) -> Result<(), SchemaCheckError> {
    let instance = load_document(example)?;
    let schema_value = load_schema(schema)?;

    let validator =
        store
            .options()
            .build(&schema_value)
            .map_err(|e| SchemaCheckError::InvalidSchema {
                path: schema.to_path_buf(),
                reason: e.to_string(),
            })?;

    let violations: Vec<Violation> = validator
        .iter_errors(&instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaCheckError::Violations {
            schema: schema.to_path_buf(),
            violations: ValidationViolations { violations },
        })
    }
}

fn load_schema(path: &Path) -> Result<Value, SchemaCheckError> {
    load_document(path).map_err(|err| match err {
        DocumentError::NotFound { path } => SchemaCheckError::SchemaNotFound { path },
        DocumentError::Syntax {
            path,
            line,
            column,
            message,
        } => SchemaCheckError::SchemaUnreadable {
            path,
            reason: format!("{message} (line {line}, column {column})"),
        },
        DocumentError::Io { path, reason } => SchemaCheckError::SchemaUnreadable { path, reason },
    })
}

/// Renders a JSON Pointer as arrow-joined segments: `/a/b/0` becomes
/// `a->b->0`, the root pointer becomes the empty string.
fn pointer_to_arrows(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join("->")
}
