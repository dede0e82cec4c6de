#![deny(missing_docs)]

//! # ldaudit-schema — Schema Binding and Validation
//!
//! JSON Schema machinery for the ldaudit corpus auditor: a registry of every
//! schema in the corpus, the name-convention binding from example files to
//! schema files, and per-pair validation that collects every violation.
//!
//! ## Design Principles
//!
//! - **No network:** all `$ref` resolution happens against the in-memory
//!   registry; unknown URIs resolve to the permissive empty schema.
//! - **Tolerant registry, strict pairs:** a broken schema file does not stop
//!   the registry from loading, but fails exactly the example validated
//!   against it.

pub mod binding;
pub mod store;
pub mod validate;

// Re-export primary types at crate root for ergonomic imports.
pub use binding::SchemaBinding;
pub use store::SchemaStore;
pub use validate::{check_schema, SchemaCheckError, ValidationViolations, Violation};
