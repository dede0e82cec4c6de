#![deny(missing_docs)]

//! # ldaudit-core — Foundational Audit Types
//!
//! Shared building blocks for the ldaudit corpus auditor: the corpus layout
//! that describes where examples, schemas, and contexts live; document loading
//! with syntax errors located by line and column; and the report model that
//! every check stage feeds its findings into.
//!
//! ## Design Principles
//!
//! - **Deterministic:** identical corpus state yields identical reports.
//!   Collections are ordered and nothing here consults clocks or randomness.
//! - **No I/O beyond document loading:** checks decide, callers print.
//! - **Typed failures:** every way a document can be bad has its own error
//!   variant carrying the evidence, not a pre-rendered string.

pub mod config;
pub mod document;
pub mod report;

// Re-export primary types at crate root for ergonomic imports.
pub use config::CorpusLayout;
pub use document::{check_syntax, load_document, DocumentError};
pub use report::{Finding, RunSummary, Severity, Stage, StageReport};
