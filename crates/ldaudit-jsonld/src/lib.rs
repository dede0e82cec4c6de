#![deny(missing_docs)]

//! # ldaudit-jsonld — Context Resolution and Expansion Probing
//!
//! JSON-LD machinery for the ldaudit corpus auditor. Context references are
//! resolved to local files through one fixed rule order, context values are
//! parsed into term maps, and documents are probed for whether expansion
//! would succeed, without materializing expanded output.
//!
//! ## Design Principles
//!
//! - **Local only:** remote contexts are never fetched. The one retired
//!   remote prefix the corpus used to publish under is rewritten into the
//!   contexts directory.
//! - **One resolver:** every place that needs a context's file identity goes
//!   through [`ContextResolver`], so resolution and conformance comparison
//!   cannot drift apart.
//! - **Expansion-faithful probing:** the walk in [`expand`] drops exactly the
//!   subtrees expansion would drop, and errors exactly where expansion would
//!   error.

pub mod conformance;
pub mod context;
pub mod expand;
pub mod resolver;
pub mod structure;

// Re-export primary types at crate root for ergonomic imports.
pub use conformance::{check_conformance, Conformance, ConformanceError, MismatchOutcome};
pub use context::{ContextError, ContextLoader, LoadedContext, TermKind, TermMap};
pub use expand::{expand, ExpandError};
pub use resolver::{ContextResolver, ResolveError, ResolvedContext};
pub use structure::{check_structure, StructureError};
