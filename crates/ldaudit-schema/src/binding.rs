//! Example-to-schema binding.
//!
//! An example file is bound to a schema purely by name: the part before the
//! example suffix, plus the schema suffix, looked up in the schemas
//! directory. `skill_profile_example.json` binds to
//! `schemas/skill_profile.schema.json`.

use std::path::{Path, PathBuf};

use ldaudit_core::CorpusLayout;

/// A resolved pairing of one example file with its schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBinding {
    /// The example document.
    pub example: PathBuf,
    /// The schema file it must conform to.
    pub schema: PathBuf,
}

impl SchemaBinding {
    /// Locates the schema bound to `example` under `layout`.
    ///
    /// Returns `None` when the example's name carries no example suffix or
    /// the derived schema file does not exist; such examples are skipped by
    /// the schema check rather than failed.
    pub fn locate(layout: &CorpusLayout, example: &Path) -> Option<Self> {
        let stem = layout.example_stem(example)?;
        let schema = layout
            .schemas_dir()
            .join(format!("{stem}{}", layout.schema_suffix()));
        if !schema.is_file() {
            tracing::debug!(
                example = %example.display(),
                schema = %schema.display(),
                "no schema on disk for example"
            );
            return None;
        }
        Some(Self {
            example: example.to_path_buf(),
            schema,
        })
    }
}
