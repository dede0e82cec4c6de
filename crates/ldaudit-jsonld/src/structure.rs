//! JSON-LD structure check.
//!
//! Applies the expansion probe to one `.jsonld` file, resolving its context
//! references against the corpus layout.

use std::path::Path;

use thiserror::Error;

use ldaudit_core::{load_document, CorpusLayout, DocumentError};

use crate::expand::{expand, ExpandError};
use crate::resolver::ContextResolver;

/// Failure of the structure check for one document.
#[derive(Error, Debug)]
pub enum StructureError {
    /// The file failed to load or parse.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The document does not survive JSON-LD expansion.
    #[error("JSON-LD processing error: {0}")]
    Expansion(#[from] ExpandError),
}

/// Checks that the document at `path` expands cleanly as JSON-LD.
pub fn check_structure(layout: &CorpusLayout, path: &Path) -> Result<(), StructureError> {
    let document = load_document(path)?;
    let resolver = ContextResolver::new(layout);
    expand(&document, path, &resolver)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, File};
    use std::io::Write;
    use std::path::PathBuf;

    use serde_json::json;
    use tempfile::TempDir;

    fn write_json(root: &Path, relative: &str, content: &serde_json::Value) -> PathBuf {
        let path = root.join(relative);
        create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = File::create(&path).unwrap();
        f.write_all(serde_json::to_string_pretty(content).unwrap().as_bytes())
            .unwrap();
        path
    }

    #[test]
    fn documents_with_local_context_references_pass() {
        let dir = TempDir::new().unwrap();
        let layout = CorpusLayout::new(dir.path());
        write_json(
            dir.path(),
            "contexts/skill_context.jsonld",
            &json!({"@context": {"skill": "http://schema.org/skill"}}),
        );
        let doc = write_json(
            dir.path(),
            "examples/skill_example.jsonld",
            &json!({"@context": "skill_context.jsonld", "skill": "rust"}),
        );

        check_structure(&layout, &doc).unwrap();
    }

    #[test]
    fn dangling_context_references_fail() {
        let dir = TempDir::new().unwrap();
        let layout = CorpusLayout::new(dir.path());
        let doc = write_json(
            dir.path(),
            "examples/skill_example.jsonld",
            &json!({"@context": "missing_context.jsonld", "skill": "rust"}),
        );

        let err = check_structure(&layout, &doc).unwrap_err();
        let rendered = err.to_string();
        assert!(
            rendered.starts_with("JSON-LD processing error: "),
            "got {rendered:?}"
        );
        assert!(rendered.contains("missing_context.jsonld"), "got {rendered:?}");
    }

    #[test]
    fn unreadable_documents_fail_as_document_errors() {
        let dir = TempDir::new().unwrap();
        let layout = CorpusLayout::new(dir.path());
        let doc = dir.path().join("examples/absent.jsonld");

        let err = check_structure(&layout, &doc).unwrap_err();
        assert!(matches!(
            err,
            StructureError::Document(DocumentError::NotFound { .. })
        ));
    }

    #[test]
    fn inline_context_mistakes_fail() {
        let dir = TempDir::new().unwrap();
        let layout = CorpusLayout::new(dir.path());
        let doc = write_json(
            dir.path(),
            "examples/bad_example.jsonld",
            &json!({"@context": {"@id": "http://example.org/id"}}),
        );

        let err = check_structure(&layout, &doc).unwrap_err();
        assert!(err.to_string().contains("cannot be redefined"));
    }
}
