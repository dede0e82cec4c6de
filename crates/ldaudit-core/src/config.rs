//! Corpus layout configuration.
//!
//! A corpus is a directory tree with three conventional subdirectories
//! (`examples/`, `schemas/`, `contexts/`) and naming conventions that tie an
//! example document to the schema and context it must satisfy. [`CorpusLayout`]
//! captures those conventions in one value so that every check stage classifies
//! and pairs files identically.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Directory name, under the corpus root, whose contents count as examples.
pub const EXAMPLES_DIR: &str = "examples";

/// Directory name, under the corpus root, holding JSON Schema definitions.
pub const SCHEMAS_DIR: &str = "schemas";

/// Directory name, under the corpus root, holding JSON-LD context documents.
pub const CONTEXTS_DIR: &str = "contexts";

/// File-name suffixes that mark a document as an example wherever it lives.
pub const EXAMPLE_SUFFIXES: [&str; 2] = ["_example.json", "_example.jsonld"];

/// File-name suffix that every schema file carries.
pub const SCHEMA_SUFFIX: &str = ".schema.json";

/// Remote prefix under which context documents were published before the
/// corpus moved to local context files. References carrying it are rewritten
/// into the contexts directory instead of being fetched.
pub const LEGACY_CONTEXT_PREFIX: &str =
    "https://raw.githubusercontent.com/ModelContext/skill-schema/main/contexts/";

/// Naming conventions and directory roles for one document corpus.
///
/// All derived paths are joined from the root given at construction. The
/// expected-context table maps example file names to the context file, under
/// the contexts directory, that the example must declare.
#[derive(Debug, Clone)]
pub struct CorpusLayout {
    root: PathBuf,
    examples_dir: String,
    schemas_dir: String,
    contexts_dir: String,
    example_suffixes: Vec<String>,
    schema_suffix: String,
    legacy_context_prefix: String,
    expected_contexts: BTreeMap<String, String>,
}

impl CorpusLayout {
    /// Builds the conventional layout rooted at `root`.
    ///
    /// The expected-context table starts with the three profile examples the
    /// corpus ships; [`CorpusLayout::with_context_mapping`] extends it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut expected_contexts = BTreeMap::new();
        expected_contexts.insert(
            "code_classification_example.json".to_string(),
            "code_classification_context.jsonld".to_string(),
        );
        expected_contexts.insert(
            "repo_profile_example.json".to_string(),
            "repo_profile_context.jsonld".to_string(),
        );
        expected_contexts.insert(
            "skill_profile_example.json".to_string(),
            "skill_profile_context.jsonld".to_string(),
        );
        Self {
            root: root.into(),
            examples_dir: EXAMPLES_DIR.to_string(),
            schemas_dir: SCHEMAS_DIR.to_string(),
            contexts_dir: CONTEXTS_DIR.to_string(),
            example_suffixes: EXAMPLE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            schema_suffix: SCHEMA_SUFFIX.to_string(),
            legacy_context_prefix: LEGACY_CONTEXT_PREFIX.to_string(),
            expected_contexts,
        }
    }

    /// Adds or replaces an expected-context mapping for an example file name.
    pub fn with_context_mapping(
        mut self,
        example_name: impl Into<String>,
        context_name: impl Into<String>,
    ) -> Self {
        self.expected_contexts
            .insert(example_name.into(), context_name.into());
        self
    }

    /// The corpus root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the examples directory under the root.
    pub fn examples_dir(&self) -> PathBuf {
        self.root.join(&self.examples_dir)
    }

    /// Path of the schemas directory under the root.
    pub fn schemas_dir(&self) -> PathBuf {
        self.root.join(&self.schemas_dir)
    }

    /// Path of the contexts directory under the root.
    pub fn contexts_dir(&self) -> PathBuf {
        self.root.join(&self.contexts_dir)
    }

    /// Suffix that schema files carry, `.schema.json` by convention.
    pub fn schema_suffix(&self) -> &str {
        &self.schema_suffix
    }

    /// The retired remote prefix that is rewritten into the contexts directory.
    pub fn legacy_context_prefix(&self) -> &str {
        &self.legacy_context_prefix
    }

    /// Strips the legacy remote prefix from a context reference, returning the
    /// bare context file name when the reference carries it.
    pub fn strip_legacy_prefix<'a>(&self, reference: &'a str) -> Option<&'a str> {
        reference.strip_prefix(self.legacy_context_prefix.as_str())
    }

    /// Whether `path` is an example document.
    ///
    /// A document is an example when any path component equals the examples
    /// directory name, or when its file name ends in one of the example
    /// suffixes.
    pub fn is_example(&self, path: &Path) -> bool {
        let in_examples_dir = path.components().any(
            |c| matches!(c, Component::Normal(n) if n.to_str() == Some(self.examples_dir.as_str())),
        );
        in_examples_dir
            || self.file_name(path).is_some_and(|name| {
                self.example_suffixes.iter().any(|s| name.ends_with(s.as_str()))
            })
    }

    /// Whether `path` names a JSON-LD document (`.jsonld` extension).
    pub fn is_jsonld(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("jsonld")
    }

    /// The part of an example file name before its example suffix.
    ///
    /// `code_classification_example.json` yields `code_classification`.
    /// Returns `None` when the name has no example suffix or nothing precedes
    /// it.
    pub fn example_stem<'a>(&self, path: &'a Path) -> Option<&'a str> {
        let name = self.file_name(path)?;
        self.example_suffixes
            .iter()
            .find_map(|s| name.strip_suffix(s.as_str()))
            .filter(|stem| !stem.is_empty())
    }

    /// The context file this example must declare, when its file name has an
    /// entry in the expected-context table. The returned path is not checked
    /// for existence.
    pub fn expected_context(&self, path: &Path) -> Option<PathBuf> {
        let name = self.file_name(path)?;
        let context_name = self.expected_contexts.get(name)?;
        Some(self.contexts_dir().join(context_name))
    }

    fn file_name<'a>(&self, path: &'a Path) -> Option<&'a str> {
        path.file_name().and_then(|n| n.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> CorpusLayout {
        CorpusLayout::new("/corpus")
    }

    #[test]
    fn derived_directories_join_from_root() {
        let layout = layout();
        assert_eq!(layout.examples_dir(), PathBuf::from("/corpus/examples"));
        assert_eq!(layout.schemas_dir(), PathBuf::from("/corpus/schemas"));
        assert_eq!(layout.contexts_dir(), PathBuf::from("/corpus/contexts"));
    }

    #[test]
    fn example_by_directory_component() {
        let layout = layout();
        assert!(layout.is_example(Path::new("/corpus/examples/profile.json")));
        assert!(layout.is_example(Path::new("/corpus/examples/nested/profile.json")));
        assert!(!layout.is_example(Path::new("/corpus/schemas/profile.json")));
    }

    #[test]
    fn example_by_file_name_suffix() {
        let layout = layout();
        assert!(layout.is_example(Path::new("/elsewhere/repo_profile_example.json")));
        assert!(layout.is_example(Path::new("/elsewhere/repo_profile_example.jsonld")));
        // The suffix must terminate the file name, not merely occur inside it.
        assert!(!layout.is_example(Path::new("/elsewhere/repo_example.json.bak")));
        assert!(!layout.is_example(Path::new("/elsewhere/profile.json")));
    }

    #[test]
    fn jsonld_classification_is_extension_based() {
        let layout = layout();
        assert!(layout.is_jsonld(Path::new("/corpus/contexts/a.jsonld")));
        assert!(!layout.is_jsonld(Path::new("/corpus/examples/a.json")));
        assert!(!layout.is_jsonld(Path::new("/corpus/examples/a")));
    }

    #[test]
    fn example_stem_strips_suffix() {
        let layout = layout();
        assert_eq!(
            layout.example_stem(Path::new("/x/code_classification_example.json")),
            Some("code_classification")
        );
        assert_eq!(
            layout.example_stem(Path::new("/x/skill_profile_example.jsonld")),
            Some("skill_profile")
        );
        assert_eq!(layout.example_stem(Path::new("/x/_example.json")), None);
        assert_eq!(layout.example_stem(Path::new("/x/readme.json")), None);
    }

    #[test]
    fn expected_context_for_known_examples() {
        let layout = layout();
        assert_eq!(
            layout.expected_context(Path::new("/corpus/examples/repo_profile_example.json")),
            Some(PathBuf::from("/corpus/contexts/repo_profile_context.jsonld"))
        );
        assert_eq!(
            layout.expected_context(Path::new("/corpus/examples/unknown_example.json")),
            None
        );
    }

    #[test]
    fn context_mapping_is_extensible() {
        let layout = layout().with_context_mapping("extra_example.json", "extra_context.jsonld");
        assert_eq!(
            layout.expected_context(Path::new("/corpus/examples/extra_example.json")),
            Some(PathBuf::from("/corpus/contexts/extra_context.jsonld"))
        );
    }

    #[test]
    fn legacy_prefix_strips_to_bare_name() {
        let layout = layout();
        let reference = format!("{LEGACY_CONTEXT_PREFIX}repo_profile_context.jsonld");
        assert_eq!(
            layout.strip_legacy_prefix(&reference),
            Some("repo_profile_context.jsonld")
        );
        assert_eq!(
            layout.strip_legacy_prefix("https://example.org/ctx.jsonld"),
            None
        );
    }
}
