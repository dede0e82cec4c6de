//! Context term processing.
//!
//! A JSON-LD context turns short term names into IRIs. This module parses
//! context values (inline objects, references to context documents, arrays of
//! either) into a [`TermMap`], the active set of term definitions that
//! expansion consults. Parsing is strict about declaration mistakes: wrong
//! value types, redefined keywords, terms that cannot be given an IRI, and
//! cyclic references between context documents are all errors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::resolver::ResolveError;

/// The JSON-LD keywords recognized by context processing and expansion.
pub const KEYWORDS: &[&str] = &[
    "@base",
    "@container",
    "@context",
    "@direction",
    "@graph",
    "@id",
    "@import",
    "@included",
    "@index",
    "@json",
    "@language",
    "@list",
    "@nest",
    "@none",
    "@prefix",
    "@propagate",
    "@protected",
    "@reverse",
    "@set",
    "@type",
    "@value",
    "@version",
    "@vocab",
];

/// Whether `candidate` is one of the recognized JSON-LD keywords.
pub fn is_keyword(candidate: &str) -> bool {
    KEYWORDS.contains(&candidate)
}

/// Whether `candidate` looks like a keyword without being one: `@` followed
/// by letters. Such entries are reserved and silently ignored.
pub fn has_keyword_form(candidate: &str) -> bool {
    candidate
        .strip_prefix('@')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphabetic()))
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Loads the context document a string reference points at.
///
/// The resolver in this crate implements the trait against a corpus on disk;
/// tests substitute in-memory loaders.
pub trait ContextLoader {
    /// Resolves `reference` (as declared in the document at `referrer`) and
    /// returns the loaded context document.
    fn load_context(&self, reference: &str, referrer: &Path) -> Result<LoadedContext, ContextError>;
}

/// A context document produced by a [`ContextLoader`].
#[derive(Debug, Clone)]
pub struct LoadedContext {
    /// Local identity of the loaded document, used for cycle detection.
    pub path: PathBuf,
    /// The parsed document. Its `@context` entry holds the context proper.
    pub document: Value,
}

/// Container mappings a term definition may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// `@graph` containers.
    Graph,
    /// `@id` maps.
    Id,
    /// `@index` maps.
    Index,
    /// `@language` maps.
    Language,
    /// Ordered lists.
    List,
    /// Unordered sets.
    Set,
    /// `@type` maps.
    Type,
}

impl Container {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "@graph" => Some(Container::Graph),
            "@id" => Some(Container::Id),
            "@index" => Some(Container::Index),
            "@language" => Some(Container::Language),
            "@list" => Some(Container::List),
            "@set" => Some(Container::Set),
            "@type" => Some(Container::Type),
            _ => None,
        }
    }
}

/// A term defined through an expanded (object) definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtendedTerm {
    /// IRI the term maps to. Absent for pure `@reverse` definitions.
    pub iri: Option<String>,
    /// Type coercion declared with `@type`.
    pub type_mapping: Option<String>,
    /// Container mappings declared with `@container`.
    pub containers: Vec<Container>,
    /// Whether the definition used `@reverse`.
    pub reverse: bool,
    /// Whether `@prefix: true` was declared.
    pub prefix: bool,
    /// Term-scoped context, stored unprocessed. It is validated when the
    /// definition is parsed and applied again wherever the term is used.
    pub scoped: Option<Value>,
}

/// How one term expands.
#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    /// The term is an alias for a keyword, e.g. `"id": "@id"`.
    KeywordAlias(String),
    /// The term maps to an IRI ending in `#` or `/` and is usable as a
    /// compact-IRI prefix.
    Prefix(String),
    /// The term maps to an IRI.
    Simple(String),
    /// The term carries an expanded definition.
    Extended(ExtendedTerm),
}

/// The active set of term definitions.
///
/// A `None` entry records a term explicitly detached with `"term": null`;
/// documents using such a term have the whole subtree dropped rather than
/// expanded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermMap {
    terms: BTreeMap<String, Option<TermKind>>,
    vocab: Option<String>,
    base: Option<String>,
}

impl TermMap {
    /// An empty map: no terms, no vocabulary, no base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of term entries, detached entries included.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether no terms are defined.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The default vocabulary set with `@vocab`, when one is active.
    pub fn vocab(&self) -> Option<&str> {
        self.vocab.as_deref()
    }

    /// The base IRI set with `@base`, when one is active.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// The live definition of `term`, if it has one. Detached terms and
    /// undefined terms both yield `None`.
    pub fn definition(&self, term: &str) -> Option<&TermKind> {
        match self.terms.get(term) {
            Some(Some(kind)) => Some(kind),
            _ => None,
        }
    }

    /// Whether `term` was explicitly detached with a `null` definition.
    pub fn is_detached(&self, term: &str) -> bool {
        matches!(self.terms.get(term), Some(None))
    }

    /// Resolves `key` to the keyword it stands for: either `key` itself or
    /// the keyword a [`TermKind::KeywordAlias`] points at.
    pub fn keyword_for<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        if is_keyword(key) {
            return Some(key);
        }
        match self.definition(key) {
            Some(TermKind::KeywordAlias(keyword)) => Some(keyword.as_str()),
            _ => None,
        }
    }

    /// Whether a document key expands to an IRI under this map: it is defined
    /// here, contains a colon, or a default vocabulary is active. Detached
    /// terms never expand.
    pub fn expands(&self, key: &str) -> bool {
        match self.terms.get(key) {
            Some(Some(_)) => true,
            Some(None) => false,
            None => key.contains(':') || self.vocab.is_some(),
        }
    }

    /// The unprocessed scoped context attached to `key`, when its definition
    /// declares one.
    pub fn scoped_context(&self, key: &str) -> Option<&Value> {
        match self.definition(key) {
            Some(TermKind::Extended(ext)) => ext.scoped.as_ref(),
            _ => None,
        }
    }
}

/// Failure while processing a context value.
#[derive(Error, Debug)]
pub enum ContextError {
    /// A referenced context document could not be resolved or loaded.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A loaded context document has no `@context` entry.
    #[error("context document {} has no \"@context\" entry", path.display())]
    MissingContextEntry {
        /// The document that was loaded.
        path: PathBuf,
    },

    /// Context documents reference each other in a cycle.
    #[error("cyclic context reference through {}", path.display())]
    CyclicReference {
        /// The document seen for the second time.
        path: PathBuf,
    },

    /// The context value is of a type a context can never be.
    #[error("a context must be null, a string, an object, or an array, found {found}")]
    InvalidContextValue {
        /// Rendered type of the offending value.
        found: &'static str,
    },

    /// A term definition attempts to redefine a keyword.
    #[error("the keyword \"{keyword}\" cannot be redefined")]
    KeywordRedefinition {
        /// The keyword being redefined.
        keyword: String,
    },

    /// A term definition is malformed.
    #[error("invalid definition for term \"{term}\": {reason}")]
    InvalidTermDefinition {
        /// The term being defined.
        term: String,
        /// What was wrong with the definition.
        reason: String,
    },

    /// A context-level keyword entry has a value of the wrong type.
    #[error("invalid \"{keyword}\" value: expected {expected}, found {found}")]
    InvalidKeywordValue {
        /// The keyword whose entry is malformed.
        keyword: &'static str,
        /// What the keyword accepts.
        expected: &'static str,
        /// Rendered type of the offending value.
        found: &'static str,
    },
}

/// Processes one context value against the active term map, returning the
/// resulting map.
///
/// `referrer` is the document the context value appeared in; string
/// references resolve relative to it. `visited` carries the chain of context
/// documents currently being processed, for cycle detection; expansion seeds
/// it empty.
pub fn process_context(
    active: &TermMap,
    local: &Value,
    referrer: &Path,
    loader: &dyn ContextLoader,
    visited: &mut Vec<PathBuf>,
) -> Result<TermMap, ContextError> {
    match local {
        // null resets to the initial, empty context.
        Value::Null => Ok(TermMap::new()),
        Value::String(reference) => {
            let loaded = loader.load_context(reference, referrer)?;
            if visited.contains(&loaded.path) {
                return Err(ContextError::CyclicReference { path: loaded.path });
            }
            let inner = loaded
                .document
                .get("@context")
                .ok_or(ContextError::MissingContextEntry {
                    path: loaded.path.clone(),
                })?;
            visited.push(loaded.path.clone());
            let result = process_context(active, inner, &loaded.path, loader, visited);
            visited.pop();
            result
        }
        Value::Array(entries) => {
            let mut current = active.clone();
            for entry in entries {
                current = process_context(&current, entry, referrer, loader, visited)?;
            }
            Ok(current)
        }
        Value::Object(entries) => apply_object(active, entries, referrer, loader, visited),
        other => Err(ContextError::InvalidContextValue {
            found: value_type_name(other),
        }),
    }
}

fn apply_object(
    active: &TermMap,
    entries: &serde_json::Map<String, Value>,
    referrer: &Path,
    loader: &dyn ContextLoader,
    visited: &mut Vec<PathBuf>,
) -> Result<TermMap, ContextError> {
    let mut next = active.clone();

    // First pass: collect string-valued prefix declarations, so compact IRIs
    // in the same object resolve no matter which key the parser meets first.
    for (key, value) in entries {
        if key.starts_with('@') {
            continue;
        }
        if let Value::String(iri) = value {
            if is_prefix_iri(iri) {
                next.terms
                    .insert(key.clone(), Some(TermKind::Prefix(iri.clone())));
            }
        }
    }

    // Keyword entries next, so @vocab is in force before terms that need it.
    for (key, value) in entries {
        if !key.starts_with('@') {
            continue;
        }
        apply_context_keyword(&mut next, key, value)?;
    }

    for (key, value) in entries {
        if key.starts_with('@') {
            continue;
        }
        define_term(&mut next, key, value, referrer, loader, visited)?;
    }

    Ok(next)
}

fn apply_context_keyword(next: &mut TermMap, key: &str, value: &Value) -> Result<(), ContextError> {
    match key {
        "@vocab" => match value {
            Value::Null => next.vocab = None,
            Value::String(iri) => next.vocab = Some(iri.clone()),
            other => {
                return Err(ContextError::InvalidKeywordValue {
                    keyword: "@vocab",
                    expected: "a string or null",
                    found: value_type_name(other),
                })
            }
        },
        "@base" => match value {
            Value::Null => next.base = None,
            Value::String(iri) => next.base = Some(iri.clone()),
            other => {
                return Err(ContextError::InvalidKeywordValue {
                    keyword: "@base",
                    expected: "a string or null",
                    found: value_type_name(other),
                })
            }
        },
        "@language" => {
            if !matches!(value, Value::Null | Value::String(_)) {
                return Err(ContextError::InvalidKeywordValue {
                    keyword: "@language",
                    expected: "a string or null",
                    found: value_type_name(value),
                });
            }
        }
        "@direction" => {
            let valid = matches!(value, Value::Null)
                || matches!(value.as_str(), Some("ltr") | Some("rtl"));
            if !valid {
                return Err(ContextError::InvalidKeywordValue {
                    keyword: "@direction",
                    expected: "\"ltr\", \"rtl\", or null",
                    found: value_type_name(value),
                });
            }
        }
        "@version" => {
            if value.as_f64() != Some(1.1) {
                return Err(ContextError::InvalidKeywordValue {
                    keyword: "@version",
                    expected: "the number 1.1",
                    found: value_type_name(value),
                });
            }
        }
        "@propagate" | "@protected" => {
            if !value.is_boolean() {
                return Err(ContextError::InvalidKeywordValue {
                    keyword: if key == "@propagate" {
                        "@propagate"
                    } else {
                        "@protected"
                    },
                    expected: "a boolean",
                    found: value_type_name(value),
                });
            }
        }
        "@import" => {
            if !value.is_string() {
                return Err(ContextError::InvalidKeywordValue {
                    keyword: "@import",
                    expected: "a string",
                    found: value_type_name(value),
                });
            }
        }
        // A context-level "@type" entry sets type-coercion defaults and must
        // be an object.
        "@type" => {
            if !value.is_object() {
                return Err(ContextError::InvalidKeywordValue {
                    keyword: "@type",
                    expected: "an object",
                    found: value_type_name(value),
                });
            }
        }
        other if is_keyword(other) => {
            return Err(ContextError::KeywordRedefinition {
                keyword: other.to_string(),
            })
        }
        // Keyword-form entries that are not keywords are reserved; ignore.
        _ => {}
    }
    Ok(())
}

fn define_term(
    next: &mut TermMap,
    term: &str,
    value: &Value,
    referrer: &Path,
    loader: &dyn ContextLoader,
    visited: &mut Vec<PathBuf>,
) -> Result<(), ContextError> {
    if term.is_empty() {
        return Err(ContextError::InvalidTermDefinition {
            term: String::new(),
            reason: "term is the empty string".to_string(),
        });
    }
    match value {
        Value::Null => {
            next.terms.insert(term.to_string(), None);
            Ok(())
        }
        Value::String(target) => define_string_term(next, term, target),
        Value::Object(entries) => define_extended_term(next, term, entries, referrer, loader, visited),
        other => Err(ContextError::InvalidTermDefinition {
            term: term.to_string(),
            reason: format!(
                "expected a string, an object, or null, found {}",
                value_type_name(other)
            ),
        }),
    }
}

fn define_string_term(next: &mut TermMap, term: &str, target: &str) -> Result<(), ContextError> {
    if target.starts_with('@') {
        if target == "@context" {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: "\"@context\" cannot be aliased".to_string(),
            });
        }
        if is_keyword(target) {
            next.terms.insert(
                term.to_string(),
                Some(TermKind::KeywordAlias(target.to_string())),
            );
        }
        // A keyword-form target that is not a keyword leaves the term
        // undefined.
        return Ok(());
    }
    if is_prefix_iri(target) {
        next.terms
            .insert(term.to_string(), Some(TermKind::Prefix(target.to_string())));
        return Ok(());
    }
    let iri = expand_candidate_iri(next, term, target)?;
    next.terms.insert(term.to_string(), Some(TermKind::Simple(iri)));
    Ok(())
}

fn define_extended_term(
    next: &mut TermMap,
    term: &str,
    entries: &serde_json::Map<String, Value>,
    referrer: &Path,
    loader: &dyn ContextLoader,
    visited: &mut Vec<PathBuf>,
) -> Result<(), ContextError> {
    const ALLOWED: &[&str] = &[
        "@container",
        "@context",
        "@direction",
        "@id",
        "@index",
        "@language",
        "@nest",
        "@prefix",
        "@protected",
        "@reverse",
        "@type",
    ];
    for key in entries.keys() {
        if !ALLOWED.contains(&key.as_str()) {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: format!("unexpected entry \"{key}\""),
            });
        }
    }

    let mut ext = ExtendedTerm::default();

    if let Some(reverse) = entries.get("@reverse") {
        let Some(target) = reverse.as_str() else {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: format!(
                    "\"@reverse\" must be a string, found {}",
                    value_type_name(reverse)
                ),
            });
        };
        if entries.contains_key("@id") || entries.contains_key("@nest") {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: "\"@reverse\" cannot be combined with \"@id\" or \"@nest\"".to_string(),
            });
        }
        ext.reverse = true;
        ext.iri = Some(resolve_compact(next, target));
    }

    match entries.get("@id") {
        Some(Value::Null) => {
            // "@id": null detaches the term like a null definition.
            next.terms.insert(term.to_string(), None);
            return Ok(());
        }
        Some(Value::String(target)) => {
            if target == "@context" {
                return Err(ContextError::InvalidTermDefinition {
                    term: term.to_string(),
                    reason: "\"@context\" cannot be aliased".to_string(),
                });
            }
            if target.starts_with('@') {
                if is_keyword(target) {
                    next.terms.insert(
                        term.to_string(),
                        Some(TermKind::KeywordAlias(target.to_string())),
                    );
                }
                return Ok(());
            }
            ext.iri = Some(resolve_compact(next, target));
        }
        Some(other) => {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: format!(
                    "\"@id\" must be a string or null, found {}",
                    value_type_name(other)
                ),
            });
        }
        None => {
            if ext.iri.is_none() {
                ext.iri = Some(expand_candidate_iri(next, term, term)?);
            }
        }
    }

    if let Some(type_value) = entries.get("@type") {
        let Some(mapping) = type_value.as_str() else {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: format!(
                    "\"@type\" must be a string, found {}",
                    value_type_name(type_value)
                ),
            });
        };
        let keyword_typed = matches!(mapping, "@id" | "@vocab" | "@json" | "@none");
        if mapping.starts_with('@') && !keyword_typed {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: format!("\"{mapping}\" is not a valid type mapping"),
            });
        }
        if !keyword_typed && !mapping.contains(':') && next.vocab.is_none() {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: format!("type mapping \"{mapping}\" is not an IRI and no @vocab is set"),
            });
        }
        ext.type_mapping = Some(if keyword_typed {
            mapping.to_string()
        } else {
            resolve_compact(next, mapping)
        });
    }

    if let Some(container) = entries.get("@container") {
        ext.containers = parse_containers(term, container)?;
    }

    if let Some(language) = entries.get("@language") {
        if !matches!(language, Value::Null | Value::String(_)) {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: format!(
                    "\"@language\" must be a string or null, found {}",
                    value_type_name(language)
                ),
            });
        }
    }

    if let Some(direction) = entries.get("@direction") {
        let valid = matches!(direction, Value::Null)
            || matches!(direction.as_str(), Some("ltr") | Some("rtl"));
        if !valid {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: "\"@direction\" must be \"ltr\", \"rtl\", or null".to_string(),
            });
        }
    }

    if let Some(prefix) = entries.get("@prefix") {
        match prefix {
            Value::Bool(flag) => ext.prefix = *flag,
            other => {
                return Err(ContextError::InvalidTermDefinition {
                    term: term.to_string(),
                    reason: format!(
                        "\"@prefix\" must be a boolean, found {}",
                        value_type_name(other)
                    ),
                });
            }
        }
    }

    if let Some(protected) = entries.get("@protected") {
        if !protected.is_boolean() {
            return Err(ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: format!(
                    "\"@protected\" must be a boolean, found {}",
                    value_type_name(protected)
                ),
            });
        }
    }

    for key in ["@index", "@nest"] {
        if let Some(entry) = entries.get(key) {
            if !entry.is_string() {
                return Err(ContextError::InvalidTermDefinition {
                    term: term.to_string(),
                    reason: format!(
                        "\"{key}\" must be a string, found {}",
                        value_type_name(entry)
                    ),
                });
            }
        }
    }

    if let Some(scoped) = entries.get("@context") {
        // Scoped contexts are validated when declared, not merely when used,
        // so a broken one fails the document even if no node exercises it.
        let probe = next.clone();
        process_context(&probe, scoped, referrer, loader, visited).map_err(|e| {
            ContextError::InvalidTermDefinition {
                term: term.to_string(),
                reason: format!("invalid scoped context: {e}"),
            }
        })?;
        ext.scoped = Some(scoped.clone());
    }

    next.terms
        .insert(term.to_string(), Some(TermKind::Extended(ext)));
    Ok(())
}

fn parse_containers(term: &str, value: &Value) -> Result<Vec<Container>, ContextError> {
    let entries: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };
    let mut containers = Vec::with_capacity(entries.len());
    for entry in entries {
        let parsed = entry.as_str().and_then(Container::from_keyword);
        match parsed {
            Some(container) => containers.push(container),
            None => {
                return Err(ContextError::InvalidTermDefinition {
                    term: term.to_string(),
                    reason: format!("invalid \"@container\" entry {entry}"),
                });
            }
        }
    }
    Ok(containers)
}

/// An IRI usable as a compact-IRI prefix: it has a scheme-like colon and ends
/// at a fragment or path boundary.
fn is_prefix_iri(candidate: &str) -> bool {
    candidate.contains(':') && (candidate.ends_with('#') || candidate.ends_with('/'))
}

fn resolve_compact(map: &TermMap, candidate: &str) -> String {
    if let Some((prefix, suffix)) = candidate.split_once(':') {
        if !suffix.starts_with("//") {
            if let Some(TermKind::Prefix(base)) = map.definition(prefix) {
                return format!("{base}{suffix}");
            }
        }
    }
    candidate.to_string()
}

fn expand_candidate_iri(map: &TermMap, term: &str, candidate: &str) -> Result<String, ContextError> {
    if candidate.contains(':') {
        return Ok(resolve_compact(map, candidate));
    }
    match map.vocab() {
        Some(vocab) => Ok(format!("{vocab}{candidate}")),
        None => Err(ContextError::InvalidTermDefinition {
            term: term.to_string(),
            reason: format!("\"{candidate}\" is not an IRI and no @vocab is set"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// In-memory loader keyed by the literal reference string.
    struct MapLoader {
        contexts: BTreeMap<String, Value>,
    }

    impl MapLoader {
        fn new(entries: &[(&str, Value)]) -> Self {
            Self {
                contexts: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            }
        }

        fn empty() -> Self {
            Self {
                contexts: BTreeMap::new(),
            }
        }
    }

    impl ContextLoader for MapLoader {
        fn load_context(
            &self,
            reference: &str,
            _referrer: &Path,
        ) -> Result<LoadedContext, ContextError> {
            self.contexts
                .get(reference)
                .cloned()
                .map(|document| LoadedContext {
                    path: PathBuf::from(reference),
                    document,
                })
                .ok_or_else(|| {
                    ContextError::Resolve(ResolveError::Unresolvable(reference.to_string()))
                })
        }
    }

    fn process(value: Value) -> Result<TermMap, ContextError> {
        process_with(value, &MapLoader::empty())
    }

    fn process_with(value: Value, loader: &MapLoader) -> Result<TermMap, ContextError> {
        process_context(
            &TermMap::new(),
            &value,
            Path::new("/corpus/doc.jsonld"),
            loader,
            &mut Vec::new(),
        )
    }

    #[test]
    fn simple_terms_define_and_expand() {
        let map = process(json!({
            "name": "http://schema.org/name",
            "skill": {"@id": "http://schema.org/skill"}
        }))
        .unwrap();
        assert!(map.expands("name"));
        assert!(map.expands("skill"));
        assert!(!map.expands("unrelated"));
        assert_eq!(
            map.definition("name"),
            Some(&TermKind::Simple("http://schema.org/name".to_string()))
        );
    }

    #[test]
    fn vocab_makes_unknown_terms_expand() {
        let map = process(json!({"@vocab": "http://schema.org/"})).unwrap();
        assert!(map.expands("anything"));
        assert_eq!(map.vocab(), Some("http://schema.org/"));
    }

    #[test]
    fn colon_keys_expand_without_definitions() {
        let map = process(json!({})).unwrap();
        assert!(map.expands("schema:name"));
        assert!(!map.expands("name"));
    }

    #[test]
    fn prefix_declarations_are_classified() {
        let map = process(json!({
            "schema": "http://schema.org/",
            "rdf": "http://www.w3.org/1999/02/22-rdf-syntax-ns#"
        }))
        .unwrap();
        assert!(matches!(
            map.definition("schema"),
            Some(TermKind::Prefix(iri)) if iri == "http://schema.org/"
        ));
        assert!(matches!(map.definition("rdf"), Some(TermKind::Prefix(_))));
    }

    #[test]
    fn compact_iris_resolve_against_sibling_prefixes() {
        // "name" sorts before "zschema"; the two-pass parse must still see
        // the prefix when resolving it.
        let map = process(json!({
            "name": "zschema:name",
            "zschema": "http://schema.org/"
        }))
        .unwrap();
        assert_eq!(
            map.definition("name"),
            Some(&TermKind::Simple("http://schema.org/name".to_string()))
        );
    }

    #[test]
    fn keyword_aliases_resolve() {
        let map = process(json!({"id": "@id", "type": "@type"})).unwrap();
        assert_eq!(map.keyword_for("id"), Some("@id"));
        assert_eq!(map.keyword_for("type"), Some("@type"));
        assert_eq!(map.keyword_for("@value"), Some("@value"));
        assert_eq!(map.keyword_for("name"), None);
    }

    #[test]
    fn aliasing_context_is_rejected() {
        let err = process(json!({"ctx": "@context"})).unwrap_err();
        assert!(matches!(err, ContextError::InvalidTermDefinition { .. }));
    }

    #[test]
    fn keyword_redefinition_is_rejected() {
        let err = process(json!({"@id": "http://example.org/id"})).unwrap_err();
        match err {
            ContextError::KeywordRedefinition { keyword } => assert_eq!(keyword, "@id"),
            other => panic!("expected keyword redefinition, got {other:?}"),
        }
    }

    #[test]
    fn reserved_keyword_form_entries_are_ignored() {
        let map = process(json!({"@futureKeyword": "x", "name": "http://s/name"})).unwrap();
        assert!(map.expands("name"));
        assert!(map.definition("@futureKeyword").is_none());
    }

    #[test]
    fn null_definition_detaches_a_term() {
        let map = process(json!({"name": null})).unwrap();
        assert!(map.is_detached("name"));
        assert!(!map.expands("name"));
    }

    #[test]
    fn id_null_detaches_like_a_null_definition() {
        let map = process(json!({"name": {"@id": null}})).unwrap();
        assert!(map.is_detached("name"));
    }

    #[test]
    fn scalar_context_value_is_rejected() {
        let err = process(json!(17)).unwrap_err();
        assert!(matches!(
            err,
            ContextError::InvalidContextValue { found: "a number" }
        ));
    }

    #[test]
    fn array_folds_left_and_null_resets() {
        let map = process(json!([{"name": "http://s/name"}, null])).unwrap();
        assert!(map.is_empty());
        let map = process(json!([{"a": "http://s/a"}, {"b": "http://s/b"}])).unwrap();
        assert!(map.expands("a"));
        assert!(map.expands("b"));
    }

    #[test]
    fn term_without_iri_or_vocab_is_rejected() {
        let err = process(json!({"name": "fullName"})).unwrap_err();
        assert!(matches!(err, ContextError::InvalidTermDefinition { .. }));
        // With a vocabulary the same definition becomes legal.
        let map = process(json!({"@vocab": "http://s/", "name": "fullName"})).unwrap();
        assert_eq!(
            map.definition("name"),
            Some(&TermKind::Simple("http://s/fullName".to_string()))
        );
    }

    #[test]
    fn extended_definitions_parse_containers() {
        let map = process(json!({
            "tags": {"@id": "http://s/tags", "@container": "@list"},
            "byLang": {"@id": "http://s/label", "@container": ["@language", "@set"]}
        }))
        .unwrap();
        match map.definition("tags") {
            Some(TermKind::Extended(ext)) => assert_eq!(ext.containers, vec![Container::List]),
            other => panic!("expected extended term, got {other:?}"),
        }
        match map.definition("byLang") {
            Some(TermKind::Extended(ext)) => {
                assert_eq!(ext.containers, vec![Container::Language, Container::Set]);
            }
            other => panic!("expected extended term, got {other:?}"),
        }
    }

    #[test]
    fn unknown_container_is_rejected() {
        let err = process(json!({"tags": {"@id": "http://s/t", "@container": "@bag"}})).unwrap_err();
        assert!(matches!(err, ContextError::InvalidTermDefinition { .. }));
    }

    #[test]
    fn unexpected_definition_entry_is_rejected() {
        let err = process(json!({"name": {"@id": "http://s/n", "comment": "x"}})).unwrap_err();
        match err {
            ContextError::InvalidTermDefinition { term, reason } => {
                assert_eq!(term, "name");
                assert!(reason.contains("comment"), "got {reason:?}");
            }
            other => panic!("expected invalid term definition, got {other:?}"),
        }
    }

    #[test]
    fn type_mapping_keywords_and_iris_are_accepted() {
        let map = process(json!({
            "homepage": {"@id": "http://s/home", "@type": "@id"},
            "payload": {"@id": "http://s/payload", "@type": "@json"},
            "when": {"@id": "http://s/when", "@type": "http://www.w3.org/2001/XMLSchema#dateTime"}
        }))
        .unwrap();
        match map.definition("homepage") {
            Some(TermKind::Extended(ext)) => assert_eq!(ext.type_mapping.as_deref(), Some("@id")),
            other => panic!("expected extended term, got {other:?}"),
        }
    }

    #[test]
    fn non_string_type_mapping_is_rejected() {
        let err = process(json!({"when": {"@id": "http://s/when", "@type": 7}})).unwrap_err();
        assert!(matches!(err, ContextError::InvalidTermDefinition { .. }));
    }

    #[test]
    fn reverse_cannot_combine_with_id() {
        let err = process(json!({
            "knownBy": {"@reverse": "http://s/knows", "@id": "http://s/knownBy"}
        }))
        .unwrap_err();
        assert!(matches!(err, ContextError::InvalidTermDefinition { .. }));
    }

    #[test]
    fn version_must_be_the_number() {
        assert!(process(json!({"@version": 1.1})).is_ok());
        let err = process(json!({"@version": "1.1"})).unwrap_err();
        assert!(matches!(
            err,
            ContextError::InvalidKeywordValue {
                keyword: "@version",
                ..
            }
        ));
    }

    #[test]
    fn vocab_must_be_string_or_null() {
        let err = process(json!({"@vocab": 5})).unwrap_err();
        assert!(matches!(
            err,
            ContextError::InvalidKeywordValue {
                keyword: "@vocab",
                ..
            }
        ));
        assert!(process(json!({"@vocab": null})).is_ok());
    }

    #[test]
    fn referenced_context_documents_load_and_apply() {
        let loader = MapLoader::new(&[(
            "shared.jsonld",
            json!({"@context": {"name": "http://s/name"}}),
        )]);
        let map = process_with(json!("shared.jsonld"), &loader).unwrap();
        assert!(map.expands("name"));
    }

    #[test]
    fn referenced_document_without_context_entry_fails() {
        let loader = MapLoader::new(&[("bare.jsonld", json!({"name": "not a context"}))]);
        let err = process_with(json!("bare.jsonld"), &loader).unwrap_err();
        assert!(matches!(err, ContextError::MissingContextEntry { .. }));
    }

    #[test]
    fn cyclic_references_are_detected() {
        let loader = MapLoader::new(&[
            ("a.jsonld", json!({"@context": "b.jsonld"})),
            ("b.jsonld", json!({"@context": "a.jsonld"})),
        ]);
        let err = process_with(json!("a.jsonld"), &loader).unwrap_err();
        assert!(matches!(err, ContextError::CyclicReference { .. }));
    }

    #[test]
    fn sequential_repeats_are_not_cycles() {
        let loader = MapLoader::new(&[(
            "shared.jsonld",
            json!({"@context": {"name": "http://s/name"}}),
        )]);
        let map = process_with(json!(["shared.jsonld", "shared.jsonld"]), &loader).unwrap();
        assert!(map.expands("name"));
    }

    #[test]
    fn scoped_contexts_are_validated_eagerly() {
        let err = process(json!({
            "profile": {"@id": "http://s/profile", "@context": 9}
        }))
        .unwrap_err();
        match err {
            ContextError::InvalidTermDefinition { term, reason } => {
                assert_eq!(term, "profile");
                assert!(reason.contains("scoped context"), "got {reason:?}");
            }
            other => panic!("expected invalid term definition, got {other:?}"),
        }
    }

    #[test]
    fn scoped_contexts_are_stored_for_reuse() {
        let map = process(json!({
            "profile": {
                "@id": "http://s/profile",
                "@context": {"level": "http://s/level"}
            }
        }))
        .unwrap();
        assert_eq!(
            map.scoped_context("profile"),
            Some(&json!({"level": "http://s/level"}))
        );
    }

    #[test]
    fn empty_term_is_rejected() {
        let err = process(json!({"": "http://s/x"})).unwrap_err();
        assert!(matches!(err, ContextError::InvalidTermDefinition { .. }));
    }
}
