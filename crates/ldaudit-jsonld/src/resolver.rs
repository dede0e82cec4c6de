//! Context reference resolution.
//!
//! A document may declare its context as an absolute path, a path relative to
//! itself, a bare file name in the contexts directory, or a retired remote URL.
//! [`ContextResolver`] turns those spellings into one local file identity, in
//! a fixed order, so that reference resolution and conformance comparison can
//! never disagree about which file a reference means.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use url::Url;

use ldaudit_core::{load_document, CorpusLayout, DocumentError};

use crate::context::{ContextError, ContextLoader, LoadedContext};

/// Failure to resolve a context reference to a loadable local file.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No resolution rule produced an existing local file.
    #[error("context reference \"{0}\" could not be resolved to a local file")]
    Unresolvable(String),

    /// The reference is a remote URL outside the legacy prefix. Remote
    /// contexts are never fetched.
    #[error("remote context \"{0}\" is not fetched; only local context files are used")]
    RemoteNotSupported(String),

    /// The resolved file failed to load or parse.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// A context reference resolved to its file on disk.
#[derive(Debug, Clone)]
pub struct ResolvedContext {
    /// Canonical local path of the context file.
    pub path: PathBuf,
    /// `file:` URL form of the path.
    pub url: Url,
    /// The parsed context document.
    pub document: Value,
}

/// Resolves context references against one corpus layout.
///
/// Resolution tries, in order: the legacy remote prefix rewritten into the
/// contexts directory (decisive when it matches), the reference as a literal
/// existing path, the reference relative to the referring document's
/// directory, and the reference as a bare name in the contexts directory.
#[derive(Debug, Clone, Copy)]
pub struct ContextResolver<'a> {
    layout: &'a CorpusLayout,
}

impl<'a> ContextResolver<'a> {
    /// Creates a resolver over `layout`.
    pub fn new(layout: &'a CorpusLayout) -> Self {
        Self { layout }
    }

    /// Normalizes `reference` to the local path it denotes, without loading.
    ///
    /// Legacy-prefixed references always normalize into the contexts
    /// directory, whether or not the file exists there; every other rule
    /// requires an existing file. Existing paths are canonicalized so that
    /// two spellings of one file compare equal.
    pub fn normalize(&self, reference: &str, referrer: &Path) -> Option<PathBuf> {
        if let Some(name) = self.layout.strip_legacy_prefix(reference) {
            let path = soft_canonicalize(self.layout.contexts_dir().join(name));
            tracing::debug!(reference, path = %path.display(), "legacy context reference rewritten");
            return Some(path);
        }
        if let Some(path) = existing_canonical(Path::new(reference)) {
            return Some(path);
        }
        if let Some(parent) = referrer.parent() {
            if let Some(path) = existing_canonical(&parent.join(reference)) {
                return Some(path);
            }
        }
        existing_canonical(&self.layout.contexts_dir().join(reference))
    }

    /// Resolves `reference` and loads the context document it denotes.
    pub fn resolve(&self, reference: &str, referrer: &Path) -> Result<ResolvedContext, ResolveError> {
        let Some(path) = self.normalize(reference, referrer) else {
            if is_remote(reference) {
                return Err(ResolveError::RemoteNotSupported(reference.to_string()));
            }
            return Err(ResolveError::Unresolvable(reference.to_string()));
        };
        // The legacy rewrite is identity-only; the mapped file may be absent.
        if !path.is_file() {
            return Err(ResolveError::Unresolvable(reference.to_string()));
        }
        let document = load_document(&path)?;
        let url = Url::from_file_path(&path)
            .map_err(|_| ResolveError::Unresolvable(reference.to_string()))?;
        tracing::debug!(reference, path = %path.display(), "context reference resolved");
        Ok(ResolvedContext {
            path,
            url,
            document,
        })
    }
}

impl ContextLoader for ContextResolver<'_> {
    fn load_context(&self, reference: &str, referrer: &Path) -> Result<LoadedContext, ContextError> {
        let resolved = self.resolve(reference, referrer)?;
        Ok(LoadedContext {
            path: resolved.path,
            document: resolved.document,
        })
    }
}

/// Canonicalizes when the path exists, otherwise returns the path unchanged.
pub(crate) fn soft_canonicalize(path: PathBuf) -> PathBuf {
    fs::canonicalize(&path).unwrap_or(path)
}

fn existing_canonical(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        Some(soft_canonicalize(path.to_path_buf()))
    } else {
        None
    }
}

fn is_remote(reference: &str) -> bool {
    Url::parse(reference)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
