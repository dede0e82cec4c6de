//! Expansion probing.
//!
//! [`expand`] walks a document the way JSON-LD expansion would and reports the
//! first structural error, without building the expanded output. The walk
//! mirrors expansion's reachability rules: keys that do not expand to an IRI
//! under the active context are dropped together with their whole subtree, so
//! mistakes inside dropped subtrees are invisible, exactly as they are to a
//! full expansion.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::context::{
    has_keyword_form, process_context, value_type_name, ContextError, ContextLoader, TermMap,
};

/// Structural failure found while probing expansion.
#[derive(Error, Debug)]
pub enum ExpandError {
    /// A context in the document failed to process.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// An `@id` entry is not a string.
    #[error("\"@id\" must be a string, found {found}")]
    InvalidId {
        /// Rendered type of the offending value.
        found: &'static str,
    },

    /// An `@type` entry is neither a string nor an array of strings.
    #[error("\"@type\" must be a string or an array of strings")]
    InvalidType,

    /// A value object is malformed.
    #[error("invalid value object: {reason}")]
    InvalidValueObject {
        /// What was wrong with the object.
        reason: String,
    },

    /// An `@language` entry is not a string.
    #[error("\"@language\" must be a string, found {found}")]
    InvalidLanguage {
        /// Rendered type of the offending value.
        found: &'static str,
    },

    /// An `@direction` entry is not `"ltr"` or `"rtl"`.
    #[error("\"@direction\" must be \"ltr\" or \"rtl\"")]
    InvalidDirection,

    /// An `@index` entry is not a string.
    #[error("\"@index\" must be a string, found {found}")]
    InvalidIndex {
        /// Rendered type of the offending value.
        found: &'static str,
    },

    /// An `@reverse` entry is not an object.
    #[error("\"@reverse\" must be an object, found {found}")]
    InvalidReverse {
        /// Rendered type of the offending value.
        found: &'static str,
    },
}

/// Probes whether `document` would survive JSON-LD expansion.
///
/// `origin` is the file the document came from; context references inside it
/// resolve relative to that path through `loader`. Returns the first error
/// expansion would raise, or `Ok` when the document expands cleanly.
pub fn expand(
    document: &Value,
    origin: &Path,
    loader: &dyn ContextLoader,
) -> Result<(), ExpandError> {
    let mut visited = Vec::new();
    expand_value(document, &TermMap::new(), origin, loader, &mut visited)
}

fn expand_value(
    value: &Value,
    active: &TermMap,
    referrer: &Path,
    loader: &dyn ContextLoader,
    visited: &mut Vec<PathBuf>,
) -> Result<(), ExpandError> {
    match value {
        Value::Array(items) => {
            for item in items {
                expand_value(item, active, referrer, loader, visited)?;
            }
            Ok(())
        }
        Value::Object(entries) => expand_node(entries, active, referrer, loader, visited),
        // Free-floating scalars expand to nothing and cannot be wrong.
        _ => Ok(()),
    }
}

fn expand_node(
    entries: &Map<String, Value>,
    active: &TermMap,
    referrer: &Path,
    loader: &dyn ContextLoader,
    visited: &mut Vec<PathBuf>,
) -> Result<(), ExpandError> {
    // A node's own context is in force for every other entry of the node.
    let node_map;
    let active = match entries.get("@context") {
        Some(local) => {
            node_map = process_context(active, local, referrer, loader, visited)?;
            &node_map
        }
        None => active,
    };

    for (key, value) in entries {
        if key == "@context" {
            continue;
        }
        if let Some(keyword) = active.keyword_for(key) {
            check_keyword(keyword, value, entries, active)?;
            if matches!(
                keyword,
                "@reverse" | "@graph" | "@included" | "@nest" | "@list" | "@set"
            ) {
                expand_value(value, active, referrer, loader, visited)?;
            }
            continue;
        }
        if has_keyword_form(key) {
            // Reserved keyword-form entries are dropped, subtree included.
            continue;
        }
        if active.definition(key).is_some() {
            match active.scoped_context(key) {
                Some(scoped) => {
                    let child = process_context(active, scoped, referrer, loader, visited)
                        .map_err(ExpandError::from)?;
                    expand_value(value, &child, referrer, loader, visited)?;
                }
                None => expand_value(value, active, referrer, loader, visited)?,
            }
        } else if active.is_detached(key) {
            // Explicitly nulled term: the subtree is dropped unvalidated.
        } else if key.contains(':') || active.vocab().is_some() {
            expand_value(value, active, referrer, loader, visited)?;
        }
        // Otherwise the key does not expand and its subtree is dropped.
    }
    Ok(())
}

fn check_keyword(
    keyword: &str,
    value: &Value,
    entries: &Map<String, Value>,
    active: &TermMap,
) -> Result<(), ExpandError> {
    match keyword {
        "@id" => {
            if !value.is_string() {
                return Err(ExpandError::InvalidId {
                    found: value_type_name(value),
                });
            }
        }
        "@type" => {
            let valid = match value {
                Value::String(_) => true,
                Value::Array(items) => items.iter().all(Value::is_string),
                _ => false,
            };
            if !valid {
                return Err(ExpandError::InvalidType);
            }
        }
        "@value" => check_value_object(value, entries, active)?,
        "@language" => {
            if !value.is_string() {
                return Err(ExpandError::InvalidLanguage {
                    found: value_type_name(value),
                });
            }
        }
        "@direction" => {
            if !matches!(value.as_str(), Some("ltr") | Some("rtl")) {
                return Err(ExpandError::InvalidDirection);
            }
        }
        "@index" => {
            if !value.is_string() {
                return Err(ExpandError::InvalidIndex {
                    found: value_type_name(value),
                });
            }
        }
        "@reverse" => {
            if !value.is_object() {
                return Err(ExpandError::InvalidReverse {
                    found: value_type_name(value),
                });
            }
        }
        _ => {}
    }
    Ok(())
}

fn check_value_object(
    value: &Value,
    entries: &Map<String, Value>,
    active: &TermMap,
) -> Result<(), ExpandError> {
    let mut has_type = false;
    let mut has_language = false;
    for key in entries.keys() {
        if key == "@context" {
            continue;
        }
        match active.keyword_for(key) {
            Some("@value") | Some("@index") | Some("@direction") => {}
            Some("@type") => has_type = true,
            Some("@language") => has_language = true,
            Some(other) => {
                return Err(ExpandError::InvalidValueObject {
                    reason: format!("entry \"{other}\" is not allowed alongside @value"),
                });
            }
            None => {
                // Expanding IRI entries are invalid here; entries that do not
                // expand would be dropped and are tolerated.
                if active.expands(key) {
                    return Err(ExpandError::InvalidValueObject {
                        reason: format!("entry \"{key}\" is not allowed alongside @value"),
                    });
                }
            }
        }
    }
    if has_type && has_language {
        return Err(ExpandError::InvalidValueObject {
            reason: "@type and @language are mutually exclusive".to_string(),
        });
    }
    if matches!(value, Value::Array(_) | Value::Object(_)) {
        let json_typed = entries.iter().any(|(k, v)| {
            active.keyword_for(k) == Some("@type") && v.as_str() == Some("@json")
        });
        if !json_typed {
            return Err(ExpandError::InvalidValueObject {
                reason: format!(
                    "@value must be a scalar unless @type is @json, found {}",
                    value_type_name(value)
                ),
            });
        }
    }
    Ok(())
}
