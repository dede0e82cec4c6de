//! Document loading with located syntax errors.
//!
//! Every check stage reads corpus files through [`load_document`] so that a
//! file that is missing, unreadable, or not well-formed JSON fails the same
//! way everywhere, with the parse position preserved.

use std::path::{Path, PathBuf};
use std::{fs, io};

use serde_json::Value;
use thiserror::Error;

/// Failure to produce a JSON value from a file on disk.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file does not exist.
    #[error("File not found")]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("Error reading file: {reason}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Operating-system error rendered as text.
        reason: String,
    },

    /// The file content is not well-formed JSON.
    #[error("Syntax error: {message} (line {line}, column {column})")]
    Syntax {
        /// Path that was being parsed.
        path: PathBuf,
        /// 1-based line of the first offending byte.
        line: usize,
        /// 1-based column of the first offending byte.
        column: usize,
        /// Parser message with the position suffix removed.
        message: String,
    },
}

impl DocumentError {
    /// Path of the document the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            DocumentError::NotFound { path }
            | DocumentError::Io { path, .. }
            | DocumentError::Syntax { path, .. } => path,
        }
    }
}

/// Reads and parses one JSON document.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let text = fs::read_to_string(path).map_err(|e| read_error(path, e))?;
    serde_json::from_str(&text).map_err(|e| syntax_error(path, e))
}

/// Checks that a file parses as JSON, discarding the value.
pub fn check_syntax(path: &Path) -> Result<(), DocumentError> {
    load_document(path).map(|_| ())
}

fn read_error(path: &Path, err: io::Error) -> DocumentError {
    if err.kind() == io::ErrorKind::NotFound {
        DocumentError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        DocumentError::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

fn syntax_error(path: &Path, err: serde_json::Error) -> DocumentError {
    // serde_json renders the position into the message; strip it so the
    // located form stays canonical.
    let mut message = err.to_string();
    if let Some(at) = message.rfind(" at line ") {
        message.truncate(at);
    }
    DocumentError::Syntax {
        path: path.to_path_buf(),
        line: err.line(),
        column: err.column(),
        message,
    }
}
