//! # Loader Errors
//!
//! A load either succeeds, fails with a [`ParseError`] (the file is not a
//! valid model, which the scanner records and moves past), or fails with any
//! other [`LoadError`] variant (the environment is broken, which aborts the
//! run). Callers match on the variant instead of catching selectively.

use std::path::PathBuf;

use thiserror::Error;

/// A syntax or structure error in a model file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Syntax error on line {line}: {message}")]
pub struct ParseError {
    /// 1-based line number the error was detected on.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

impl ParseError {
    /// Create a parse error at `line`.
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Errors returned by a [`ModelLoader`](crate::ModelLoader).
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file was read but is not a valid model. Recoverable per file.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The file could not be read. Not recoverable.
    #[error("failed to read model {path}: {source}")]
    Io {
        /// Path of the model file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Whether this error describes the model itself rather than the
    /// environment it was loaded from.
    pub fn is_parse(&self) -> bool {
        matches!(self, LoadError::Parse(_))
    }
}
