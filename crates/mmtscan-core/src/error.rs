//! # Error Hierarchy
//!
//! Configuration errors, built with `thiserror`. Loader errors live in
//! `mmtscan-model` next to the loader; scan-time filesystem errors are
//! reported by the CLI with path context.

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading or checking a [`ScanConfig`](crate::ScanConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for a scan configuration.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The candidate file extension is empty or contains a dot.
    #[error("invalid extension \"{0}\" (expected a non-empty suffix without dots, e.g. \"mmt\")")]
    InvalidExtension(String),

    /// No required annotations were configured.
    #[error("required_annotations must list at least one key")]
    NoRequiredAnnotations,

    /// A required annotation key is listed twice.
    #[error("required annotation \"{0}\" is listed more than once")]
    DuplicateAnnotation(String),

    /// A required annotation key is empty.
    #[error("required annotation keys must be non-empty")]
    EmptyAnnotation,
}
