//! Scan configuration.
//!
//! Every field is optional in the YAML file; the defaults reproduce the
//! standard scan: `.mmt` files under the current directory, the five required
//! annotations, and progress lines padded to 70 columns.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Metadata keys every model must carry, in the order they are checked.
pub const REQUIRED_ANNOTATIONS: [&str; 5] = ["name", "mmt_authors", "version", "desc", "display_name"];

/// Extension (without the dot) of candidate model files.
pub const DEFAULT_EXTENSION: &str = "mmt";

/// Minimum width progress lines are padded to with dots.
pub const DEFAULT_PROGRESS_WIDTH: usize = 70;

/// Configuration for a scan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory to scan when none is given on the command line.
    pub root: PathBuf,
    /// Candidate file extension, without the leading dot.
    pub extension: String,
    /// Required metadata keys, checked in order.
    pub required_annotations: Vec<String>,
    /// Progress lines are padded with dots to at least this many characters.
    pub progress_width: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            required_annotations: REQUIRED_ANNOTATIONS.iter().map(|k| k.to_string()).collect(),
            progress_width: DEFAULT_PROGRESS_WIDTH,
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a YAML file and validate it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw, path)
    }

    /// Parse a configuration from YAML text. `origin` is only used in errors.
    pub fn from_yaml(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        // An empty document means "all defaults".
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values that would make a scan meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.is_empty() || self.extension.contains('.') {
            return Err(ConfigError::InvalidExtension(self.extension.clone()));
        }
        if self.required_annotations.is_empty() {
            return Err(ConfigError::NoRequiredAnnotations);
        }
        let mut seen = HashSet::new();
        for key in &self.required_annotations {
            if key.is_empty() {
                return Err(ConfigError::EmptyAnnotation);
            }
            if !seen.insert(key.as_str()) {
                return Err(ConfigError::DuplicateAnnotation(key.clone()));
            }
        }
        Ok(())
    }
}
