//! The model-loading seam.
//!
//! Scanning code depends on [`ModelLoader`] only, so another format or a
//! stub can stand in for [`MmtLoader`].

use std::path::Path;

use crate::error::LoadError;
use crate::model::Model;
use crate::parser;

/// Loads a model from a file.
pub trait ModelLoader {
    /// Load the model at `path`.
    ///
    /// Returns [`LoadError::Parse`] when the file is not a valid model and
    /// any other variant when the file could not be loaded at all.
    fn load(&self, path: &Path) -> Result<Model, LoadError>;
}

/// Loader for `.mmt` model files.
#[derive(Debug, Clone, Copy, Default)]
pub struct MmtLoader;

impl MmtLoader {
    /// Create a loader.
    pub fn new() -> Self {
        Self
    }
}

impl ModelLoader for MmtLoader {
    fn load(&self, path: &Path) -> Result<Model, LoadError> {
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = parser::parse(&source)?;
        tracing::trace!(
            path = %path.display(),
            name = model.name().unwrap_or_default(),
            components = model.components.len(),
            states = model.states().len(),
            meta = model.meta.len(),
            "loaded model"
        );
        Ok(model)
    }
}
