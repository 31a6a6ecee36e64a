//! # Model Validation
//!
//! Loads one model and checks its metadata. Only the first problem is
//! reported: a parse error stops all further checks, and required keys are
//! checked in order with the first absent key ending the check.

use std::path::Path;

use mmtscan_model::{LoadError, ModelLoader};

/// Diagnostic text for a model lacking the annotation `key`.
pub fn missing_annotation(key: &str) -> String {
    format!("Missing meta data annotation: {key}")
}

/// Validate the model at `path`.
///
/// Returns `Ok(None)` for a valid model and `Ok(Some(diagnostic))` for a
/// parse failure or a missing annotation. Any loader error other than a
/// parse error is returned as `Err` and should abort the run.
pub fn validate_model<L>(
    loader: &L,
    path: &Path,
    required: &[String],
) -> Result<Option<String>, LoadError>
where
    L: ModelLoader + ?Sized,
{
    let model = match loader.load(path) {
        Ok(model) => model,
        Err(e) if e.is_parse() => {
            tracing::debug!(path = %path.display(), error = %e, "model failed to parse");
            return Ok(Some(e.to_string()));
        }
        Err(e) => return Err(e),
    };

    if let Some(key) = required.iter().find(|key| !model.has_meta(key)) {
        tracing::debug!(path = %path.display(), key = %key, "missing required annotation");
        return Ok(Some(missing_annotation(key)));
    }

    Ok(None)
}
