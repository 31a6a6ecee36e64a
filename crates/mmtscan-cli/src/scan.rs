//! # Directory Scan
//!
//! Walks a directory tree depth-first, visiting the entries of each directory
//! in natural order. Candidate model files are validated as they are found and
//! a progress line is written for each one:
//!
//! ```text
//! ./models/beeler-1977.mmt..............................................ok
//! ./models/ohara-2011.mmt...............................................FAIL
//! ```
//!
//! Directories whose name starts with `.` are skipped. Each level returns its
//! own [`ScanResult`]; the caller appends it to its own, so failures come out
//! in traversal order without any shared accumulator.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use mmtscan_core::{sort_naturally_by, ScanConfig};
use mmtscan_model::ModelLoader;

use crate::validate::validate_model;

/// A model file that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Path of the model file, as shown in the progress line.
    pub path: PathBuf,
    /// Why the file failed.
    pub diagnostic: String,
}

/// Outcome of scanning a directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// Number of candidate files validated.
    pub checked: usize,
    /// Failing files in traversal order.
    pub failures: Vec<Failure>,
}

impl ScanResult {
    /// Whether no file failed.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Append the result of a nested scan.
    pub fn merge(&mut self, nested: ScanResult) {
        self.checked += nested.checked;
        self.failures.extend(nested.failures);
    }
}

/// Scans directory trees for model files.
pub struct Scanner<'a, L: ?Sized, W> {
    loader: &'a L,
    config: &'a ScanConfig,
    out: W,
}

impl<'a, L, W> Scanner<'a, L, W>
where
    L: ModelLoader + ?Sized,
    W: Write,
{
    /// Create a scanner writing progress lines to `out`.
    pub fn new(loader: &'a L, config: &'a ScanConfig, out: W) -> Self {
        Self {
            loader,
            config,
            out,
        }
    }

    /// Scan `root` and everything below it.
    ///
    /// Filesystem errors and loader errors other than parse errors abort the
    /// scan.
    pub fn scan(&mut self, root: &Path) -> Result<ScanResult> {
        let result = self.scan_dir(root)?;
        tracing::info!(
            root = %root.display(),
            checked = result.checked,
            failed = result.failures.len(),
            "scan finished"
        );
        Ok(result)
    }

    /// Give back the progress writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn scan_dir(&mut self, dir: &Path) -> Result<ScanResult> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("failed to read directory {}", dir.display()))?
        {
            let entry =
                entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push((name, dir.join(entry.file_name())));
        }
        sort_naturally_by(&mut entries, |entry| entry.0.as_str());

        tracing::debug!(dir = %dir.display(), entries = entries.len(), "scanning directory");

        let mut result = ScanResult::default();
        for (name, path) in entries {
            if path.is_file() && self.is_candidate(&path) {
                result.checked += 1;
                if let Some(diagnostic) = self.check_file(&path)? {
                    result.failures.push(Failure { path, diagnostic });
                }
            } else if path.is_dir() {
                if name.starts_with('.') {
                    tracing::debug!(dir = %path.display(), "skipping hidden directory");
                    continue;
                }
                let nested = self.scan_dir(&path)?;
                result.merge(nested);
            }
        }
        Ok(result)
    }

    fn is_candidate(&self, path: &Path) -> bool {
        path.extension() == Some(OsStr::new(&self.config.extension))
    }

    /// Validate one file, writing its progress line.
    fn check_file(&mut self, path: &Path) -> Result<Option<String>> {
        let shown = path.display().to_string();
        let dots = self
            .config
            .progress_width
            .saturating_sub(shown.chars().count());
        write!(self.out, "{shown}{}", ".".repeat(dots))?;
        self.out.flush()?;

        let diagnostic = validate_model(self.loader, path, &self.config.required_annotations)?;
        if diagnostic.is_some() {
            writeln!(self.out, "FAIL")?;
        } else {
            writeln!(self.out, "ok")?;
        }
        self.out.flush()?;
        Ok(diagnostic)
    }
}
