//! # Reporting
//!
//! The text summary printed after the scan, the start-up banner, and the
//! optional machine-readable JSON report.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::scan::{Failure, ScanResult};

/// Width of the separator line between error blocks.
pub const SEPARATOR_WIDTH: usize = 79;

const BANNER: &str = "\
Syntax-checking all model files!
This is used for regular online testing.
If you are not interested in testing the models,

  Press Ctrl+C to abort.

";

/// Print the start-up banner.
pub fn print_banner<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(BANNER.as_bytes())?;
    out.flush()
}

/// Print the error blocks and the final tally.
///
/// Returns `true` when the scan passed.
pub fn print_summary<W: Write>(result: &ScanResult, out: &mut W) -> io::Result<bool> {
    if result.passed() {
        writeln!(out, "Test passed.")?;
        return Ok(true);
    }

    let separator = "-".repeat(SEPARATOR_WIDTH);
    for failure in &result.failures {
        writeln!(out, "{separator}")?;
        writeln!(out, "Error output for: {}", failure.path.display())?;
        writeln!(out, "{}", failure.diagnostic)?;
        writeln!(out)?;
    }
    writeln!(out, "{separator}")?;
    writeln!(out, "Test failed ({}) error(s).", result.failures.len())?;
    Ok(false)
}

/// Machine-readable form of a scan.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Scanned root directory.
    pub root: &'a Path,
    /// Number of candidate files validated.
    pub checked: usize,
    /// Whether no file failed.
    pub passed: bool,
    /// Failing files in traversal order.
    pub failures: &'a [Failure],
}

impl<'a> JsonReport<'a> {
    /// Build a report for `result` scanned from `root`.
    pub fn new(root: &'a Path, result: &'a ScanResult) -> Self {
        Self {
            root,
            checked: result.checked,
            passed: result.passed(),
            failures: &result.failures,
        }
    }
}

/// Write a pretty-printed JSON report to `path`.
pub fn write_json_report(path: &Path, root: &Path, result: &ScanResult) -> Result<()> {
    let report = JsonReport::new(root, result);
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("failed to write report {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote JSON report");
    Ok(())
}
