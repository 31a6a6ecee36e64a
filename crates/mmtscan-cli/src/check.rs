//! # Check Command
//!
//! Wires configuration, the scanner, and reporting together for one run.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mmtscan_core::ScanConfig;
use mmtscan_model::MmtLoader;

use crate::report;
use crate::scan::Scanner;

/// Exit code when every model passed.
pub const EXIT_PASSED: u8 = 0;
/// Exit code when at least one model failed.
pub const EXIT_FAILED: u8 = 1;
/// Exit code when the run aborted on an operational error.
pub const EXIT_ERROR: u8 = 2;

/// Arguments for a check run.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Directory to scan. Defaults to the configured root, or `.`.
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// YAML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also write a JSON report to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Do not print the start-up banner.
    #[arg(long)]
    pub no_banner: bool,
}

/// Execute a check run, writing the report to `out`.
///
/// Returns exit code: 0 when all models passed, 1 when any failed. Errors
/// that abort the run are returned as `Err`.
pub fn run_check<W: Write>(args: &CheckArgs, out: &mut W) -> Result<u8> {
    let config = match &args.config {
        Some(path) => ScanConfig::from_file(path).context("failed to load configuration")?,
        None => ScanConfig::default(),
    };
    let root = args.root.clone().unwrap_or_else(|| config.root.clone());

    tracing::debug!(root = %root.display(), ?config, "starting check");

    if !args.no_banner {
        report::print_banner(out)?;
    }

    let loader = MmtLoader::new();
    let result = Scanner::new(&loader, &config, &mut *out).scan(&root)?;
    let passed = report::print_summary(&result, out)?;

    if let Some(path) = &args.report {
        report::write_json_report(path, &root, &result)?;
    }

    Ok(if passed { EXIT_PASSED } else { EXIT_FAILED })
}
