//! # mmtscan-cli — Model File Checker
//!
//! Recursively finds `.mmt` model files, checks that each one parses and
//! carries the required metadata annotations, and prints a report suited to
//! continuous testing:
//!
//! ```bash
//! mmtscan                      # scan the current directory
//! mmtscan models/ --no-banner  # scan a subtree
//! mmtscan --report out.json    # also write a JSON report
//! ```
//!
//! ## Modules
//!
//! - [`scan`] — natural-order depth-first walk with live progress lines.
//! - [`validate`] — per-file parse and metadata check.
//! - [`report`] — banner, error blocks, final tally, JSON report.
//! - [`check`] — argument handling and exit codes.
//!
//! ## Exit Codes
//!
//! `0` when every model passed, `1` when any failed, `2` when the run aborted
//! (unreadable directory or model file, invalid configuration).

pub mod check;
pub mod report;
pub mod scan;
pub mod validate;

pub use check::{run_check, CheckArgs, EXIT_ERROR, EXIT_FAILED, EXIT_PASSED};
pub use scan::{Failure, ScanResult, Scanner};
pub use validate::{missing_annotation, validate_model};
