#![deny(missing_docs)]

//! # mmtscan-core — Foundational Types for mmtscan
//!
//! Shared building blocks for the model scanner. This crate has no internal
//! crate dependencies — only `serde`, `serde_yaml`, and `thiserror` from the
//! external ecosystem.
//!
//! ## Contents
//!
//! 1. **[`NaturalKey`]** — the sort key that orders `file2` before `file10`.
//!    Directory entries are always visited in this order.
//!
//! 2. **[`REQUIRED_ANNOTATIONS`]** — the fixed, ordered list of metadata keys
//!    every model must carry. Order matters: only the first missing key is
//!    reported.
//!
//! 3. **[`ScanConfig`]** — optional YAML configuration whose defaults
//!    reproduce the standard scan exactly.
//!
//! 4. **[`ConfigError`]** — structured errors with `thiserror`, no
//!    `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod natural;

pub use config::{ScanConfig, DEFAULT_EXTENSION, DEFAULT_PROGRESS_WIDTH, REQUIRED_ANNOTATIONS};
pub use error::ConfigError;
pub use natural::{natural_sort_key, sort_naturally, sort_naturally_by, NaturalKey, Token};
