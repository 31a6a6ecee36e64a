#![deny(missing_docs)]

//! # mmtscan-model — Model Loading
//!
//! Parses `.mmt` model files into a [`Model`] and exposes the
//! [`ModelLoader`] trait the scanner depends on.
//!
//! ## Error Split
//!
//! Loading has two failure kinds, kept apart in [`LoadError`]:
//!
//! - [`LoadError::Parse`] — the file is not a valid model. The scanner records
//!   the message as that file's diagnostic and continues.
//! - [`LoadError::Io`] — the file could not be read. The scanner aborts.
//!
//! The parser checks structure only (sections, names, duplicates, initial
//! values, protocol rows). Expressions are never evaluated.

pub mod error;
pub mod loader;
pub mod model;
pub mod parser;

pub use error::{LoadError, ParseError};
pub use loader::{MmtLoader, ModelLoader};
pub use model::{Component, EventStart, InitialValue, Model, ProtocolEvent, Variable};
pub use parser::parse;
