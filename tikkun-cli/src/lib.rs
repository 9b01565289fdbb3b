//! Tikkun CLI library
//!
//! Command-line adapter over `tikkun-core`: diff two versions of a text,
//! classify word pairs, and scan, apply or record corrections against a
//! JSON book file.

pub mod book;
pub mod commands;
pub mod error;
pub mod output;

pub use error::{CliError, CliResult};
