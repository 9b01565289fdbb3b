//! Error handling for the CLI application

use std::fmt;

/// CLI-specific failures
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Book file could not be parsed or is inconsistent
    InvalidBook(String),
    /// Configuration error
    ConfigError(String),
    /// Requested paragraph is not in the book
    UnknownParagraph(String),
    /// No occurrence to act on
    NothingToApply(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::InvalidBook(msg) => write!(f, "Invalid book file: {msg}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::UnknownParagraph(id) => write!(f, "Unknown paragraph: {id}"),
            CliError::NothingToApply(msg) => write!(f, "Nothing to apply: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
