//! Layered error types
//!
//! Each layer of the engine owns one error enum. Lower layers convert into
//! [`PropagationError`], the only error a bulk operation returns.

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML could not be parsed into the schema
    #[error("failed to parse {origin} config: {reason}")]
    Parse {
        /// Where the configuration came from (file path or "embedded")
        origin: String,
        /// Parser message
        reason: String,
    },

    /// Parsed configuration violates an invariant
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// Configuration file could not be read
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// The configuration file path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Boundary matching errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The regex engine cannot express the lookaround pattern
    #[error("pattern requires unsupported regex features: {0}")]
    PatternUnsupported(String),

    /// The generated pattern failed to compile for another reason
    #[error("invalid pattern for word '{word}': {reason}")]
    InvalidPattern {
        /// The word the pattern was built for
        word: String,
        /// Compiler message
        reason: String,
    },

    /// The regex engine gave up while searching
    #[error("pattern execution failed: {0}")]
    Execution(String),

    /// Target word is empty or whitespace only
    #[error("cannot match an empty word")]
    EmptyWord,
}

/// Classification errors raised by pluggable handlers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("handler '{handler}' failed: {reason}")]
pub struct ClassifyError {
    /// Name of the handler that failed
    pub handler: String,
    /// Failure description
    pub reason: String,
}

impl ClassifyError {
    /// Create a handler failure
    pub fn new(handler: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by the paragraph store and correction log
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend is unreachable or the transaction was aborted
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Concurrent modification detected at commit time
    #[error("storage conflict: {0}")]
    Conflict(String),

    /// A single row was refused (constraint, validation); the transaction survives
    #[error("row rejected: {0}")]
    Rejected(String),
}

impl StoreError {
    /// Whether this error poisons the surrounding transaction
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StoreError::Rejected(_))
    }
}

/// Errors returned by scan, apply and edit operations
#[derive(Error, Debug)]
pub enum PropagationError {
    /// Fatal storage failure; nothing from the transaction is visible
    #[error("storage failure after updating {} paragraph(s): {source}", updated_before_failure.len())]
    Storage {
        /// Underlying store error
        #[source]
        source: StoreError,
        /// Paragraphs rewritten inside the rolled-back transaction before the failure
        updated_before_failure: Vec<String>,
    },

    /// A correction word could not be turned into a matcher
    #[error("matching error: {0}")]
    Matching(#[from] MatchError),

    /// The session is not in a state that allows the requested step
    #[error("cannot {action} while session is {state}")]
    InvalidState {
        /// Requested step
        action: &'static str,
        /// Current phase name
        state: &'static str,
    },

    /// Referenced paragraph does not exist
    #[error("paragraph '{0}' not found")]
    ParagraphNotFound(String),
}

impl From<StoreError> for PropagationError {
    fn from(source: StoreError) -> Self {
        PropagationError::Storage {
            source,
            updated_before_failure: Vec::new(),
        }
    }
}

/// Result type for matcher operations
pub type MatchResult<T> = std::result::Result<T, MatchError>;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for propagation operations
pub type Result<T> = std::result::Result<T, PropagationError>;
