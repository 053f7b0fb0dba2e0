//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The platform has no per-user configuration directory.
    #[display("could not determine configuration directory")]
    NoConfigDirectory,
    /// Only TOML, YAML and JSON documents are understood.
    #[display("unsupported configuration format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// The document (or environment) could not be deserialized.
    #[display("could not load configuration from {_0}")]
    Load(#[error(not(source))] String),
    /// A template field doesn't parse.
    #[display("parser '{parser}' has an invalid template in '{field}': {value}")]
    InvalidTemplate {
        parser: String,
        field: &'static str,
        value: String,
    },
    /// The title rule could not be built from the parser input.
    #[display("parser '{_0}' has an invalid parser input")]
    InvalidParserInput(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
