//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors only arise while building a
//! rule from configuration; applying a rule to a path never fails, it just
//! doesn't match.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configured pattern is not a valid regular expression.
    #[display("invalid title pattern: {_0}")]
    InvalidPattern(#[error(not(source))] String),
    /// The glob must contain exactly one `${title}` placeholder.
    #[display("glob must contain exactly one ${{title}} placeholder: {_0}")]
    TitlePlaceholder(#[error(not(source))] String),
    /// The glob itself is not a well-formed template.
    #[display("malformed glob template")]
    Template,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Patterns come from configuration; the same input fails the same way.
        false
    }
}
