//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors here are batch-level: a
//! single file that can't be classified is reported in the
//! [`BatchResult`](crate::BatchResult), never as an error.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The parser configuration can't be turned into a [`Context`](crate::Context).
    #[display("invalid parser configuration")]
    Configuration,
    /// The directory scan failed; see [`scan::error`](crate::scan::error).
    #[display("could not scan for files")]
    Scan,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            // Permissions or mounts may have changed in the meantime.
            Self::Scan => true,
            Self::Configuration => false,
        }
    }
}
