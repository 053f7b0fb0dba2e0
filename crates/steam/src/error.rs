//! Steam Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A Steam installation error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for Steam operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The directory doesn't look like a Steam installation (no `userdata`).
    #[display("not a steam directory: {_0}")]
    NotSteamDirectory(#[error(not(source))] String),
    /// A file or directory inside the installation could not be read.
    #[display("could not read {_0}")]
    Io(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            // Steam may be holding a lock on the file while it writes.
            Self::Io(_) => true,
            Self::NotSteamDirectory(_) => false,
        }
    }
}
