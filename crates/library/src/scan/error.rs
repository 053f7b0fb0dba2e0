//! Error types for the [`scan`](super) module.

use derive_more::{Display, Error};

/// A scan error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Any of these aborts the whole scan: a partial list of files would be
/// indistinguishable from a complete one.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The root to scan doesn't exist or isn't a directory.
    #[display("scan root is not a directory: {_0}")]
    RootNotFound(#[error(not(source))] String),
    /// A directory or entry below the root couldn't be read.
    #[display("could not read {_0}")]
    Unreadable(#[error(not(source))] String),
}
