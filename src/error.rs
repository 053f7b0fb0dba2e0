//! Command Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A command error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for commands.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The settings document could not be located or loaded.
    #[display("could not load settings")]
    Settings,
    /// No enabled parser has the requested title.
    #[display("no enabled parser named '{_0}'")]
    UnknownParser(#[error(not(source))] String),
    /// A parser could not be run to completion.
    #[display("parser '{_0}' failed")]
    Parser(#[error(not(source))] String),
    /// One or more parsers could not be run; the rest were reported.
    #[display("{_0} parser(s) failed")]
    ParsersFailed(#[error(not(source))] usize),
    /// The template given on the command line does not parse.
    #[display("invalid template")]
    Template,
}
