//! Template Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Parsing and evaluation fail for
//! different reasons and are handled at different levels (parse errors are
//! structural and go straight back to the caller, evaluation errors fail a
//! single file), so each gets its own kind.

use derive_more::{Display, Error};

/// A template parse error with automatic location tracking.
pub type ParseError = exn::Exn<ParseErrorKind>;
/// An evaluation error with automatic location tracking.
pub type EvalError = exn::Exn<EvalErrorKind>;

/// Structural problems with a template string.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An opening delimiter was never closed before the end of the input.
    #[display("unbalanced delimiter opened at byte {position}")]
    UnbalancedDelimiter {
        /// Byte offset of the outermost opening delimiter left unclosed.
        position: usize,
    },
    /// Delimiters must be non-empty and distinct from one another.
    #[display("invalid delimiter pair")]
    InvalidDelimiters,
}

impl ParseErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The template is either well-formed or it isn't.
        false
    }
}

/// Problems resolving a parsed template against a binding environment.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// No binding exists for the (fully evaluated) placeholder key.
    #[display("unresolved placeholder: {_0}")]
    UnresolvedPlaceholder(#[error(not(source))] String),
}

impl EvalErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
