//! Abstract syntax tree produced by [`parse`](crate::parse).

use crate::error::{ParseError, ParseErrorKind};
use std::ops::Range;

/// Byte range into the original template string.
pub type Span = Range<usize>;

/// The left/right marker pair that opens and closes a placeholder.
///
/// Defaults to `${` and `}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiters {
    left: String,
    right: String,
}
impl Default for Delimiters {
    fn default() -> Self {
        Self {
            left: "${".to_string(),
            right: "}".to_string(),
        }
    }
}
impl Delimiters {
    /// Both markers must be non-empty and differ from each other, otherwise
    /// nesting depth cannot be tracked.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Result<Self, ParseError> {
        let (left, right) = (left.into(), right.into());
        if left.is_empty() || right.is_empty() || left == right {
            exn::bail!(ParseErrorKind::InvalidDelimiters);
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }
}

/// A single node of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, emitted verbatim.
    Text(Span),
    /// A delimited placeholder whose children evaluate to the lookup key.
    Placeholder(Placeholder),
}

/// A placeholder node, with the byte range of each of its delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub open: Span,
    pub close: Span,
    pub children: Vec<Node>,
}
impl Placeholder {
    /// Range between the two delimiters.
    pub fn inner(&self) -> Span {
        self.open.end..self.close.start
    }

    /// Range covering both delimiters and everything between them.
    pub fn outer(&self) -> Span {
        self.open.start..self.close.end
    }
}

/// A parsed template: the source string plus its ordered top-level nodes.
///
/// Immutable once constructed; spans always index into [`Ast::input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    pub(crate) input: String,
    pub(crate) delimiters: Delimiters,
    pub(crate) nodes: Vec<Node>,
}
impl Ast {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Source text covered by `span`.
    pub fn slice(&self, span: &Span) -> &str {
        &self.input[span.clone()]
    }

    /// Returns `true` if the template contains no placeholders at all.
    pub fn is_literal(&self) -> bool {
        self.nodes.iter().all(|node| matches!(node, Node::Text(_)))
    }
}
