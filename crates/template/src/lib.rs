//! Parsing and evaluation of templates with nested `${...}` placeholders.
//!
//! A template is parsed once into an [`Ast`] and then folded with a
//! [`Visitor`]: [`Ast::to_source`] and [`highlight`] reproduce the template,
//! [`Ast::evaluate`] substitutes values from a [`BindingEnvironment`].

mod ast;
pub mod error;
mod eval;
mod parser;
mod traverse;

pub use crate::ast::{Ast, Delimiters, Node, Placeholder, Span};
pub use crate::eval::{BindingEnvironment, MissingPolicy};
pub use crate::parser::parse;
pub use crate::traverse::{Visitor, highlight};
