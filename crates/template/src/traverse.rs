//! Post-order traversal of an [`Ast`].
//!
//! Every operation over a parsed template (reproducing the source, producing
//! highlight markup, substituting values) is a fold over the same walk:
//! children are visited before their parent, and the parent receives the
//! children's outputs in order. Only the [`Visitor`] differs.

use crate::ast::{Ast, Delimiters, Node, Placeholder};
use crate::parser::parse;
use std::convert::Infallible;

/// Callbacks for a depth-first, post-order walk over an [`Ast`].
///
/// `depth` is zero for top-level nodes and increases by one inside each
/// placeholder.
pub trait Visitor {
    type Output;
    type Error;

    fn visit_text(&mut self, text: &str, depth: usize) -> Result<Self::Output, Self::Error>;

    /// Called once all of the placeholder's children have been visited.
    fn visit_placeholder(
        &mut self,
        placeholder: &Placeholder,
        children: Vec<Self::Output>,
        depth: usize,
    ) -> Result<Self::Output, Self::Error>;

    /// Folds the outputs of the top-level nodes into the final result.
    fn visit_root(&mut self, nodes: Vec<Self::Output>) -> Result<Self::Output, Self::Error>;
}

impl Ast {
    /// Walks the tree post-order, returning the output of [`Visitor::visit_root`].
    pub fn traverse<V: Visitor>(&self, visitor: &mut V) -> Result<V::Output, V::Error> {
        let outputs = self.traverse_children(visitor)?;
        visitor.visit_root(outputs)
    }

    /// Walks the tree post-order without calling [`Visitor::visit_root`],
    /// returning the output of each top-level node in order.
    pub fn traverse_children<V: Visitor>(&self, visitor: &mut V) -> Result<Vec<V::Output>, V::Error> {
        self.walk(&self.nodes, visitor, 0)
    }

    fn walk<V: Visitor>(&self, nodes: &[Node], visitor: &mut V, depth: usize) -> Result<Vec<V::Output>, V::Error> {
        let mut outputs = Vec::with_capacity(nodes.len());
        for node in nodes {
            let output = match node {
                Node::Text(span) => visitor.visit_text(self.slice(span), depth)?,
                Node::Placeholder(placeholder) => {
                    let children = self.walk(&placeholder.children, visitor, depth + 1)?;
                    visitor.visit_placeholder(placeholder, children, depth)?
                },
            };
            outputs.push(output);
        }
        Ok(outputs)
    }

    /// Re-renders the template exactly as it was written.
    pub fn to_source(&self) -> String {
        let mut visitor = Markup {
            delimiters: &self.delimiters,
            tag: None,
        };
        infallible(self.traverse(&mut visitor))
    }
}

/// Wraps every delimiter of `input` in `<tag class="level-N">…</tag>`, where
/// `N` cycles through `0..3` with nesting depth.
///
/// Templates that fail to parse are returned untouched, so an invalid value
/// is still displayed as typed.
///
/// ```
/// use srm_template::{Delimiters, highlight};
///
/// let markup = highlight("a${b}", &Delimiters::default(), "span");
/// assert_eq!(markup, r#"a<span class="level-0">${</span>b<span class="level-0">}</span>"#);
/// ```
pub fn highlight(input: &str, delimiters: &Delimiters, tag: &str) -> String {
    match parse(input, delimiters) {
        Ok(ast) => {
            let mut visitor = Markup {
                delimiters,
                tag: Some(tag),
            };
            infallible(ast.traverse(&mut visitor))
        },
        Err(e) => {
            tracing::debug!(error = %(*e), "Template could not be parsed; not highlighting");
            input.to_string()
        },
    }
}

/// Structural fold: reproduces the source, optionally wrapping delimiters in
/// highlight tags.
struct Markup<'a> {
    delimiters: &'a Delimiters,
    tag: Option<&'a str>,
}
impl Markup<'_> {
    fn delimiter(&self, delimiter: &str, depth: usize) -> String {
        match self.tag {
            Some(tag) => format!(r#"<{tag} class="level-{}">{delimiter}</{tag}>"#, depth % 3),
            None => delimiter.to_string(),
        }
    }
}
impl Visitor for Markup<'_> {
    type Output = String;
    type Error = Infallible;

    fn visit_text(&mut self, text: &str, _depth: usize) -> Result<String, Infallible> {
        Ok(text.to_string())
    }

    fn visit_placeholder(
        &mut self,
        _placeholder: &Placeholder,
        children: Vec<String>,
        depth: usize,
    ) -> Result<String, Infallible> {
        Ok(format!(
            "{}{}{}",
            self.delimiter(self.delimiters.left(), depth),
            children.concat(),
            self.delimiter(self.delimiters.right(), depth),
        ))
    }

    fn visit_root(&mut self, nodes: Vec<String>) -> Result<String, Infallible> {
        Ok(nodes.concat())
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
