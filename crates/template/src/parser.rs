use crate::ast::{Ast, Delimiters, Node, Placeholder, Span};
use crate::error::{ParseError, ParseErrorKind};
use tracing::instrument;

/// An opened placeholder still waiting for its closing delimiter.
struct Frame {
    open: Span,
    children: Vec<Node>,
}

/// Parses `input` into an [`Ast`] of literal text and (nested) placeholders.
///
/// Scanning is left-to-right. An opening delimiter pushes a new placeholder;
/// the first closing delimiter encountered while that placeholder is the
/// innermost open one closes it. A closing delimiter with nothing open is
/// ordinary text. Any placeholder still open at the end of the input is an
/// error, reported at the outermost unclosed delimiter.
///
/// ```
/// use srm_template::{Delimiters, Node, parse};
///
/// let ast = parse("${a}${b}", &Delimiters::default()).unwrap();
/// assert_eq!(ast.nodes().len(), 2);
/// assert!(ast.nodes().iter().all(|n| matches!(n, Node::Placeholder(_))));
/// assert!(parse("${a${b}", &Delimiters::default()).is_err());
/// ```
#[instrument(level = "trace", skip_all, fields(length = input.as_ref().len()))]
pub fn parse(input: impl AsRef<str>, delimiters: &Delimiters) -> Result<Ast, ParseError> {
    let input = input.as_ref();
    let (left, right) = (delimiters.left(), delimiters.right());
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut text_start = 0;
    let mut position = 0;

    while position < input.len() {
        let rest = &input[position..];
        if rest.starts_with(left) {
            push_text(&mut stack, &mut root, text_start..position);
            stack.push(Frame {
                open: position..position + left.len(),
                children: Vec::new(),
            });
            position += left.len();
            text_start = position;
        } else if !stack.is_empty() && rest.starts_with(right) {
            push_text(&mut stack, &mut root, text_start..position);
            if let Some(frame) = stack.pop() {
                let placeholder = Placeholder {
                    open: frame.open,
                    close: position..position + right.len(),
                    children: frame.children,
                };
                push_node(&mut stack, &mut root, Node::Placeholder(placeholder));
            }
            position += right.len();
            text_start = position;
        } else {
            // Advance a whole character so spans never split a code point.
            position += rest.chars().next().map_or(1, char::len_utf8);
        }
    }

    if let Some(unclosed) = stack.first() {
        exn::bail!(ParseErrorKind::UnbalancedDelimiter { position: unclosed.open.start });
    }
    push_text(&mut stack, &mut root, text_start..input.len());

    Ok(Ast {
        input: input.to_string(),
        delimiters: delimiters.clone(),
        nodes: root,
    })
}

fn push_text(stack: &mut [Frame], root: &mut Vec<Node>, span: Span) {
    if !span.is_empty() {
        push_node(stack, root, Node::Text(span));
    }
}

fn push_node(stack: &mut [Frame], root: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(frame) => frame.children.push(node),
        None => root.push(node),
    }
}
