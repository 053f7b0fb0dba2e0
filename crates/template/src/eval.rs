//! Substitution of placeholder values into a parsed template.

use crate::ast::{Ast, Placeholder};
use crate::error::{EvalError, EvalErrorKind};
use crate::traverse::Visitor;
use std::collections::HashMap;

/// What to do when a placeholder key has no binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Fail evaluation with [`EvalErrorKind::UnresolvedPlaceholder`].
    SkipFile,
    /// Substitute an empty string and carry on.
    RenderEmpty,
}

/// Placeholder name to value mapping for one evaluation scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingEnvironment {
    values: HashMap<String, String>,
    case_insensitive: bool,
}
impl BindingEnvironment {
    /// An empty, case-sensitive environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty environment whose keys are compared after lowercasing.
    pub fn case_insensitive() -> Self {
        Self {
            values: HashMap::new(),
            case_insensitive: true,
        }
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    fn normalize(&self, key: &str) -> String {
        if self.case_insensitive {
            key.to_lowercase()
        } else {
            key.to_string()
        }
    }

    /// Binds `key` to `value`, replacing any previous binding.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        let key = self.normalize(key.as_ref());
        self.values.insert(key, value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if self.case_insensitive {
            self.values.get(&key.to_lowercase()).map(String::as_str)
        } else {
            self.values.get(key).map(String::as_str)
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for BindingEnvironment {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Substitution fold. Children of a placeholder concatenate into its key.
struct Substitute<'a, F> {
    env: &'a BindingEnvironment,
    policy: MissingPolicy,
    escape: F,
}
impl<F: Fn(&str) -> String> Visitor for Substitute<'_, F> {
    type Output = String;
    type Error = EvalError;

    fn visit_text(&mut self, text: &str, _depth: usize) -> Result<String, EvalError> {
        Ok(text.to_string())
    }

    fn visit_placeholder(
        &mut self,
        _placeholder: &Placeholder,
        children: Vec<String>,
        depth: usize,
    ) -> Result<String, EvalError> {
        let key = children.concat();
        match self.env.get(&key) {
            // Only values landing in the output are escaped; nested values are keys.
            Some(value) if depth == 0 => Ok((self.escape)(value)),
            Some(value) => Ok(value.to_string()),
            None => match self.policy {
                MissingPolicy::SkipFile => exn::bail!(EvalErrorKind::UnresolvedPlaceholder(key)),
                MissingPolicy::RenderEmpty => {
                    tracing::trace!(key = %key, "Unresolved placeholder rendered empty");
                    Ok(String::new())
                },
            },
        }
    }

    fn visit_root(&mut self, nodes: Vec<String>) -> Result<String, EvalError> {
        Ok(nodes.concat())
    }
}

impl Ast {
    /// Resolves every placeholder against `env`, innermost first.
    ///
    /// ```
    /// use srm_template::{BindingEnvironment, Delimiters, MissingPolicy, parse};
    ///
    /// let env = BindingEnvironment::new().with("n", "1").with("group_1", "X");
    /// let ast = parse("${group_${n}}", &Delimiters::default()).unwrap();
    /// assert_eq!(ast.evaluate(&env, MissingPolicy::SkipFile).unwrap(), "X");
    /// ```
    pub fn evaluate(&self, env: &BindingEnvironment, policy: MissingPolicy) -> Result<String, EvalError> {
        self.evaluate_with(env, policy, str::to_string)
    }

    /// Like [`evaluate`](Self::evaluate), passing each substituted top-level
    /// value through `escape` first (for instance to glob-escape values
    /// rendered into a pattern).
    pub fn evaluate_with<F>(&self, env: &BindingEnvironment, policy: MissingPolicy, escape: F) -> Result<String, EvalError>
    where
        F: Fn(&str) -> String,
    {
        let mut visitor = Substitute { env, policy, escape };
        self.traverse(&mut visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Delimiters;
    use crate::parser::parse;
    use rstest::rstest;

    fn env() -> BindingEnvironment {
        BindingEnvironment::new()
            .with("n", "1")
            .with("group_1", "X")
            .with("title", "Super Metroid")
            .with("exePath", "/usr/bin/retroarch")
    }

    #[rstest]
    #[case("", "")]
    #[case("plain", "plain")]
    #[case("${group_${n}}", "X")]
    #[case("\"${exePath}\" -L core", "\"/usr/bin/retroarch\" -L core")]
    #[case("${title} (${n})", "Super Metroid (1)")]
    #[case("a } b", "a } b")]
    fn evaluates(#[case] template: &str, #[case] expected: &str) {
        let ast = parse(template, &Delimiters::default()).unwrap();
        assert_eq!(ast.evaluate(&env(), MissingPolicy::SkipFile).unwrap(), expected);
    }

    #[test]
    fn skip_file_reports_evaluated_key() {
        let ast = parse("${group_${n}2}", &Delimiters::default()).unwrap();
        let err = ast.evaluate(&env(), MissingPolicy::SkipFile).unwrap_err();
        assert_eq!(*err, EvalErrorKind::UnresolvedPlaceholder("group_12".to_string()));
    }

    #[test]
    fn render_empty_substitutes_nothing() {
        let ast = parse("[${missing}]", &Delimiters::default()).unwrap();
        assert_eq!(ast.evaluate(&env(), MissingPolicy::RenderEmpty).unwrap(), "[]");
    }

    #[test]
    fn missing_inner_key_renders_outer_lookup_of_remaining_text() {
        // With RenderEmpty the inner miss yields "", so the outer key is "group_".
        let env = env().with("group_", "fallback");
        let ast = parse("${group_${missing}}", &Delimiters::default()).unwrap();
        assert_eq!(ast.evaluate(&env, MissingPolicy::RenderEmpty).unwrap(), "fallback");
    }

    #[test]
    fn case_folding_is_configurable() {
        let ast = parse("${TITLE}", &Delimiters::default()).unwrap();
        let sensitive = BindingEnvironment::new().with("title", "Zelda");
        assert!(ast.evaluate(&sensitive, MissingPolicy::SkipFile).is_err());
        let folded = BindingEnvironment::case_insensitive().with("title", "Zelda");
        assert_eq!(ast.evaluate(&folded, MissingPolicy::SkipFile).unwrap(), "Zelda");
    }

    #[test]
    fn escape_applies_to_output_values_only() {
        let env = BindingEnvironment::new().with("k", "[x]").with("[x]", "*?");
        let ast = parse("${k}/${${k}}", &Delimiters::default()).unwrap();
        let escaped = ast
            .evaluate_with(&env, MissingPolicy::SkipFile, |v| v.replace('[', "\\[").replace('*', "\\*"))
            .unwrap();
        assert_eq!(escaped, "\\[x]/\\*?");
    }

    #[test]
    fn extend_inserts_pairs() {
        let mut env = BindingEnvironment::case_insensitive();
        env.extend([("A", "1"), ("b", "2")]);
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("a"), Some("1"));
        assert_eq!(env.get("B"), Some("2"));
    }
}
