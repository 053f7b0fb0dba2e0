//! Local artwork lookup.
//!
//! Templates are rendered with every substituted value glob-escaped, so a
//! title like `Mega Man [!]` can't turn into a character class. The only
//! extension over the `glob` crate's syntax is `@(a|b)`, which is expanded
//! into one pattern per alternative before globbing.

use crate::models::{FailureReason, IndexedPath};
use crate::templates::ArtworkAsts;
use glob::Pattern;
use srm_config::ArtworkKind;
use srm_template::{BindingEnvironment, MissingPolicy};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::instrument;

/// What was found for one artwork kind of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedArtwork {
    pub default_image: Option<PathBuf>,
    /// Patterns searched, after alternation expansion.
    pub local_images: Vec<String>,
    pub resolved_default: Vec<IndexedPath>,
    pub resolved_local: Vec<IndexedPath>,
}

#[instrument(level = "trace", skip_all, fields(%kind))]
pub(crate) fn resolve(
    kind: ArtworkKind,
    templates: &ArtworkAsts,
    env: &BindingEnvironment,
    policy: MissingPolicy,
) -> Result<ResolvedArtwork, FailureReason> {
    let unresolved = |e: srm_template::error::EvalError| FailureReason::from(&*e);
    let mut artwork = ResolvedArtwork::default();

    let default_image = templates.default_image.evaluate(env, policy).map_err(unresolved)?;
    let default_image = default_image.trim();
    if !default_image.is_empty() {
        artwork.default_image = Some(PathBuf::from(default_image));
        artwork.resolved_default = glob_all(kind, &[Pattern::escape(default_image)])?;
    }

    let directory = templates.local_images.evaluate_with(env, policy, Pattern::escape).map_err(unresolved)?;
    let directory = directory.trim();
    if !directory.is_empty() {
        let pattern = templates.local_pattern.evaluate_with(env, policy, Pattern::escape).map_err(unresolved)?;
        let joined = if directory.ends_with('/') || directory.ends_with('\\') {
            format!("{directory}{pattern}")
        } else {
            format!("{directory}/{pattern}")
        };
        artwork.local_images = expand_alternations(&joined);
        artwork.resolved_local = glob_all(kind, &artwork.local_images)?;
    }
    Ok(artwork)
}

/// Globs each pattern in turn, numbering unique matches in the order found.
fn glob_all(kind: ArtworkKind, patterns: &[String]) -> Result<Vec<IndexedPath>, FailureReason> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|_| FailureReason::InvalidArtworkPattern {
            kind,
            pattern: pattern.clone(),
        })?;
        for path in paths {
            match path {
                Ok(path) => {
                    if seen.insert(path.clone()) {
                        found.push(IndexedPath {
                            index: found.len(),
                            path,
                        });
                    }
                },
                Err(e) => tracing::warn!(path = %e.path().display(), error = %e, "Skipping unreadable artwork candidate"),
            }
        }
    }
    Ok(found)
}

/// Expands every `@(a|b|…)` group into its alternatives, producing the
/// cartesian product for multiple groups. Groups may nest. A group that is
/// never closed is left as literal text.
pub(crate) fn expand_alternations(pattern: &str) -> Vec<String> {
    let Some(start) = pattern.find("@(") else {
        return vec![pattern.to_string()];
    };
    let body_start = start + 2;
    let mut depth = 0usize;
    let mut splits = vec![body_start];
    let mut end = None;
    for (offset, ch) in pattern[body_start..].char_indices() {
        let position = body_start + offset;
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => {
                end = Some(position);
                break;
            },
            ')' => depth -= 1,
            '|' if depth == 0 => splits.push(position + 1),
            _ => {},
        }
    }
    let Some(end) = end else {
        return vec![pattern.to_string()];
    };

    let (prefix, suffix) = (&pattern[..start], &pattern[end + 1..]);
    let mut expanded = Vec::new();
    for (i, &from) in splits.iter().enumerate() {
        let to = splits.get(i + 1).map_or(end, |next| next - 1);
        let alternative = &pattern[from..to];
        // Re-expand so nested groups and later groups are handled too.
        expanded.extend(expand_alternations(&format!("{prefix}{alternative}{suffix}")));
    }
    expanded
}
