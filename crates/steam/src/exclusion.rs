//! User exclusions: matches the user has asked never to be added.

use crate::identity::assign;
use std::collections::HashSet;
use std::fmt::Debug;

/// Derives exclusion keys and tests them against the user's exclusions.
pub trait ExclusionRegistry: Debug + Send + Sync {
    /// Stable key for a match: the parser type plus the identity of the
    /// executable and extracted title, so the key survives title modifiers.
    fn key(&self, executable: &str, extracted_title: &str, parser_type: &str) -> String {
        format!("{parser_type}:{}", assign(executable, extracted_title).short_id)
    }

    fn is_excluded(&self, key: &str) -> bool;
}

/// An in-memory set of exclusion keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    keys: HashSet<String>,
}
impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}
impl ExclusionRegistry for ExclusionSet {
    fn is_excluded(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}
