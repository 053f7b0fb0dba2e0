//! Replacing an extracted title with a user-defined custom variable.

use std::collections::BTreeMap;

/// Custom variables, grouped: `group -> { key -> value }`.
pub type CustomVariables = BTreeMap<String, BTreeMap<String, String>>;

/// Looks `title` up as a key in each of `groups` in turn, returning the first
/// value found.
///
/// Groups that don't exist are ignored. With `case_insensitive` both group
/// names and keys are compared after lowercasing.
pub fn title_from_variable(
    variables: &CustomVariables,
    groups: &[String],
    title: &str,
    case_insensitive: bool,
) -> Option<String> {
    groups.iter().find_map(|group| {
        let entries = if case_insensitive {
            variables.iter().find(|(name, _)| name.to_lowercase() == group.to_lowercase())?.1
        } else {
            variables.get(group)?
        };
        let value = if case_insensitive {
            let title = title.to_lowercase();
            entries.iter().find(|(key, _)| key.to_lowercase() == title)?.1
        } else {
            entries.get(title)?
        };
        Some(value.clone())
    })
}
