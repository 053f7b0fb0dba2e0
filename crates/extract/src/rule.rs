//! Title extraction rules.
//!
//! A rule maps a path, relative to the scanned root and using `/` as the
//! separator, to a raw title. Rules never fail at match time: a path the
//! rule doesn't recognise simply yields `None`.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use regex::Regex;
use srm_template::{Delimiters, Node, parse};
use std::fmt::Debug;
use tracing::instrument;

/// Name of the placeholder, and of the regex capture group, carrying the title.
pub const TITLE: &str = "title";

/// Extracts a raw title from a relative file path.
pub trait TitleRule: Debug + Send + Sync {
    fn extract(&self, relative_path: &str) -> Option<String>;
}

/// The file name minus its final extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStem;
impl TitleRule for FileStem {
    fn extract(&self, relative_path: &str) -> Option<String> {
        let name = relative_path.rsplit('/').next()?;
        let stem = match name.rfind('.') {
            Some(0) | None => name,
            Some(dot) => &name[..dot],
        };
        (!stem.is_empty()).then(|| stem.to_string())
    }
}

/// A regular expression searched for in the path. The title is the capture
/// group named `title`, or the first group when there is no such name.
#[derive(Debug, Clone)]
pub struct RegexCapture {
    regex: Regex,
}
impl RegexCapture {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).or_raise(|| ErrorKind::InvalidPattern(pattern.to_string()))?;
        Ok(Self { regex })
    }
}
impl TitleRule for RegexCapture {
    fn extract(&self, relative_path: &str) -> Option<String> {
        let captures = self.regex.captures(relative_path)?;
        let title = captures.name(TITLE).or_else(|| captures.get(1))?;
        Some(title.as_str().to_string())
    }
}

/// A glob over the whole relative path in which `${title}` marks the part
/// holding the title, for instance `*/${title}/*.@(iso|cue)`.
#[derive(Debug, Clone)]
pub struct GlobTitle {
    glob: String,
    regex: Regex,
}
impl GlobTitle {
    #[instrument(level = "debug")]
    pub fn new(glob: &str) -> Result<Self> {
        let ast = parse(glob, &Delimiters::default()).or_raise(|| ErrorKind::Template)?;
        let mut pattern = String::from("^");
        let mut titles = 0;
        for node in ast.nodes() {
            match node {
                Node::Text(span) => pattern.push_str(&glob_to_regex(ast.slice(span))),
                Node::Placeholder(placeholder) => {
                    if ast.slice(&placeholder.inner()) != TITLE {
                        exn::bail!(ErrorKind::TitlePlaceholder(glob.to_string()));
                    }
                    titles += 1;
                    pattern.push_str("(?P<title>[^/]+?)");
                },
            }
        }
        if titles != 1 {
            exn::bail!(ErrorKind::TitlePlaceholder(glob.to_string()));
        }
        pattern.push('$');
        tracing::trace!(%pattern, "Compiled title glob");
        let regex = Regex::new(&pattern).or_raise(|| ErrorKind::InvalidPattern(glob.to_string()))?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }
}
impl TitleRule for GlobTitle {
    fn extract(&self, relative_path: &str) -> Option<String> {
        self.regex
            .captures(relative_path)
            .and_then(|c| c.name(TITLE))
            .map(|m| m.as_str().to_string())
    }
}

/// Translates glob syntax into an unanchored regex fragment.
///
/// Supports `*`, `**`, `?`, `[...]` classes (with `!` negation), `{a,b}`
/// braces and `@(a|b)` extended groups. Everything else is literal.
fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::new();
    let mut groups: Vec<char> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:[^/]*/)*");
                    i += 1;
                } else {
                    out.push_str(".*");
                }
                i += 1;
            },
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => match chars[i + 1..].iter().position(|&c| c == ']') {
                Some(len) => {
                    let class: String = chars[i + 1..i + 1 + len].iter().collect();
                    let class = match class.strip_prefix('!') {
                        Some(negated) => format!("^{negated}"),
                        None => class,
                    };
                    out.push('[');
                    out.push_str(&class.replace('\\', r"\\").replace('[', r"\["));
                    out.push(']');
                    i += len + 1;
                },
                None => out.push_str(r"\["),
            },
            '@' if chars.get(i + 1) == Some(&'(') => {
                out.push_str("(?:");
                groups.push(')');
                i += 1;
            },
            '{' => {
                out.push_str("(?:");
                groups.push('}');
            },
            ',' if groups.last() == Some(&'}') => out.push('|'),
            '|' if groups.last() == Some(&')') => out.push('|'),
            ')' | '}' if groups.last() == Some(&ch) => {
                groups.pop();
                out.push(')');
            },
            '\\' if i + 1 < chars.len() => {
                i += 1;
                out.push_str(&regex::escape(&chars[i].to_string()));
            },
            other => out.push_str(&regex::escape(&other.to_string())),
        }
        i += 1;
    }
    // Unterminated groups are closed so the fragment always compiles.
    for _ in groups {
        out.push(')');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Super Metroid.sfc", Some("Super Metroid"))]
    #[case("snes/Super Metroid (USA).sfc", Some("Super Metroid (USA)"))]
    #[case("games/archive.tar.gz", Some("archive.tar"))]
    #[case("no_extension", Some("no_extension"))]
    #[case("dir/.hidden", Some(".hidden"))]
    #[case("dir/", None)]
    fn file_stem(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(FileStem.extract(path).as_deref(), expected);
    }

    #[rstest]
    #[case(r"(?P<title>[^/]+) \(", "snes/Chrono Trigger (USA).sfc", Some("Chrono Trigger"))]
    #[case(r"^([^/]+)/", "Half-Life/hl.exe", Some("Half-Life"))]
    #[case(r"^(?P<title>\d+)$", "Half-Life/hl.exe", None)]
    fn regex_capture(#[case] pattern: &str, #[case] path: &str, #[case] expected: Option<&str>) {
        let rule = RegexCapture::new(pattern).unwrap();
        assert_eq!(rule.extract(path).as_deref(), expected);
    }

    #[test]
    fn regex_capture_rejects_invalid_pattern() {
        let err = RegexCapture::new("(unclosed").unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidPattern("(unclosed".to_string()));
    }

    #[rstest]
    #[case("${title}.@(sfc|smc)", "Super Metroid.sfc", Some("Super Metroid"))]
    #[case("${title}.@(sfc|smc)", "Super Metroid.zip", None)]
    #[case("${title}.@(sfc|smc)", "sub/Super Metroid.sfc", None)]
    #[case("**/${title}.{iso,cue}", "psx/rpg/Final Fantasy VII.cue", Some("Final Fantasy VII"))]
    #[case("**/${title}.{iso,cue}", "Xenogears.iso", Some("Xenogears"))]
    #[case("*/${title}/*.exe", "PC/Half-Life/hl.exe", Some("Half-Life"))]
    #[case("${title} [[]!].nes", "Contra [!].nes", Some("Contra"))]
    #[case("${title}.?64", "Star Fox.n64", Some("Star Fox"))]
    #[case("${title}.[!z]64", "Star Fox.z64", None)]
    fn glob_title(#[case] glob: &str, #[case] path: &str, #[case] expected: Option<&str>) {
        let rule = GlobTitle::new(glob).unwrap();
        assert_eq!(rule.extract(path).as_deref(), expected);
    }

    #[rstest]
    #[case("*.sfc")]
    #[case("${title}/${title}.sfc")]
    #[case("${name}.sfc")]
    fn glob_title_requires_single_title(#[case] glob: &str) {
        let err = GlobTitle::new(glob).unwrap_err();
        assert_eq!(*err, ErrorKind::TitlePlaceholder(glob.to_string()));
    }

    #[test]
    fn glob_title_rejects_unbalanced_template() {
        let err = GlobTitle::new("${title.sfc").unwrap_err();
        assert_eq!(*err, ErrorKind::Template);
    }
}
