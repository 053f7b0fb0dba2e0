use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(BRACKETS_REGEX, r"[()\[\]{}<>]");
// Anything that isn't a letter, number, mark or whitespace.
regex!(SPECIAL_CHARACTERS_REGEX, r"[^\p{L}\p{N}\p{M}\s]");
regex!(WHITESPACE_REGEX, r"\s+");
