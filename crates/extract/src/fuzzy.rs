//! Fuzzy title normalization.
//!
//! The passes always run in the same order: brackets are removed first, then
//! special characters are stripped, then diacritics are folded. Whitespace
//! is collapsed last regardless of which passes are enabled.

use crate::consts::{BRACKETS_REGEX, SPECIAL_CHARACTERS_REGEX, WHITESPACE_REGEX};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Which normalization passes [`fuzzy`] applies.
///
/// Whitespace is collapsed and trimmed even with every pass disabled, so the
/// default options are not the identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct FuzzyOptions {
    pub replace_diacritics: bool,
    pub remove_characters: bool,
    pub remove_brackets: bool,
}
impl FuzzyOptions {
    pub fn all() -> Self {
        Self {
            replace_diacritics: true,
            remove_characters: true,
            remove_brackets: true,
        }
    }
}

/// Normalizes `title` for matching. May return an empty string when every
/// character was removed.
///
/// ```
/// use srm_extract::{FuzzyOptions, fuzzy};
///
/// let options = FuzzyOptions { remove_brackets: true, replace_diacritics: true, ..Default::default() };
/// assert_eq!(fuzzy("(Café)", &options), "Cafe");
/// ```
pub fn fuzzy(title: &str, options: &FuzzyOptions) -> String {
    let mut output = title.to_string();
    if options.remove_brackets {
        output = BRACKETS_REGEX.replace_all(&output, "").into_owned();
    }
    if options.remove_characters {
        output = SPECIAL_CHARACTERS_REGEX.replace_all(&output, "").into_owned();
    }
    if options.replace_diacritics {
        output = fold_diacritics(&output);
    }
    WHITESPACE_REGEX.replace_all(output.trim(), " ").into_owned()
}

/// Decomposes to NFD and drops combining marks attached to Latin, Greek or
/// Cyrillic letters, spells out the handful of Latin letters that have no
/// decomposition, then recomposes to NFC.
///
/// Marks on other scripts, such as kana voicing marks, are kept.
fn fold_diacritics(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut base: Option<char> = None;
    for ch in input.nfd() {
        if is_combining_mark(ch) {
            if !base.is_some_and(is_foldable) {
                output.push(ch);
            }
            continue;
        }
        base = Some(ch);
        match ch {
            'ß' => output.push_str("ss"),
            'æ' => output.push_str("ae"),
            'Æ' => output.push_str("AE"),
            'œ' => output.push_str("oe"),
            'Œ' => output.push_str("OE"),
            'ø' => output.push('o'),
            'Ø' => output.push('O'),
            'ł' => output.push('l'),
            'Ł' => output.push('L'),
            'đ' => output.push('d'),
            'Đ' => output.push('D'),
            other => output.push(other),
        }
    }
    output.nfc().collect()
}

/// Latin, Greek and Cyrillic blocks, including their extended ranges.
fn is_foldable(ch: char) -> bool {
    matches!(
        ch,
        '\u{0000}'..='\u{052F}'
            | '\u{1C80}'..='\u{1C8F}'
            | '\u{1D00}'..='\u{1FFF}'
            | '\u{2C60}'..='\u{2C7F}'
            | '\u{A640}'..='\u{A7FF}'
            | '\u{AB30}'..='\u{AB6F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BRACKETS_AND_DIACRITICS: FuzzyOptions = FuzzyOptions {
        replace_diacritics: true,
        remove_characters: false,
        remove_brackets: true,
    };

    #[test]
    fn brackets_are_removed_before_folding() {
        assert_eq!(fuzzy("(Café)", &BRACKETS_AND_DIACRITICS), "Cafe");
    }

    #[rstest]
    #[case("Pokémon Snap", FuzzyOptions::default(), "Pokémon Snap")]
    #[case("  Pokémon   Snap ", FuzzyOptions::default(), "Pokémon Snap")]
    #[case("Pokémon Snap", FuzzyOptions::all(), "Pokemon Snap")]
    #[case("Super Mario Bros. 3 (USA) [!]", FuzzyOptions::all(), "Super Mario Bros 3 USA")]
    #[case("Zelda: A Link to the Past", FuzzyOptions { remove_characters: true, ..Default::default() }, "Zelda A Link to the Past")]
    #[case("Straße Œuvre Łódź", FuzzyOptions { replace_diacritics: true, ..Default::default() }, "Strasse OEuvre Lodz")]
    #[case("[Hack] {v1.1} <beta>", FuzzyOptions { remove_brackets: true, ..Default::default() }, "Hack v1.1 beta")]
    #[case("!!!", FuzzyOptions::all(), "")]
    #[case("한국", FuzzyOptions { replace_diacritics: true, ..Default::default() }, "한국")]
    #[case("ドラゴンクエスト", FuzzyOptions { replace_diacritics: true, ..Default::default() }, "ドラゴンクエスト")]
    #[case("ポケモン ピカチュウ", FuzzyOptions::all(), "ポケモン ピカチュウ")]
    #[case("Ёжик Ελληνικά", FuzzyOptions { replace_diacritics: true, ..Default::default() }, "Ежик Ελληνικα")]
    fn normalizes(#[case] input: &str, #[case] options: FuzzyOptions, #[case] expected: &str) {
        assert_eq!(fuzzy(input, &options), expected);
    }

    #[test]
    fn default_options_only_collapse_whitespace() {
        assert_eq!(fuzzy("\tThe  Legend (of) Zelda\n", &FuzzyOptions::default()), "The Legend (of) Zelda");
    }

    #[test]
    fn folding_recomposes_to_nfc() {
        let options = FuzzyOptions {
            replace_diacritics: true,
            ..Default::default()
        };
        let folded = fuzzy("ドラゴン 한국 Café", &options);
        assert_eq!(folded, "ドラゴン 한국 Cafe");
        assert_eq!(folded.chars().count(), 12);
    }

    #[test]
    fn decomposed_input_survives_character_stripping() {
        // "e" followed by U+0301 COMBINING ACUTE ACCENT.
        let decomposed = "Cafe\u{301}";
        let options = FuzzyOptions {
            remove_characters: true,
            replace_diacritics: false,
            remove_brackets: false,
        };
        assert_eq!(fuzzy(decomposed, &options), decomposed);
        assert_eq!(fuzzy(decomposed, &FuzzyOptions::all()), "Cafe");
    }
}
