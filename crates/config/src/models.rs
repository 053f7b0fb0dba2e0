//! The parser configuration as read from the settings document.
//!
//! Field names follow the camelCase used by existing Steam ROM Manager
//! exports so documents can be shared.

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use srm_extract::{FileStem, FuzzyOptions, GlobTitle, RegexCapture, TitleRule};
use std::collections::BTreeMap;

/// Executable modifier used when none is configured: the path, quoted.
pub const DEFAULT_EXECUTABLE_MODIFIER: &str = "\"${exePath}\"";
/// Title modifier, image pool and online query used when none is configured.
pub const DEFAULT_TITLE_MODIFIER: &str = "${fuzzyTitle}";
/// Pattern appended to a local image directory when no pattern is configured.
pub const DEFAULT_LOCAL_PATTERN: &str = "${finalTitle}.@(png|PNG|jpg|JPG|webp|WEBP)";

/// How titles are extracted from scanned paths.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParserType {
    /// A glob with a `${title}` placeholder.
    #[display("Glob")]
    #[serde(rename = "Glob")]
    Glob,
    /// A regular expression with a `title` capture group.
    #[display("Glob-regex")]
    #[serde(rename = "Glob-regex")]
    GlobRegex,
    /// The file name without its extension.
    #[display("File name")]
    #[serde(rename = "File name")]
    FileName,
}
impl ParserType {
    /// Whether the parser type reads [`Configuration::parser_input`].
    pub fn has_input(&self) -> bool {
        !matches!(self, Self::FileName)
    }
}

/// The artwork slots Steam shows for a shortcut.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkKind {
    /// Portrait library capsule.
    #[display("tall")]
    Tall,
    /// Landscape grid image.
    #[display("long")]
    Long,
    #[display("hero")]
    Hero,
    #[display("logo")]
    Logo,
    #[display("icon")]
    Icon,
}
impl ArtworkKind {
    pub const ALL: [ArtworkKind; 5] = [Self::Tall, Self::Long, Self::Hero, Self::Logo, Self::Icon];
}

/// Online artwork providers that can be queried with the online image queries.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageProvider {
    #[display("SteamGridDB")]
    #[serde(rename = "SteamGridDB")]
    SteamGridDb,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Executable {
    /// Template of the executable launching each file. Empty when the
    /// scanned files are themselves executable.
    pub path: String,
    /// Put the arguments on the executable line instead of in the launch
    /// options.
    pub append_args_to_executable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TitleFromVariable {
    /// Custom variable groups to look the extracted title up in; empty
    /// disables the lookup.
    pub limit_to_groups: Vec<String>,
    pub case_insensitive_variables: bool,
    pub skip_file_if_variable_was_not_found: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserAccounts {
    /// Account names (or IDs) to add shortcuts for; empty means all.
    pub specified_accounts: Vec<String>,
}

/// Where artwork of one kind is found locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtworkTemplates {
    /// Template of a single fallback image path.
    pub default_image: String,
    /// Template of the directory searched for images; empty disables the search.
    pub local_images: String,
    /// Glob appended to [`local_images`](Self::local_images).
    pub local_pattern: String,
}
impl Default for ArtworkTemplates {
    fn default() -> Self {
        Self {
            default_image: String::new(),
            local_images: String::new(),
            local_pattern: DEFAULT_LOCAL_PATTERN.to_string(),
        }
    }
}

/// One parser: how a directory of files turns into shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    pub parser_type: ParserType,
    pub config_title: String,
    pub parser_id: String,
    pub disabled: bool,
    pub steam_directory: String,
    pub rom_directory: String,
    /// Extensions (without the dot) of files to scan; empty scans everything.
    pub extensions: Vec<String>,
    /// Glob or regex, depending on [`parser_type`](Self::parser_type).
    pub parser_input: String,
    pub executable: Executable,
    pub executable_args: String,
    pub executable_modifier: String,
    /// Template of the working directory; empty uses the executable's directory.
    pub start_in_directory: String,
    pub title_modifier: String,
    pub fuzzy_match: FuzzyOptions,
    pub title_from_variable: TitleFromVariable,
    pub user_accounts: UserAccounts,
    pub steam_categories: Vec<String>,
    pub image_pool: String,
    pub image_providers: Vec<ImageProvider>,
    pub online_image_queries: Vec<String>,
    pub artwork: BTreeMap<ArtworkKind, ArtworkTemplates>,
}
impl Default for Configuration {
    fn default() -> Self {
        Self {
            parser_type: ParserType::Glob,
            config_title: String::new(),
            parser_id: String::new(),
            disabled: false,
            steam_directory: String::new(),
            rom_directory: String::new(),
            extensions: Vec::new(),
            parser_input: String::new(),
            executable: Executable::default(),
            executable_args: String::new(),
            executable_modifier: DEFAULT_EXECUTABLE_MODIFIER.to_string(),
            start_in_directory: String::new(),
            title_modifier: DEFAULT_TITLE_MODIFIER.to_string(),
            fuzzy_match: FuzzyOptions::default(),
            title_from_variable: TitleFromVariable::default(),
            user_accounts: UserAccounts::default(),
            steam_categories: Vec::new(),
            image_pool: DEFAULT_TITLE_MODIFIER.to_string(),
            image_providers: Vec::new(),
            online_image_queries: vec![DEFAULT_TITLE_MODIFIER.to_string()],
            artwork: BTreeMap::new(),
        }
    }
}
impl Configuration {
    /// Display name: the configured title, else the parser type.
    pub fn name(&self) -> String {
        if self.config_title.is_empty() {
            self.parser_type.to_string()
        } else {
            self.config_title.clone()
        }
    }

    /// Accounts are only required when shortcuts target a Steam installation.
    pub fn requires_accounts(&self) -> bool {
        !self.steam_directory.trim().is_empty()
    }

    /// Templates for `kind`; kinds that aren't configured get the defaults.
    pub fn artwork_templates(&self, kind: ArtworkKind) -> ArtworkTemplates {
        self.artwork.get(&kind).cloned().unwrap_or_default()
    }

    /// Builds the title rule selected by [`parser_type`](Self::parser_type).
    pub fn title_rule(&self) -> Result<Box<dyn TitleRule>> {
        let invalid = || ErrorKind::InvalidParserInput(self.name());
        Ok(match self.parser_type {
            ParserType::FileName => Box::new(FileStem),
            ParserType::Glob => Box::new(GlobTitle::new(&self.parser_input).or_raise(invalid)?),
            ParserType::GlobRegex => Box::new(RegexCapture::new(&self.parser_input).or_raise(invalid)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ParserType::Glob, "\"Glob\"")]
    #[case(ParserType::GlobRegex, "\"Glob-regex\"")]
    #[case(ParserType::FileName, "\"File name\"")]
    fn parser_type_names_are_stable(#[case] parser_type: ParserType, #[case] name: &str) {
        assert_eq!(format!("\"{parser_type}\""), name);
    }

    #[test]
    fn defaults() {
        let config = Configuration::default();
        assert_eq!(config.executable_modifier, "\"${exePath}\"");
        assert_eq!(config.title_modifier, "${fuzzyTitle}");
        assert_eq!(config.online_image_queries, vec!["${fuzzyTitle}"]);
        assert_eq!(config.artwork_templates(ArtworkKind::Hero).local_pattern, DEFAULT_LOCAL_PATTERN);
        assert!(!config.requires_accounts());
        assert_eq!(config.name(), "Glob");
    }

    #[test]
    fn title_rule_reports_bad_input() {
        let config = Configuration {
            config_title: "SNES".to_string(),
            parser_input: "*.sfc".to_string(),
            ..Default::default()
        };
        let err = config.title_rule().unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidParserInput("SNES".to_string()));
    }

    #[test]
    fn title_rule_per_parser_type() {
        let mut config = Configuration {
            parser_type: ParserType::FileName,
            ..Default::default()
        };
        assert_eq!(config.title_rule().unwrap().extract("a/Tetris.gb").as_deref(), Some("Tetris"));
        config.parser_type = ParserType::GlobRegex;
        config.parser_input = r"^(?P<title>.+)\.gb$".to_string();
        assert_eq!(config.title_rule().unwrap().extract("Tetris.gb").as_deref(), Some("Tetris"));
    }
}
