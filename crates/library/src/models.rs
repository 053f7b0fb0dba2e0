use derive_more::Display;
use srm_config::ArtworkKind;
use srm_steam::{AccountRecord, ShortcutIdentity};
use srm_template::error::EvalErrorKind;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// An artwork file found on disk, numbered in the order it was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexedPath {
    pub index: usize,
    pub path: PathBuf,
}

/// A scanned file that made it all the way through classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub file_path: PathBuf,
    pub extracted_title: String,
    pub fuzzy_title: String,
    /// Never empty.
    pub final_title: String,
    pub modified_executable_location: String,
    pub argument_string: String,
    pub start_in_directory: String,
    pub steam_categories: Vec<String>,
    pub image_pool: String,
    pub online_image_queries: Vec<String>,
    // Every artwork map has an entry for every ArtworkKind.
    pub default_image: BTreeMap<ArtworkKind, Option<PathBuf>>,
    pub local_images: BTreeMap<ArtworkKind, Vec<String>>,
    pub resolved_default_images: BTreeMap<ArtworkKind, Vec<IndexedPath>>,
    pub resolved_local_images: BTreeMap<ArtworkKind, Vec<IndexedPath>>,
    pub identity: ShortcutIdentity,
    pub exclusion_key: String,
}
impl CandidateFile {
    /// The image to use for `kind`: the first local match, else the first
    /// default match.
    pub fn preferred_image(&self, kind: ArtworkKind) -> Option<&Path> {
        fn first(images: &BTreeMap<ArtworkKind, Vec<IndexedPath>>, kind: ArtworkKind) -> Option<&Path> {
            images.get(&kind).and_then(|paths| paths.first()).map(|p| p.path.as_path())
        }
        first(&self.resolved_local_images, kind).or_else(|| first(&self.resolved_default_images, kind))
    }
}

/// Why a file was not accepted.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum FailureReason {
    #[display("no title could be extracted")]
    NoTitle,
    #[display("no custom variable matches title '{_0}'")]
    VariableNotFound(String),
    #[display("unresolved placeholder: {_0}")]
    UnresolvedPlaceholder(String),
    #[display("final title is empty")]
    EmptyFinalTitle,
    #[display("invalid {kind} artwork pattern: {pattern}")]
    InvalidArtworkPattern { kind: ArtworkKind, pattern: String },
    #[display("classification was aborted")]
    Aborted,
}
impl From<&EvalErrorKind> for FailureReason {
    fn from(kind: &EvalErrorKind) -> Self {
        match kind {
            EvalErrorKind::UnresolvedPlaceholder(key) => Self::UnresolvedPlaceholder(key.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub file_path: PathBuf,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedFile {
    pub file_path: PathBuf,
    pub exclusion_key: String,
}

/// Where a single file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted(Box<CandidateFile>),
    Failed(FailedFile),
    Excluded(ExcludedFile),
}
impl Outcome {
    pub fn file_path(&self) -> &Path {
        match self {
            Self::Accepted(candidate) => &candidate.file_path,
            Self::Failed(failed) => &failed.file_path,
            Self::Excluded(excluded) => &excluded.file_path,
        }
    }
}

/// Everything one classification run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Sorted by final title, case-insensitively, then by path.
    pub accepted: Vec<CandidateFile>,
    pub failed: Vec<FailedFile>,
    pub excluded: Vec<ExcludedFile>,
    pub found_accounts: Vec<AccountRecord>,
    pub missing_accounts: Vec<String>,
    /// Accounts were required but none were found.
    pub has_no_usable_accounts: bool,
}
impl BatchResult {
    /// Number of files classified, in any partition.
    pub fn len(&self) -> usize {
        self.accepted.len() + self.failed.len() + self.excluded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn push(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Accepted(candidate) => self.accepted.push(*candidate),
            Outcome::Failed(failed) => self.failed.push(failed),
            Outcome::Excluded(excluded) => self.excluded.push(excluded),
        }
    }

    pub(crate) fn sort(&mut self) {
        self.accepted.sort_by(|a, b| {
            a.final_title
                .to_lowercase()
                .cmp(&b.final_title.to_lowercase())
                .then_with(|| a.file_path.cmp(&b.file_path))
        });
        self.failed.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        self.excluded.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srm_steam::assign;

    fn indexed(paths: &[&str]) -> Vec<IndexedPath> {
        paths
            .iter()
            .enumerate()
            .map(|(index, path)| IndexedPath {
                index,
                path: PathBuf::from(path),
            })
            .collect()
    }

    fn candidate() -> CandidateFile {
        CandidateFile {
            file_path: PathBuf::from("/roms/Tetris.gb"),
            extracted_title: "Tetris".to_string(),
            fuzzy_title: "Tetris".to_string(),
            final_title: "Tetris".to_string(),
            modified_executable_location: "\"/usr/bin/emu\"".to_string(),
            argument_string: String::new(),
            start_in_directory: "/usr/bin".to_string(),
            steam_categories: Vec::new(),
            image_pool: "Tetris".to_string(),
            online_image_queries: Vec::new(),
            default_image: BTreeMap::new(),
            local_images: BTreeMap::new(),
            resolved_default_images: BTreeMap::from([
                (ArtworkKind::Tall, indexed(&["/art/default-tall.png"])),
                (ArtworkKind::Hero, indexed(&["/art/default-hero.png"])),
            ]),
            resolved_local_images: BTreeMap::from([
                (ArtworkKind::Tall, indexed(&["/art/Tetris.png", "/art/Tetris.jpg"])),
                (ArtworkKind::Hero, Vec::new()),
            ]),
            identity: assign("\"/usr/bin/emu\"", "Tetris"),
            exclusion_key: String::new(),
        }
    }

    #[test]
    fn preferred_image_favours_local_then_default() {
        let candidate = candidate();
        assert_eq!(candidate.preferred_image(ArtworkKind::Tall), Some(Path::new("/art/Tetris.png")));
        assert_eq!(candidate.preferred_image(ArtworkKind::Hero), Some(Path::new("/art/default-hero.png")));
        assert_eq!(candidate.preferred_image(ArtworkKind::Logo), None);
    }
}
