//! Settings and parser configuration.

pub mod error;
mod models;
mod settings;
mod snapshot;
mod validate;
mod visibility;

pub use crate::models::{
    ArtworkKind, ArtworkTemplates, Configuration, DEFAULT_EXECUTABLE_MODIFIER, DEFAULT_LOCAL_PATTERN,
    DEFAULT_TITLE_MODIFIER, Executable, ImageProvider, ParserType, TitleFromVariable, UserAccounts,
};
pub use crate::settings::{DEFAULT_WORKERS, ENV_PREFIX, Settings};
pub use crate::snapshot::Snapshot;
pub use crate::visibility::{Field, is_visible};
