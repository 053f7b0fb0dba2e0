//! Loading of the settings document.
//!
//! The document may be TOML, YAML or JSON (chosen by extension). Values from
//! `SRM_`-prefixed environment variables are merged over it, with `__`
//! separating nested keys (`SRM_WORKERS=4`).

use crate::error::{ErrorKind, Result};
use crate::models::Configuration;
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use serde::{Deserialize, Serialize};
use srm_extract::CustomVariables;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const ENV_PREFIX: &str = "SRM_";
pub const DEFAULT_WORKERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub parsers: Vec<Configuration>,
    /// Maximum number of files classified at once.
    pub workers: usize,
    /// Exclusion keys of matches that should never be added.
    pub exclusions: Vec<String>,
    /// Placeholders available to every parser, like `steamDirGlobal`.
    pub variables: BTreeMap<String, String>,
    pub custom_variables: CustomVariables,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            parsers: Vec::new(),
            workers: DEFAULT_WORKERS,
            exclusions: Vec::new(),
            variables: BTreeMap::new(),
            custom_variables: CustomVariables::new(),
        }
    }
}
impl Settings {
    /// `config.toml` in the platform's per-user configuration directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "srm").ok_or_raise(|| ErrorKind::NoConfigDirectory)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Loads settings from `path` merged with the environment. A document
    /// that doesn't exist contributes nothing, leaving the defaults.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let figment = Figment::new().merge(document(path)?).merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment, path)
    }

    fn from_figment(figment: Figment, path: &Path) -> Result<Self> {
        let settings: Self = figment
            .extract()
            .or_raise(|| ErrorKind::Load(path.display().to_string()))?;
        for parser in &settings.parsers {
            parser.validate_templates()?;
        }
        tracing::debug!(parsers = settings.parsers.len(), workers = settings.workers, "Loaded settings");
        Ok(settings)
    }

    pub fn enabled_parsers(&self) -> impl Iterator<Item = &Configuration> {
        self.parsers.iter().filter(|parser| !parser.disabled)
    }
}

fn document(path: &Path) -> Result<Figment> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    Ok(match extension.as_str() {
        "toml" => Figment::from(Toml::file(path)),
        "yaml" | "yml" => Figment::from(Yaml::file(path)),
        "json" => Figment::from(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.display().to_string())),
    })
}
