//! Turning a parser configuration and a directory of files into a
//! [`BatchResult`].
//!
//! Build a [`Context`] once per parser, [`scan`](scan::scan) its ROM
//! directory, then [`classify`] the scanned files. [`classify_stream`] exposes
//! the same work as a stream of [`ClassifyEvent`]s for progress reporting.

mod artwork;
mod classify;
pub mod error;
mod models;
mod query;
pub mod scan;
mod templates;

pub use crate::artwork::ResolvedArtwork;
pub use crate::classify::{ClassifyEvent, classify, classify_file, classify_stream};
pub use crate::models::{BatchResult, CandidateFile, ExcludedFile, FailedFile, FailureReason, IndexedPath, Outcome};
pub use crate::query::{QueryBuilder, TemplateQueries};
use crate::error::{ErrorKind, Result};
use crate::templates::Templates;
use exn::ResultExt;
use srm_config::{Configuration, DEFAULT_WORKERS, Settings};
use srm_extract::{CustomVariables, TitleRule};
use srm_steam::{ExclusionRegistry, ExclusionSet};
use srm_template::{BindingEnvironment, Delimiters, MissingPolicy, parse};
use std::collections::BTreeMap;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};
use std::sync::Arc;

/// Everything classification needs for one parser. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Arc<Configuration>,
    pub rule: Arc<dyn TitleRule>,
    pub exclusions: Arc<dyn ExclusionRegistry>,
    pub queries: Arc<dyn QueryBuilder>,
    pub custom_variables: Arc<CustomVariables>,
    /// Maximum number of files classified at once.
    pub workers: usize,
    pub(crate) templates: Arc<Templates>,
    /// Placeholders shared by every file of the parser.
    pub(crate) scope: Arc<BindingEnvironment>,
    rom_directory: PathBuf,
    steam_directory: Option<PathBuf>,
}
impl Context {
    /// Builds a context for `config` with global `variables`, no exclusions
    /// and online queries from the configuration.
    ///
    /// The ROM and Steam directories are rendered here, against `variables`
    /// only.
    pub fn new(config: Configuration, variables: &BTreeMap<String, String>) -> Result<Self> {
        let rule = config.title_rule().or_raise(|| ErrorKind::Configuration)?;
        let templates = Templates::compile(&config).or_raise(|| ErrorKind::Configuration)?;
        let queries = TemplateQueries::new(&config).or_raise(|| ErrorKind::Configuration)?;

        let mut scope = if config.title_from_variable.case_insensitive_variables {
            BindingEnvironment::case_insensitive()
        } else {
            BindingEnvironment::new()
        };
        scope.extend(variables.iter());
        let policy = missing_policy(&config);
        let render = |template: &str| -> Result<String> {
            let ast = parse(template, &Delimiters::default()).or_raise(|| ErrorKind::Configuration)?;
            let rendered = ast.evaluate(&scope, policy).or_raise(|| ErrorKind::Configuration)?;
            Ok(rendered.trim().to_string())
        };
        let rom_directory = render(&config.rom_directory)?;
        let steam_directory = render(&config.steam_directory)?;
        scope.insert("romDir", rom_directory.as_str());
        scope.insert("steamDir", steam_directory.as_str());
        scope.insert("/", MAIN_SEPARATOR_STR);

        Ok(Self {
            rule: Arc::from(rule),
            exclusions: Arc::new(ExclusionSet::new()),
            queries: Arc::new(queries),
            custom_variables: Arc::new(CustomVariables::new()),
            workers: DEFAULT_WORKERS,
            templates: Arc::new(templates),
            scope: Arc::new(scope),
            rom_directory: PathBuf::from(rom_directory),
            steam_directory: (!steam_directory.is_empty()).then(|| PathBuf::from(steam_directory)),
            config: Arc::new(config),
        })
    }

    /// Builds a context for `config` using the global parts of `settings`.
    pub fn from_settings(config: Configuration, settings: &Settings) -> Result<Self> {
        Ok(Self::new(config, &settings.variables)?
            .with_exclusions(settings.exclusions.iter().cloned().collect::<ExclusionSet>())
            .with_custom_variables(settings.custom_variables.clone())
            .with_workers(settings.workers))
    }

    pub fn with_exclusions(mut self, exclusions: impl ExclusionRegistry + 'static) -> Self {
        self.exclusions = Arc::new(exclusions);
        self
    }

    pub fn with_queries(mut self, queries: impl QueryBuilder + 'static) -> Self {
        self.queries = Arc::new(queries);
        self
    }

    pub fn with_custom_variables(mut self, custom_variables: CustomVariables) -> Self {
        self.custom_variables = Arc::new(custom_variables);
        self
    }

    /// Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// The rendered ROM directory to scan.
    pub fn rom_directory(&self) -> &Path {
        &self.rom_directory
    }

    /// The rendered Steam directory, if the parser targets one.
    pub fn steam_directory(&self) -> Option<&Path> {
        self.steam_directory.as_deref()
    }

    pub fn missing_policy(&self) -> MissingPolicy {
        missing_policy(&self.config)
    }
}

fn missing_policy(config: &Configuration) -> MissingPolicy {
    if config.title_from_variable.skip_file_if_variable_was_not_found {
        MissingPolicy::SkipFile
    } else {
        MissingPolicy::RenderEmpty
    }
}
