//! Parser templates, parsed once per [`Context`](crate::Context).

use srm_config::{ArtworkKind, Configuration};
use srm_template::error::ParseError;
use srm_template::{Ast, Delimiters, parse};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub(crate) struct ArtworkAsts {
    pub default_image: Ast,
    pub local_images: Ast,
    pub local_pattern: Ast,
}

#[derive(Debug, Clone)]
pub(crate) struct Templates {
    pub executable_path: Ast,
    pub executable_modifier: Ast,
    pub executable_args: Ast,
    pub start_in_directory: Ast,
    pub title_modifier: Ast,
    pub image_pool: Ast,
    pub steam_categories: Vec<Ast>,
    pub artwork: BTreeMap<ArtworkKind, ArtworkAsts>,
}
impl Templates {
    pub fn compile(config: &Configuration) -> Result<Self, ParseError> {
        let delimiters = Delimiters::default();
        let compile = |template: &str| parse(template, &delimiters);
        let mut artwork = BTreeMap::new();
        for kind in ArtworkKind::ALL {
            let templates = config.artwork_templates(kind);
            artwork.insert(kind, ArtworkAsts {
                default_image: compile(&templates.default_image)?,
                local_images: compile(&templates.local_images)?,
                local_pattern: compile(&templates.local_pattern)?,
            });
        }
        Ok(Self {
            executable_path: compile(&config.executable.path)?,
            executable_modifier: compile(&config.executable_modifier)?,
            executable_args: compile(&config.executable_args)?,
            start_in_directory: compile(&config.start_in_directory)?,
            title_modifier: compile(&config.title_modifier)?,
            image_pool: compile(&config.image_pool)?,
            steam_categories: config.steam_categories.iter().map(|c| compile(c)).collect::<Result<_, _>>()?,
            artwork,
        })
    }
}
