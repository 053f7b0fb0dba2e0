//! Template well-formedness of every template field of a parser.

use crate::error::{ErrorKind, Result};
use crate::models::{ArtworkKind, Configuration};
use crate::visibility::{Field, is_visible};
use exn::ResultExt;
use srm_template::{Delimiters, parse};

impl Configuration {
    /// Every visible template field with the name it's reported under.
    pub fn templates(&self) -> Vec<(&'static str, &str)> {
        let mut templates = vec![
            ("steamDirectory", self.steam_directory.as_str()),
            ("romDirectory", self.rom_directory.as_str()),
            ("executable.path", self.executable.path.as_str()),
            ("executableArgs", self.executable_args.as_str()),
            ("executableModifier", self.executable_modifier.as_str()),
            ("startInDirectory", self.start_in_directory.as_str()),
            ("titleModifier", self.title_modifier.as_str()),
            ("imagePool", self.image_pool.as_str()),
        ];
        if is_visible(Field::ParserInput, self) {
            templates.push(("parserInput", self.parser_input.as_str()));
        }
        templates.extend(self.steam_categories.iter().map(|c| ("steamCategories", c.as_str())));
        if is_visible(Field::OnlineImageQueries, self) {
            templates.extend(self.online_image_queries.iter().map(|q| ("onlineImageQueries", q.as_str())));
        }
        for (kind, artwork) in &self.artwork {
            let (default_image, local_images, local_pattern) = match kind {
                ArtworkKind::Tall => ("artwork.tall.defaultImage", "artwork.tall.localImages", "artwork.tall.localPattern"),
                ArtworkKind::Long => ("artwork.long.defaultImage", "artwork.long.localImages", "artwork.long.localPattern"),
                ArtworkKind::Hero => ("artwork.hero.defaultImage", "artwork.hero.localImages", "artwork.hero.localPattern"),
                ArtworkKind::Logo => ("artwork.logo.defaultImage", "artwork.logo.localImages", "artwork.logo.localPattern"),
                ArtworkKind::Icon => ("artwork.icon.defaultImage", "artwork.icon.localImages", "artwork.icon.localPattern"),
            };
            templates.push((default_image, artwork.default_image.as_str()));
            templates.push((local_images, artwork.local_images.as_str()));
            templates.push((local_pattern, artwork.local_pattern.as_str()));
        }
        templates
    }

    /// Checks that every visible template field parses.
    pub fn validate_templates(&self) -> Result<()> {
        let delimiters = Delimiters::default();
        for (field, value) in self.templates() {
            parse(value, &delimiters).or_raise(|| ErrorKind::InvalidTemplate {
                parser: self.name(),
                field,
                value: value.to_string(),
            })?;
        }
        Ok(())
    }
}
