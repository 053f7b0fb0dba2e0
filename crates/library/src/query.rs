//! Search strings for online artwork providers.

use srm_config::{Configuration, Field, is_visible};
use srm_template::error::{EvalError, ParseError};
use srm_template::{Ast, BindingEnvironment, Delimiters, MissingPolicy, parse};
use std::fmt::Debug;

/// Produces the strings an online provider is searched with for one file.
pub trait QueryBuilder: Debug + Send + Sync {
    fn queries(&self, env: &BindingEnvironment, policy: MissingPolicy) -> Result<Vec<String>, EvalError>;
}

/// Evaluates the parser's online image query templates. Produces nothing
/// when no image provider is selected.
#[derive(Debug, Clone, Default)]
pub struct TemplateQueries {
    templates: Vec<Ast>,
}
impl TemplateQueries {
    pub fn new(config: &Configuration) -> Result<Self, ParseError> {
        if !is_visible(Field::OnlineImageQueries, config) {
            return Ok(Self::default());
        }
        let delimiters = Delimiters::default();
        let templates = config
            .online_image_queries
            .iter()
            .map(|query| parse(query, &delimiters))
            .collect::<Result<_, _>>()?;
        Ok(Self { templates })
    }
}
impl QueryBuilder for TemplateQueries {
    fn queries(&self, env: &BindingEnvironment, policy: MissingPolicy) -> Result<Vec<String>, EvalError> {
        let mut queries: Vec<String> = Vec::with_capacity(self.templates.len());
        for template in &self.templates {
            let query = template.evaluate(env, policy)?.trim().to_string();
            if !query.is_empty() && !queries.contains(&query) {
                queries.push(query);
            }
        }
        Ok(queries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srm_config::ImageProvider;

    fn env() -> BindingEnvironment {
        BindingEnvironment::new().with("fuzzyTitle", "Tetris").with("title", "Tetris")
    }

    #[test]
    fn no_provider_no_queries() {
        let queries = TemplateQueries::new(&Configuration::default()).unwrap();
        assert!(queries.queries(&env(), MissingPolicy::SkipFile).unwrap().is_empty());
    }

    #[test]
    fn queries_are_trimmed_and_deduplicated() {
        let config = Configuration {
            image_providers: vec![ImageProvider::SteamGridDb],
            online_image_queries: vec!["${fuzzyTitle}".into(), " ${title} ".into(), "${missing}".into()],
            ..Default::default()
        };
        let queries = TemplateQueries::new(&config).unwrap();
        assert_eq!(queries.queries(&env(), MissingPolicy::RenderEmpty).unwrap(), vec!["Tetris"]);
        assert!(queries.queries(&env(), MissingPolicy::SkipFile).is_err());
    }
}
