//! Which configuration fields take part in a parser, given the values of the
//! others. Hidden fields keep their values but are neither validated nor
//! read by the pipeline.

use crate::models::Configuration;
use derive_more::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    #[display("parserInput")]
    ParserInput,
    #[display("titleFromVariable.caseInsensitiveVariables")]
    CaseInsensitiveVariables,
    #[display("titleFromVariable.skipFileIfVariableWasNotFound")]
    SkipFileIfVariableWasNotFound,
    #[display("onlineImageQueries")]
    OnlineImageQueries,
    #[display("userAccounts.specifiedAccounts")]
    SpecifiedAccounts,
}

pub fn is_visible(field: Field, config: &Configuration) -> bool {
    match field {
        Field::ParserInput => config.parser_type.has_input(),
        Field::CaseInsensitiveVariables | Field::SkipFileIfVariableWasNotFound => {
            !config.title_from_variable.limit_to_groups.is_empty()
        },
        Field::OnlineImageQueries => !config.image_providers.is_empty(),
        Field::SpecifiedAccounts => config.requires_accounts(),
    }
}
