//! Title extraction and normalization.
//!
//! A [`TitleRule`] turns a scanned path into a raw title, an optional custom
//! variable lookup may replace it, and [`fuzzy`] normalizes the result for
//! matching and display.

mod consts;
pub mod error;
mod fuzzy;
mod rule;
mod variables;

pub use crate::fuzzy::{FuzzyOptions, fuzzy};
pub use crate::rule::{FileStem, GlobTitle, RegexCapture, TITLE, TitleRule};
pub use crate::variables::{CustomVariables, title_from_variable};
