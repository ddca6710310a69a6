//! Named accessors over the datasets embedded in each page category.
//!
//! Parsers only pair a registry lookup with [`crate::extract::extract`]; they
//! never touch the network, so they can be run against saved pages.

mod league;
mod match_page;
mod player;
mod team;

pub use league::LeagueParser;
pub use match_page::MatchParser;
pub use player::PlayerParser;
pub use team::TeamParser;

use understat_core::EntityCategory;

use crate::error::UnderstatError;
use crate::extract::extract;
use crate::registry;
use crate::types::Dataset;

/// Decodes the dataset registered as `query` for `category` from `page`.
///
/// # Errors
///
/// Returns [`UnderstatError::UnknownQuery`] for an unregistered pair and
/// [`UnderstatError::Extraction`] if the page does not carry the variable in
/// the expected form.
pub fn parse_query(
    page: &str,
    category: EntityCategory,
    query: &str,
) -> Result<Dataset, UnderstatError> {
    let key = registry::lookup(category, query)?;
    Ok(extract(page, key)?)
}
