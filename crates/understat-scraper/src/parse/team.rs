use understat_core::EntityCategory;

use super::parse_query;
use crate::error::UnderstatError;
use crate::registry::query;
use crate::types::Dataset;

/// Parser for pages of the form `https://understat.com/team/<team>/<season>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamParser;

impl TeamParser {
    const CATEGORY: EntityCategory = EntityCategory::Team;

    /// Season totals for every player in the squad.
    ///
    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_player_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::PLAYER_DATA)
    }

    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_match_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::MATCH_DATA)
    }

    /// Team stats split by game context (situation, formation, game state, ...).
    ///
    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_context_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::CONTEXT_DATA)
    }
}
