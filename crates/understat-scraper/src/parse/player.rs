use understat_core::EntityCategory;

use super::parse_query;
use crate::error::UnderstatError;
use crate::registry::query;
use crate::types::Dataset;

/// Parser for pages of the form `https://understat.com/player/<player_id>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerParser;

impl PlayerParser {
    const CATEGORY: EntityCategory = EntityCategory::Player;

    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_match_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::MATCH_DATA)
    }

    /// Every shot the player has taken, oldest first.
    ///
    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_shot_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::SHOT_DATA)
    }

    /// Per-season splits (by season, position and situation).
    ///
    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_season_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::SEASON_DATA)
    }
}
