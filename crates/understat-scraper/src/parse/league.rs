use understat_core::EntityCategory;

use super::parse_query;
use crate::error::UnderstatError;
use crate::registry::query;
use crate::types::Dataset;

/// Parser for pages of the form `https://understat.com/league/<league>/<season>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeagueParser;

impl LeagueParser {
    const CATEGORY: EntityCategory = EntityCategory::League;

    /// Season totals for every team in the league, keyed by team id.
    ///
    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_team_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::TEAM_DATA)
    }

    /// All fixtures of the season, played or not.
    ///
    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_match_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::MATCH_DATA)
    }

    /// Season totals for every player in the league.
    ///
    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_player_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::PLAYER_DATA)
    }
}
