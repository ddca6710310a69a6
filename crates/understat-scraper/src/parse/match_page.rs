use understat_core::EntityCategory;

use super::parse_query;
use crate::error::UnderstatError;
use crate::registry::query;
use crate::types::Dataset;

/// Parser for pages of the form `https://understat.com/match/<match_id>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchParser;

impl MatchParser {
    const CATEGORY: EntityCategory = EntityCategory::Match;

    /// Shots of both sides, grouped under `h` and `a`.
    ///
    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_shot_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::SHOT_DATA)
    }

    /// Lineups and per-player match stats for each side.
    ///
    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_roster_data(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::ROSTER_DATA)
    }

    /// Header information: teams, score, date, league and season.
    ///
    /// # Errors
    ///
    /// See [`parse_query`].
    pub fn get_match_info(&self, page: &str) -> Result<Dataset, UnderstatError> {
        parse_query(page, Self::CATEGORY, query::MATCH_INFO)
    }
}
