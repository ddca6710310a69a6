use understat_core::EntityCategory;

use super::{normalise_base_url, page_url, validate_season};
use crate::error::{UnderstatError, ValidationError};
use crate::parse::TeamParser;
use crate::transport::Fetch;
use crate::types::Dataset;

/// Endpoint for team pages, `https://understat.com/team/<team>/<season>`.
///
/// Team names are open-ended (the site uses names like `Manchester_United`),
/// so only emptiness is rejected locally.
pub struct TeamEndpoint<T> {
    transport: T,
    base_url: String,
    parser: TeamParser,
}

impl<T: Fetch> TeamEndpoint<T> {
    const CATEGORY: EntityCategory = EntityCategory::Team;

    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: normalise_base_url(base_url),
            parser: TeamParser,
        }
    }

    /// Validates `team` and `season` and builds the page URL.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidTeam`] if `team` is blank.
    /// - [`ValidationError::InvalidSeason`] if `season` is not a covered
    ///   four-digit year.
    pub fn url(&self, team: &str, season: &str) -> Result<String, ValidationError> {
        if team.trim().is_empty() {
            return Err(ValidationError::InvalidTeam {
                category: Self::CATEGORY,
                value: team.to_owned(),
            });
        }
        let season = validate_season(Self::CATEGORY, season)?;
        Ok(page_url(
            &self.base_url,
            Self::CATEGORY,
            &[team, &season.to_string()],
        ))
    }

    /// Season totals for every player in the squad.
    ///
    /// # Errors
    ///
    /// - [`UnderstatError::Validation`] for a bad team or season (no request made).
    /// - [`UnderstatError::Transport`] if the page cannot be fetched.
    /// - [`UnderstatError::Extraction`] if the page lacks the expected data.
    pub fn get_player_data(&self, team: &str, season: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(team, season)?;
        self.parser.get_player_data(&page)
    }

    /// The team's fixtures for the season.
    ///
    /// # Errors
    ///
    /// See [`TeamEndpoint::get_player_data`].
    pub fn get_match_data(&self, team: &str, season: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(team, season)?;
        self.parser.get_match_data(&page)
    }

    /// Team stats split by game context.
    ///
    /// # Errors
    ///
    /// See [`TeamEndpoint::get_player_data`].
    pub fn get_context_data(&self, team: &str, season: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(team, season)?;
        self.parser.get_context_data(&page)
    }

    fn fetch_page(&self, team: &str, season: &str) -> Result<String, UnderstatError> {
        let url = self.url(team, season)?;
        tracing::debug!(%url, team, season, "fetching team page");
        Ok(self.transport.fetch(&url)?)
    }
}
