use understat_core::{EntityCategory, League};

use super::{normalise_base_url, page_url, validate_season};
use crate::error::{UnderstatError, ValidationError};
use crate::parse::LeagueParser;
use crate::transport::Fetch;
use crate::types::Dataset;

/// Endpoint for league pages, `https://understat.com/league/<league>/<season>`.
///
/// League codes are checked against a closed set (all six covered leagues
/// unless narrowed with [`LeagueEndpoint::with_leagues`]).
pub struct LeagueEndpoint<T> {
    transport: T,
    base_url: String,
    leagues: Vec<League>,
    parser: LeagueParser,
}

impl<T: Fetch> LeagueEndpoint<T> {
    const CATEGORY: EntityCategory = EntityCategory::League;

    pub fn new(transport: T, base_url: &str) -> Self {
        Self::with_leagues(transport, base_url, League::ALL.to_vec())
    }

    /// Creates an endpoint that only accepts the given leagues.
    pub fn with_leagues(transport: T, base_url: &str, leagues: Vec<League>) -> Self {
        Self {
            transport,
            base_url: normalise_base_url(base_url),
            leagues,
            parser: LeagueParser,
        }
    }

    /// Leagues this endpoint accepts.
    #[must_use]
    pub fn leagues(&self) -> &[League] {
        &self.leagues
    }

    /// Validates `league` and `season` and builds the page URL.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidLeague`] if `league` is not an accepted code.
    /// - [`ValidationError::InvalidSeason`] if `season` is not a covered
    ///   four-digit year.
    pub fn url(&self, league: &str, season: &str) -> Result<String, ValidationError> {
        let code = League::from_code(league)
            .filter(|l| self.leagues.contains(l))
            .ok_or_else(|| ValidationError::InvalidLeague {
                category: Self::CATEGORY,
                value: league.to_owned(),
            })?;
        let season = validate_season(Self::CATEGORY, season)?;
        Ok(page_url(
            &self.base_url,
            Self::CATEGORY,
            &[code.code(), &season.to_string()],
        ))
    }

    /// Season totals for every team in a league.
    ///
    /// # Errors
    ///
    /// - [`UnderstatError::Validation`] for a bad league or season (no request made).
    /// - [`UnderstatError::Transport`] if the page cannot be fetched.
    /// - [`UnderstatError::Extraction`] if the page lacks the expected data.
    pub fn get_team_data(&self, league: &str, season: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(league, season)?;
        self.parser.get_team_data(&page)
    }

    /// All fixtures of a league season.
    ///
    /// # Errors
    ///
    /// See [`LeagueEndpoint::get_team_data`].
    pub fn get_match_data(&self, league: &str, season: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(league, season)?;
        self.parser.get_match_data(&page)
    }

    /// Season totals for every player in a league.
    ///
    /// # Errors
    ///
    /// See [`LeagueEndpoint::get_team_data`].
    pub fn get_player_data(&self, league: &str, season: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(league, season)?;
        self.parser.get_player_data(&page)
    }

    fn fetch_page(&self, league: &str, season: &str) -> Result<String, UnderstatError> {
        let url = self.url(league, season)?;
        tracing::debug!(%url, league, season, "fetching league page");
        Ok(self.transport.fetch(&url)?)
    }
}
