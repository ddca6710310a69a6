use understat_core::EntityCategory;

use super::{is_numeric_id, normalise_base_url, page_url};
use crate::error::{UnderstatError, ValidationError};
use crate::parse::MatchParser;
use crate::transport::Fetch;
use crate::types::Dataset;

/// Endpoint for match pages, `https://understat.com/match/<match_id>`.
pub struct MatchEndpoint<T> {
    transport: T,
    base_url: String,
    parser: MatchParser,
}

impl<T: Fetch> MatchEndpoint<T> {
    const CATEGORY: EntityCategory = EntityCategory::Match;

    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: normalise_base_url(base_url),
            parser: MatchParser,
        }
    }

    /// Validates `match_id` and builds the page URL.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMatch`] unless `match_id` is a
    /// non-empty string of ASCII digits.
    pub fn url(&self, match_id: &str) -> Result<String, ValidationError> {
        if !is_numeric_id(match_id) {
            return Err(ValidationError::InvalidMatch {
                category: Self::CATEGORY,
                value: match_id.to_owned(),
            });
        }
        Ok(page_url(&self.base_url, Self::CATEGORY, &[match_id]))
    }

    /// Shot-by-shot data for both sides.
    ///
    /// # Errors
    ///
    /// - [`UnderstatError::Validation`] for a bad match id (no request made).
    /// - [`UnderstatError::Transport`] if the page cannot be fetched.
    /// - [`UnderstatError::Extraction`] if the page lacks the expected data.
    pub fn get_shot_data(&self, match_id: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(match_id)?;
        self.parser.get_shot_data(&page)
    }

    /// Lineups and per-player stats for both sides.
    ///
    /// # Errors
    ///
    /// See [`MatchEndpoint::get_shot_data`].
    pub fn get_roster_data(&self, match_id: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(match_id)?;
        self.parser.get_roster_data(&page)
    }

    /// Match header information.
    ///
    /// # Errors
    ///
    /// See [`MatchEndpoint::get_shot_data`].
    pub fn get_match_info(&self, match_id: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(match_id)?;
        self.parser.get_match_info(&page)
    }

    fn fetch_page(&self, match_id: &str) -> Result<String, UnderstatError> {
        let url = self.url(match_id)?;
        tracing::debug!(%url, match_id, "fetching match page");
        Ok(self.transport.fetch(&url)?)
    }
}
