use understat_core::EntityCategory;

use super::{is_numeric_id, normalise_base_url, page_url};
use crate::error::{UnderstatError, ValidationError};
use crate::parse::PlayerParser;
use crate::transport::Fetch;
use crate::types::Dataset;

/// Endpoint for player pages, `https://understat.com/player/<player_id>`.
///
/// Use [`crate::search::SearchService`] to find the id for a player name.
pub struct PlayerEndpoint<T> {
    transport: T,
    base_url: String,
    parser: PlayerParser,
}

impl<T: Fetch> PlayerEndpoint<T> {
    const CATEGORY: EntityCategory = EntityCategory::Player;

    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: normalise_base_url(base_url),
            parser: PlayerParser,
        }
    }

    /// Validates `player` and builds the page URL.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPlayer`] unless `player` is a
    /// non-empty string of ASCII digits.
    pub fn url(&self, player: &str) -> Result<String, ValidationError> {
        if !is_numeric_id(player) {
            return Err(ValidationError::InvalidPlayer {
                category: Self::CATEGORY,
                value: player.to_owned(),
            });
        }
        Ok(page_url(&self.base_url, Self::CATEGORY, &[player]))
    }

    /// Match-by-match stats for a player.
    ///
    /// # Errors
    ///
    /// - [`UnderstatError::Validation`] for a bad player id (no request made).
    /// - [`UnderstatError::Transport`] if the page cannot be fetched.
    /// - [`UnderstatError::Extraction`] if the page lacks the expected data.
    pub fn get_match_data(&self, player: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(player)?;
        self.parser.get_match_data(&page)
    }

    /// Every shot the player has taken.
    ///
    /// # Errors
    ///
    /// See [`PlayerEndpoint::get_match_data`].
    pub fn get_shot_data(&self, player: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(player)?;
        self.parser.get_shot_data(&page)
    }

    /// Per-season splits for a player.
    ///
    /// # Errors
    ///
    /// See [`PlayerEndpoint::get_match_data`].
    pub fn get_season_data(&self, player: &str) -> Result<Dataset, UnderstatError> {
        let page = self.fetch_page(player)?;
        self.parser.get_season_data(&page)
    }

    fn fetch_page(&self, player: &str) -> Result<String, UnderstatError> {
        let url = self.url(player)?;
        tracing::debug!(%url, player, "fetching player page");
        Ok(self.transport.fetch(&url)?)
    }
}
