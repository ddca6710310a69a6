//! One-stop client: an endpoint per page category over a shared transport,
//! plus the player search.

use std::sync::Arc;

use understat_core::AppConfig;

use crate::endpoint::{LeagueEndpoint, MatchEndpoint, PlayerEndpoint, TeamEndpoint};
use crate::error::{FetchError, SearchError};
use crate::search::{BrowserDriver, SearchConfig, SearchService};
use crate::transport::{Fetch, HttpTransport, LocalTransport};
use crate::types::SearchResult;

/// Transport chosen at runtime from configuration.
pub type DynTransport = dyn Fetch + Send + Sync;

pub struct UnderstatClient<T: ?Sized = DynTransport> {
    base_url: String,
    league: LeagueEndpoint<Arc<T>>,
    team: TeamEndpoint<Arc<T>>,
    player: PlayerEndpoint<Arc<T>>,
    matches: MatchEndpoint<Arc<T>>,
    search: SearchService,
}

impl UnderstatClient {
    /// Builds a client from application config.
    ///
    /// Pages are read from `fixture_dir` when it is set, otherwise fetched
    /// over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let transport: Arc<DynTransport> = match &config.fixture_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "serving pages from fixture directory");
                Arc::new(LocalTransport::new(&config.base_url, dir))
            }
            None => Arc::new(HttpTransport::from_config(config)?),
        };
        let search = SearchConfig::from_settings(&config.base_url, &config.search);
        Ok(Self::with_shared(transport, &config.base_url).with_search_config(search))
    }
}

impl<T: Fetch> UnderstatClient<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self::with_shared(Arc::new(transport), base_url)
    }
}

impl<T: Fetch + ?Sized> UnderstatClient<T> {
    /// Builds a client whose endpoints all use `transport`.
    pub fn with_shared(transport: Arc<T>, base_url: &str) -> Self {
        let base_url = format!("{}/", base_url.trim_end_matches('/'));
        Self {
            league: LeagueEndpoint::new(Arc::clone(&transport), &base_url),
            team: TeamEndpoint::new(Arc::clone(&transport), &base_url),
            player: PlayerEndpoint::new(Arc::clone(&transport), &base_url),
            matches: MatchEndpoint::new(transport, &base_url),
            search: SearchService::new(SearchConfig::from_settings(
                &base_url,
                &understat_core::SearchSettings::default(),
            )),
            base_url,
        }
    }

    #[must_use]
    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.search = SearchService::new(config);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn league(&self) -> &LeagueEndpoint<Arc<T>> {
        &self.league
    }

    #[must_use]
    pub fn team(&self) -> &TeamEndpoint<Arc<T>> {
        &self.team
    }

    #[must_use]
    pub fn player(&self) -> &PlayerEndpoint<Arc<T>> {
        &self.player
    }

    #[must_use]
    pub fn matches(&self) -> &MatchEndpoint<Arc<T>> {
        &self.matches
    }

    #[must_use]
    pub fn search_config(&self) -> &SearchConfig {
        self.search.config()
    }

    /// Resolves a player name to its id through `driver`.
    ///
    /// # Errors
    ///
    /// See [`SearchService::resolve`].
    pub fn search_player<D: BrowserDriver>(
        &self,
        driver: &D,
        name: &str,
    ) -> Result<SearchResult, SearchError> {
        self.search.resolve(driver, name)
    }

    /// Lists the players the site search returns for `name`.
    ///
    /// # Errors
    ///
    /// See [`SearchService::candidates`].
    pub fn player_candidates<D: BrowserDriver>(
        &self,
        driver: &D,
        name: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.search.candidates(driver, name)
    }
}
