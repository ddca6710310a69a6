use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use understat_core::EntityCategory;

/// A caller-supplied identifier was rejected before any request was made.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{value:?} is not a valid league for {category} pages")]
    InvalidLeague {
        category: EntityCategory,
        value: String,
    },

    #[error("{value:?} is not a valid season for {category} pages")]
    InvalidSeason {
        category: EntityCategory,
        value: String,
    },

    #[error("{value:?} is not a valid team for {category} pages")]
    InvalidTeam {
        category: EntityCategory,
        value: String,
    },

    #[error("{value:?} is not a valid player id for {category} pages")]
    InvalidPlayer {
        category: EntityCategory,
        value: String,
    },

    #[error("{value:?} is not a valid match id for {category} pages")]
    InvalidMatch {
        category: EntityCategory,
        value: String,
    },
}

/// The page did not contain data in the expected embedded-script form.
///
/// Any of these usually means the site changed how it generates pages.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("script variable `{key}` is not assigned anywhere in the page")]
    VariableNotFound { key: String },

    #[error("malformed string literal for `{key}` at byte {offset}: {reason}")]
    MalformedLiteral {
        key: String,
        offset: usize,
        reason: String,
    },

    #[error("payload of `{key}` is not a usable JSON document: {source}")]
    InvalidJson {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("search result link {link:?} does not contain a numeric player id")]
    MissingIdentifier { link: String },
}

/// A `(category, query)` pair that the registry does not know about.
#[derive(Debug, Error)]
#[error("no query named {query:?} is registered for {category} pages")]
pub struct UnknownQuery {
    pub category: EntityCategory,
    pub query: String,
}

/// Failure to obtain page text from a transport.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("URL {url} is not under {base_url}")]
    OutsideBase { url: String, base_url: String },

    #[error("failed to read saved page {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned by endpoint and parser operations.
#[derive(Debug, Error)]
pub enum UnderstatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    UnknownQuery(#[from] UnknownQuery),

    #[error(transparent)]
    Transport(#[from] FetchError),
}

/// A browser-automation call failed. Always fatal to the current search.
#[derive(Debug, Error)]
#[error("browser {action} failed: {message}")]
pub struct DriverError {
    pub action: &'static str,
    pub message: String,
}

impl DriverError {
    pub fn new(action: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            action,
            message: err.to_string(),
        }
    }
}

/// Terminal failures of a player search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,

    #[error("search for {query:?} timed out after {}ms", elapsed.as_millis())]
    TimedOut { query: String, elapsed: Duration },

    #[error("search for {query:?} found no match after inspecting {inspected} results")]
    Exhausted { query: String, inspected: usize },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}
