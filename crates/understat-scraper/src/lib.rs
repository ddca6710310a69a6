pub mod client;
pub mod endpoint;
pub mod error;
pub mod extract;
pub mod parse;
pub mod registry;
pub mod search;
pub mod transport;
pub mod types;

pub use client::{DynTransport, UnderstatClient};
pub use endpoint::{LeagueEndpoint, MatchEndpoint, PlayerEndpoint, TeamEndpoint};
pub use error::{
    DriverError, ExtractionError, FetchError, SearchError, UnderstatError, UnknownQuery,
    ValidationError,
};
pub use extract::extract;
pub use parse::{parse_query, LeagueParser, MatchParser, PlayerParser, TeamParser};
#[cfg(feature = "chrome")]
pub use search::ChromeDriver;
pub use search::{BrowserDriver, DriverSession, ElementSnapshot, SearchConfig, SearchService};
pub use transport::{Fetch, HttpTransport, LocalTransport};
pub use types::{Dataset, Row, SearchResult};
