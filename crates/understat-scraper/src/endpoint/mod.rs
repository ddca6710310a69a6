//! Per-category endpoints: validate identifiers, build the page URL, fetch
//! it through a [`Fetch`](crate::transport::Fetch) transport and hand the
//! page to the category's parser.
//!
//! Validation always happens before the transport is touched, so a rejected
//! identifier never costs a request.

mod league;
mod match_page;
mod player;
mod team;

pub use league::LeagueEndpoint;
pub use match_page::MatchEndpoint;
pub use player::PlayerEndpoint;
pub use team::TeamEndpoint;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use understat_core::{EntityCategory, Season};

use crate::error::ValidationError;

/// Characters escaped when an identifier is used as a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Ensures `base_url` ends with exactly one slash.
pub(crate) fn normalise_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

/// `{base}{category}/{seg}/{seg}...` with every segment percent-encoded.
pub(crate) fn page_url(base_url: &str, category: EntityCategory, segments: &[&str]) -> String {
    let mut url = format!("{base_url}{}", category.path_segment());
    for segment in segments {
        url.push('/');
        url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
    }
    url
}

pub(crate) fn validate_season(
    category: EntityCategory,
    season: &str,
) -> Result<Season, ValidationError> {
    Season::parse(season).ok_or_else(|| ValidationError::InvalidSeason {
        category,
        value: season.to_owned(),
    })
}

/// Player and match ids are the site's numeric primary keys.
pub(crate) fn is_numeric_id(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}
