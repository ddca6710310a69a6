//! Closed identifier sets shared by the scraper and the CLI.

use serde::{Deserialize, Serialize};

/// First season the source publishes data for.
pub const EARLIEST_SEASON: u16 = 2014;

/// The four kinds of pages the scraper understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    League,
    Match,
    Player,
    Team,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 4] = [
        EntityCategory::League,
        EntityCategory::Match,
        EntityCategory::Player,
        EntityCategory::Team,
    ];

    /// Path segment that prefixes every page URL of this category.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            EntityCategory::League => "league",
            EntityCategory::Match => "match",
            EntityCategory::Player => "player",
            EntityCategory::Team => "team",
        }
    }

    /// Parses a lowercase category name (`"league"`, `"match"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.path_segment().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Leagues covered by the source. Codes are case-sensitive and match the
/// URL path segment exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum League {
    #[serde(rename = "EPL")]
    Epl,
    #[serde(rename = "La_Liga")]
    LaLiga,
    Bundesliga,
    #[serde(rename = "Serie_A")]
    SerieA,
    #[serde(rename = "Ligue_1")]
    Ligue1,
    #[serde(rename = "RFPL")]
    Rfpl,
}

impl League {
    pub const ALL: [League; 6] = [
        League::Epl,
        League::LaLiga,
        League::Bundesliga,
        League::SerieA,
        League::Ligue1,
        League::Rfpl,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            League::Epl => "EPL",
            League::LaLiga => "La_Liga",
            League::Bundesliga => "Bundesliga",
            League::SerieA => "Serie_A",
            League::Ligue1 => "Ligue_1",
            League::Rfpl => "RFPL",
        }
    }

    /// Looks a league up by its exact URL code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }
}

impl std::fmt::Display for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Start year of a football season, e.g. `2019` for 2019/20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Season(u16);

impl Season {
    /// Parses a four-digit year no earlier than [`EARLIEST_SEASON`].
    ///
    /// Returns `None` for anything else (`"19"`, `"2019/20"`, `"2013"`).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year = raw.parse::<u16>().ok()?;
        (year >= EARLIEST_SEASON).then_some(Self(year))
    }

    #[must_use]
    pub fn year(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
