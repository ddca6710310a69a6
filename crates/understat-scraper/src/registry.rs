//! Static mapping from logical query names to the script variables that
//! carry their payload on each page category.
//!
//! Variable names must match the site's page generator exactly, including
//! case.

use understat_core::EntityCategory;

use crate::error::UnknownQuery;

/// Logical query names accepted by [`lookup`].
pub mod query {
    pub const TEAM_DATA: &str = "team data";
    pub const MATCH_DATA: &str = "match data";
    pub const PLAYER_DATA: &str = "player data";
    pub const SHOT_DATA: &str = "shot data";
    pub const ROSTER_DATA: &str = "roster data";
    pub const MATCH_INFO: &str = "match info";
    pub const SEASON_DATA: &str = "season data";
    pub const CONTEXT_DATA: &str = "context data";
}

const REGISTRY: &[(EntityCategory, &str, &str)] = &[
    (EntityCategory::League, query::TEAM_DATA, "teamsData"),
    (EntityCategory::League, query::MATCH_DATA, "datesData"),
    (EntityCategory::League, query::PLAYER_DATA, "playersData"),
    (EntityCategory::Match, query::SHOT_DATA, "shotsData"),
    (EntityCategory::Match, query::ROSTER_DATA, "rostersData"),
    (EntityCategory::Match, query::MATCH_INFO, "match_info"),
    (EntityCategory::Player, query::MATCH_DATA, "matchesData"),
    (EntityCategory::Player, query::SHOT_DATA, "shotsData"),
    (EntityCategory::Player, query::SEASON_DATA, "groupsData"),
    (EntityCategory::Team, query::PLAYER_DATA, "playersData"),
    (EntityCategory::Team, query::MATCH_DATA, "datesData"),
    (EntityCategory::Team, query::CONTEXT_DATA, "statisticsData"),
];

/// Returns the script variable that holds `query` on `category` pages.
///
/// # Errors
///
/// Returns [`UnknownQuery`] if the pair is not registered.
pub fn lookup(category: EntityCategory, query: &str) -> Result<&'static str, UnknownQuery> {
    REGISTRY
        .iter()
        .find(|(c, q, _)| *c == category && *q == query)
        .map(|(_, _, key)| *key)
        .ok_or_else(|| UnknownQuery {
            category,
            query: query.to_owned(),
        })
}

/// Registered `(query, variable)` pairs for one category, in declaration order.
pub fn queries(
    category: EntityCategory,
) -> impl Iterator<Item = (&'static str, &'static str)> {
    REGISTRY
        .iter()
        .filter(move |(c, _, _)| *c == category)
        .map(|(_, q, key)| (*q, *key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_stable_for_every_registered_pair() {
        for (category, query, key) in REGISTRY {
            let first = lookup(*category, query).expect("registered pair");
            let second = lookup(*category, query).expect("registered pair");
            assert_eq!(first, *key);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn same_query_name_resolves_per_category() {
        assert_eq!(
            lookup(EntityCategory::League, query::MATCH_DATA).unwrap(),
            "datesData"
        );
        assert_eq!(
            lookup(EntityCategory::Player, query::MATCH_DATA).unwrap(),
            "matchesData"
        );
    }

    #[test]
    fn unknown_query_names_the_pair() {
        let err = lookup(EntityCategory::Match, query::SEASON_DATA).unwrap_err();
        assert_eq!(err.category, EntityCategory::Match);
        assert_eq!(err.query, "season data");
        assert_eq!(
            err.to_string(),
            "no query named \"season data\" is registered for match pages"
        );
    }

    #[test]
    fn lookup_is_case_sensitive_on_query_name() {
        assert!(lookup(EntityCategory::League, "Team Data").is_err());
    }

    #[test]
    fn every_category_has_three_queries() {
        for category in EntityCategory::ALL {
            assert_eq!(queries(category).count(), 3, "{category}");
        }
    }

    #[test]
    fn variables_are_unique_within_a_category() {
        for category in EntityCategory::ALL {
            let mut keys: Vec<_> = queries(category).map(|(_, key)| key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), 3, "{category}");
        }
    }
}
