//! Command handlers. Every command prints pretty JSON on stdout; logs go to
//! stderr.

use anyhow::Context;
use serde_json::json;
use understat_core::{AppConfig, EntityCategory};
use understat_scraper::{registry, ChromeDriver, Dataset, UnderstatClient};

use crate::{CategoryArg, Commands, LeagueDataset, MatchDataset, PlayerDataset, TeamDataset};

pub(crate) fn run(command: &Commands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Queries { category } => print_json(&list_queries(*category)),
        Commands::Search {
            name,
            all,
            show_browser,
        } => run_search(config, name, *all, *show_browser),
        data_command => {
            let client = UnderstatClient::from_config(config)
                .context("failed to build understat client")?;
            let data = fetch_dataset(&client, data_command)?;
            tracing::info!(rows = data.len(), "dataset fetched");
            print_json(&data)
        }
    }
}

/// Runs one of the page-data commands.
pub(crate) fn fetch_dataset(
    client: &UnderstatClient,
    command: &Commands,
) -> anyhow::Result<Dataset> {
    let data = match command {
        Commands::League {
            league,
            season,
            dataset,
        } => {
            let endpoint = client.league();
            match dataset {
                LeagueDataset::Teams => endpoint.get_team_data(league, season),
                LeagueDataset::Matches => endpoint.get_match_data(league, season),
                LeagueDataset::Players => endpoint.get_player_data(league, season),
            }
        }
        Commands::Team {
            team,
            season,
            dataset,
        } => {
            let endpoint = client.team();
            match dataset {
                TeamDataset::Players => endpoint.get_player_data(team, season),
                TeamDataset::Matches => endpoint.get_match_data(team, season),
                TeamDataset::Context => endpoint.get_context_data(team, season),
            }
        }
        Commands::Player { player_id, dataset } => {
            let endpoint = client.player();
            match dataset {
                PlayerDataset::Matches => endpoint.get_match_data(player_id),
                PlayerDataset::Shots => endpoint.get_shot_data(player_id),
                PlayerDataset::Seasons => endpoint.get_season_data(player_id),
            }
        }
        Commands::Match { match_id, dataset } => {
            let endpoint = client.matches();
            match dataset {
                MatchDataset::Shots => endpoint.get_shot_data(match_id),
                MatchDataset::Rosters => endpoint.get_roster_data(match_id),
                MatchDataset::Info => endpoint.get_match_info(match_id),
            }
        }
        Commands::Search { .. } | Commands::Queries { .. } => {
            anyhow::bail!("not a page-data command")
        }
    };
    Ok(data?)
}

fn run_search(config: &AppConfig, name: &str, all: bool, show_browser: bool) -> anyhow::Result<()> {
    let client =
        UnderstatClient::from_config(config).context("failed to build understat client")?;
    let driver = ChromeDriver::new(config.search.headless && !show_browser);

    if all {
        let found = client.player_candidates(&driver, name)?;
        print_json(&found)
    } else {
        let found = client.search_player(&driver, name)?;
        print_json(&found)
    }
}

/// `[{category, query, variable}]` for one category or all of them.
pub(crate) fn list_queries(category: Option<CategoryArg>) -> serde_json::Value {
    let categories = match category {
        Some(arg) => vec![EntityCategory::from(arg)],
        None => EntityCategory::ALL.to_vec(),
    };

    let entries: Vec<_> = categories
        .into_iter()
        .flat_map(|category| {
            registry::queries(category).map(move |(query, variable)| {
                json!({
                    "category": category.path_segment(),
                    "query": query,
                    "variable": variable,
                })
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

impl From<CategoryArg> for EntityCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::League => EntityCategory::League,
            CategoryArg::Match => EntityCategory::Match,
            CategoryArg::Player => EntityCategory::Player,
            CategoryArg::Team => EntityCategory::Team,
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialise output")?;
    println!("{text}");
    Ok(())
}
