mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "understat-cli")]
#[command(about = "Fetch understat.com datasets as JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// League-wide datasets for one season
    League {
        /// League code: EPL, La_Liga, Bundesliga, Serie_A, Ligue_1 or RFPL
        league: String,
        /// Four-digit start year of the season
        season: String,
        #[arg(value_enum)]
        dataset: LeagueDataset,
    },
    /// Team datasets for one season
    Team {
        /// Team name as used in understat URLs, e.g. `Manchester_United`
        team: String,
        season: String,
        #[arg(value_enum)]
        dataset: TeamDataset,
    },
    /// Player datasets by numeric player id
    Player {
        player_id: String,
        #[arg(value_enum)]
        dataset: PlayerDataset,
    },
    /// Match datasets by numeric match id
    Match {
        match_id: String,
        #[arg(value_enum)]
        dataset: MatchDataset,
    },
    /// Resolve a player name to its id through the site search
    Search {
        name: String,
        /// List every result instead of picking the best match
        #[arg(long)]
        all: bool,
        /// Run the browser with a visible window
        #[arg(long)]
        show_browser: bool,
    },
    /// List the registered queries and the page variables they read
    Queries {
        #[arg(value_enum)]
        category: Option<CategoryArg>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LeagueDataset {
    Teams,
    Matches,
    Players,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TeamDataset {
    Players,
    Matches,
    Context,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlayerDataset {
    Matches,
    Shots,
    Seasons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MatchDataset {
    Shots,
    Rosters,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CategoryArg {
    League,
    Match,
    Player,
    Team,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = understat_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    commands::run(&cli.command, &config)
}
