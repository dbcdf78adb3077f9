use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use courtside::DEFAULT_SEASON;
use courtside::clean::clean_all;
use courtside::report::Snapshot;
use courtside::scraper::{ScrapeOutput, WebScraper};
use courtside::types::Conference;
use courtside::utils::{ScrapeSummary, write_raw};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "A basketball-reference.com scraper and box score reader", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape daily scores, league standings and player stats into raw CSV files
    Scrape {
        #[arg(long, default_value_t = DEFAULT_SEASON, help = "Season (ending year) to scrape")]
        season: u16,

        #[arg(long, default_value = ".", help = "Directory the CSV files are written to")]
        dir: PathBuf,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Coerce and filter the raw CSV files into their *_clean.csv counterparts
    Clean {
        #[arg(long, default_value = ".", help = "Directory holding the raw CSV files")]
        dir: PathBuf,
    },
    /// Browse the cleaned data
    Show {
        #[arg(long, default_value = ".", help = "Directory holding the *_clean.csv files")]
        dir: PathBuf,

        #[command(subcommand)]
        view: View,
    },
    /// Scrape, wait, clean and print the overview in one go
    Run {
        #[arg(long, default_value_t = DEFAULT_SEASON, help = "Season (ending year) to scrape")]
        season: u16,

        #[arg(long, default_value = ".", help = "Directory the CSV files are written to")]
        dir: PathBuf,

        #[arg(long, default_value_t = 2, help = "Seconds to wait between scraping and cleaning")]
        delay: u64,
    },
}

#[derive(Subcommand)]
enum View {
    /// List every player name
    Players,
    /// Compare a player against the league leaders
    Player {
        #[arg(help = "Player name as written in the stats table")]
        name: String,
    },
    /// Wins chart for a conference
    Standings {
        #[arg(long, value_parser = parse_conference, help = "Conference: east or west")]
        conference: Conference,
    },
    /// List the games with box scores
    Games,
    /// Scoring, shooting and defensive comparison for one game
    Game {
        #[arg(help = "Game number as shown by `show games`")]
        number: usize,
    },
}

fn parse_conference(s: &str) -> Result<Conference, String> {
    Conference::from_str(s).map_err(|e| e.to_string())
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

async fn scrape(season: u16, dir: &Path) -> ScrapeOutput {
    let scraper = WebScraper::new().unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    let output = scraper.fetch_all(season).await.unwrap_or_else(|e| {
        log::error!("Error scraping season {}: {}", season, e);
        process::exit(1);
    });

    let paths = write_raw(&output, dir).unwrap_or_else(|e| {
        log::error!("Error writing raw files: {}", e);
        process::exit(1);
    });
    log::info!(
        "Data saved to {}",
        paths
            .iter()
            .map(|p| format!("'{}'", p.display()))
            .collect::<Vec<_>>()
            .join(", ")
    );

    output
}

fn clean(dir: &Path) {
    let reports = clean_all(dir).unwrap_or_else(|e| {
        log::error!("Error cleaning raw files: {}", e);
        process::exit(1);
    });

    for report in reports {
        println!("{}", report);
    }
}

fn load_snapshot(dir: &Path) -> Snapshot {
    Snapshot::load(dir).unwrap_or_else(|e| {
        log::error!("Error loading cleaned data from {}: {}", dir.display(), e);
        process::exit(1);
    })
}

fn show(snapshot: &Snapshot, view: View) {
    match view {
        View::Players => {
            let names = snapshot.player_names();
            if names.is_empty() {
                println!("No players to display.");
            }
            for name in names {
                println!("{}", name);
            }
        }
        View::Player { name } => match snapshot.player_comparison(&name) {
            Some(comparison) => print!("{}", comparison),
            None => {
                log::error!("No player named '{}'", name);
                process::exit(1);
            }
        },
        View::Standings { conference } => print!("{}", snapshot.standings_chart(conference)),
        View::Games => print_games(snapshot),
        View::Game { number } => match number.checked_sub(1).and_then(|i| snapshot.game(i)) {
            Some(game) => println!("{}", game),
            None => {
                log::error!(
                    "No game number {} ({} games available)",
                    number,
                    snapshot.games().len()
                );
                process::exit(1);
            }
        },
    }
}

fn print_games(snapshot: &Snapshot) {
    if snapshot.games().is_empty() {
        println!("No games to display.");
        return;
    }
    for (i, game) in snapshot.games().iter().enumerate() {
        println!(
            "{:>3}. [{}] {} {} @ {} {}",
            i + 1,
            game.date,
            game.away_team,
            game.away_score,
            game.home_team,
            game.home_score
        );
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    match cli.command {
        Commands::Scrape {
            season,
            dir,
            format,
        } => {
            let output = scrape(season, &dir).await;

            match format {
                OutputFormat::Json => serialize_json(&output),
                OutputFormat::Text => {
                    for game in &output.games {
                        println!("{}", game);
                    }
                    for standing in &output.standings {
                        println!("{}", standing);
                    }
                    print!("{}", ScrapeSummary::from_output(&output));
                }
            }
        }

        Commands::Clean { dir } => clean(&dir),

        Commands::Show { dir, view } => {
            let snapshot = load_snapshot(&dir);
            show(&snapshot, view);
        }

        Commands::Run { season, dir, delay } => {
            log::info!("Running web scraper...");
            let output = scrape(season, &dir).await;
            print!("{}", ScrapeSummary::from_output(&output));

            tokio::time::sleep(Duration::from_secs(delay)).await;

            log::info!("Running cleaning pass...");
            clean(&dir);

            log::info!("Loading cleaned data...");
            let snapshot = load_snapshot(&dir);
            println!();
            print_games(&snapshot);
            for conference in Conference::ALL {
                println!();
                print!("{}", snapshot.standings_chart(conference));
            }
        }
    }
}
