use crate::parser::{
    GamesDate, ParseError, boxscore_path, parse_games_date, parse_player_stats,
    parse_scoreboard, parse_standings, parse_team_totals,
};
use crate::types::{BoxScoreTotals, GameRecord, PlayerStatRecord, StandingsRecord};

use chrono::Local;
use reqwest::{Client, StatusCode};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: StatusCode },
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Everything one scrape run produces, held in memory until written.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ScrapeOutput {
    pub games: Vec<GameRecord>,
    pub standings: Vec<StandingsRecord>,
    pub players: Vec<PlayerStatRecord>,
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_base_url(crate::BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Team totals for both sides of one game, or `None` if the box score page could not be fetched.
    pub async fn fetch_team_totals(
        &self,
        boxscore_url: &str,
        away_code: &str,
        home_code: &str,
    ) -> Option<BoxScoreTotals> {
        let html = self
            .get_html(boxscore_url)
            .await
            .inspect_err(|e| log::error!("Failed to fetch boxscore data: {}", e))
            .ok()?;

        Some(parse_team_totals(&html, away_code, home_code))
    }

    /// Last night's games with both teams' totals, in scoreboard order.
    pub async fn fetch_daily_scores(&self) -> Vec<GameRecord> {
        let url = format!("{}/", self.base_url);
        log::info!("Fetching daily scores from {}...", url);

        let html = match self.get_html(&url).await {
            Ok(html) => html,
            Err(e) => {
                log::error!("Failed to fetch scores: {}", e);
                return Vec::new();
            }
        };

        let Some(games) = parse_scoreboard(&html) else {
            log::info!("No scores available today.");
            return Vec::new();
        };

        let games_date = self.fetch_games_date().await.unwrap_or_else(|| {
            log::warn!("Could not find game date. Using today's date as fallback.");
            GamesDate::from_date(Local::now().date_naive())
        });
        log::info!("Game date: {}", games_date.label);

        let mut records = Vec::new();

        for game in games {
            let boxscore_url = format!(
                "{}{}",
                self.base_url,
                boxscore_path(games_date.date, &game.home.code)
            );
            log::debug!("Fetching box score {}", boxscore_url);

            let Some(totals) = self
                .fetch_team_totals(&boxscore_url, &game.away.code, &game.home.code)
                .await
            else {
                log::warn!(
                    "No team totals found for the game between {} and {}",
                    game.away.name,
                    game.home.name
                );
                continue;
            };

            let (away_outcome, home_outcome) = (totals.away.to_string(), totals.home.to_string());
            let Some((away, home)) = totals.complete() else {
                log::warn!(
                    "Dropping {} at {}: away totals {}, home totals {}",
                    game.away.name,
                    game.home.name,
                    away_outcome,
                    home_outcome
                );
                continue;
            };

            log::info!(
                "{}: {} - {}: {}",
                game.away.name,
                game.away.score,
                game.home.name,
                game.home.score
            );

            records.push(GameRecord {
                date: games_date.label.clone(),
                away_team: game.away.name,
                away_score: game.away.score,
                home_team: game.home.name,
                home_score: game.home.score,
                away,
                home,
            });
        }

        records
    }

    async fn fetch_games_date(&self) -> Option<GamesDate> {
        let url = format!("{}/boxscores/", self.base_url);
        let html = self
            .get_html(&url)
            .await
            .inspect_err(|e| log::warn!("Failed to fetch box score index: {}", e))
            .ok()?;

        parse_games_date(&html)
            .inspect_err(|e| log::warn!("{}", e))
            .ok()
            .flatten()
    }

    pub async fn fetch_league_standings(&self, season: u16) -> Vec<StandingsRecord> {
        let url = format!("{}/leagues/NBA_{}_standings.html", self.base_url, season);
        log::info!("Fetching league standings from {}...", url);

        match self.get_html(&url).await {
            Ok(html) => {
                let standings = parse_standings(&html);
                log::info!("Parsed {} standings rows", standings.len());
                standings
            }
            Err(e) => {
                log::error!("Failed to fetch standings: {}", e);
                Vec::new()
            }
        }
    }

    /// Per-game player table for a season.
    ///
    /// A failed fetch yields no rows; a table without the expected columns is an error.
    pub async fn fetch_player_stats(
        &self,
        season: u16,
    ) -> Result<Vec<PlayerStatRecord>, ScraperError> {
        let url = format!("{}/leagues/NBA_{}_per_game.html", self.base_url, season);
        log::info!("Fetching player stats from {}...", url);

        let html = match self.get_html(&url).await {
            Ok(html) => html,
            Err(e) => {
                log::error!("Failed to fetch player stats: {}", e);
                return Ok(Vec::new());
            }
        };

        let players = parse_player_stats(&html)?;
        log::info!("Parsed {} player rows", players.len());
        Ok(players)
    }

    /// Scores, standings and player stats, one category after the other.
    pub async fn fetch_all(&self, season: u16) -> Result<ScrapeOutput, ScraperError> {
        let games = self.fetch_daily_scores().await;
        let standings = self.fetch_league_standings(season).await;
        let players = self.fetch_player_stats(season).await?;

        Ok(ScrapeOutput {
            games,
            standings,
            players,
        })
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::debug!("HTTP error: {e:?}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScraperError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}
