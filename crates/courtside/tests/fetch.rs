use std::fs;

use chrono::Local;
use courtside::clean::clean_all;
use courtside::report::Snapshot;
use courtside::types::Conference;
use courtside::utils::write_raw;
use courtside::{WebScraper, boxscore_path, display_date};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(file: &str) -> String {
    fs::read_to_string(format!("fixtures/{}", file)).expect("Failed to read fixture")
}

async fn mount_page(mock_server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(mock_server)
        .await;
}

/// Scoreboard, box score index, one box score, standings and per-game pages.
///
/// Any other path answers 404.
async fn site() -> MockServer {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", fixture("scores/index.html")).await;
    mount_page(&mock_server, "/boxscores/", fixture("scores/boxscores.html")).await;
    mount_page(
        &mock_server,
        "/boxscores/202412160OKC.html",
        fixture("boxscores/202412160OKC.html"),
    )
    .await;
    mount_page(
        &mock_server,
        "/leagues/NBA_2025_standings.html",
        fixture("standings/NBA_2025_standings.html"),
    )
    .await;
    mount_page(
        &mock_server,
        "/leagues/NBA_2025_per_game.html",
        fixture("per_game/NBA_2025_per_game.html"),
    )
    .await;

    mock_server
}

#[tokio::test]
async fn test_failed_pages_yield_no_data() {
    let mock_server = MockServer::start().await;
    let scraper = WebScraper::with_base_url(mock_server.uri()).expect("Failed to build scraper");

    assert!(scraper.fetch_daily_scores().await.is_empty());
    assert!(scraper.fetch_league_standings(2025).await.is_empty());
    assert!(
        scraper
            .fetch_player_stats(2025)
            .await
            .expect("a failed fetch is not an error")
            .is_empty()
    );
    assert!(
        scraper
            .fetch_team_totals(
                &format!("{}/boxscores/202412160OKC.html", mock_server.uri()),
                "MIL",
                "OKC"
            )
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_daily_scores_keep_only_games_with_both_totals() {
    let mock_server = site().await;
    let scraper = WebScraper::with_base_url(mock_server.uri()).expect("Failed to build scraper");

    let games = scraper.fetch_daily_scores().await;

    // only the MIL @ OKC box score is served
    assert_eq!(games.len(), 1);
    let game = &games[0];
    assert_eq!(game.date, "December 16, 2024");
    assert_eq!(game.away_team, "Milwaukee");
    assert_eq!(game.away_score, "97");
    assert_eq!(game.home_team, "Oklahoma City");
    assert_eq!(game.home_score, "81");
    assert_eq!(game.away.pts, "97");
    assert_eq!(game.home.pts, "81");
}

#[tokio::test]
async fn test_daily_scores_fall_back_to_today_without_heading() {
    let mock_server = MockServer::start().await;
    let today = Local::now().date_naive();

    mount_page(&mock_server, "/", fixture("scores/index.html")).await;
    mount_page(
        &mock_server,
        "/boxscores/",
        "<html><body><h1>Box Scores</h1></body></html>".to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        &boxscore_path(today, "OKC"),
        fixture("boxscores/202412160OKC.html"),
    )
    .await;
    let scraper = WebScraper::with_base_url(mock_server.uri()).expect("Failed to build scraper");

    let games = scraper.fetch_daily_scores().await;

    assert_eq!(games.len(), 1);
    assert_eq!(games[0].date, display_date(today));
    assert_eq!(games[0].home_team, "Oklahoma City");
    assert_eq!(games[0].home.pts, "81");
}

#[tokio::test]
async fn test_standings_and_players_from_site() {
    let mock_server = site().await;
    let scraper = WebScraper::with_base_url(mock_server.uri()).expect("Failed to build scraper");

    let standings = scraper.fetch_league_standings(2025).await;
    assert_eq!(standings.len(), 6);
    assert!(
        standings[..3]
            .iter()
            .all(|s| s.conference == Conference::Eastern)
    );

    let players = scraper
        .fetch_player_stats(2025)
        .await
        .expect("Failed to fetch player stats");
    assert_eq!(players.len(), 6);

    assert!(scraper.fetch_league_standings(1999).await.is_empty());
}

#[tokio::test]
async fn test_scrape_clean_and_load() {
    let mock_server = site().await;
    let scraper = WebScraper::with_base_url(mock_server.uri()).expect("Failed to build scraper");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = scraper.fetch_all(2025).await.expect("Failed to scrape");
    write_raw(&output, dir.path()).expect("Failed to write raw files");
    let reports = clean_all(dir.path()).expect("Failed to clean");

    let players = reports
        .iter()
        .find(|r| r.category == courtside::clean::Category::PlayerStats)
        .expect("player stats report");
    assert_eq!(players.kept, 5, "the repeated header row is dropped");
    assert_eq!(players.dropped, 1);

    let snapshot = Snapshot::load(dir.path()).expect("Failed to load snapshot");
    assert_eq!(snapshot.games().len(), 1);
    assert_eq!(snapshot.players_named("Dennis Schröder").len(), 2);

    let west = snapshot.conference_ranking(Conference::Western);
    assert_eq!(west[0].team, "Oklahoma City Thunder");
    assert_eq!(west[0].wins, Some(68.0));
}
