use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{
    BoxScoreTotals, Conference, Extraction, PLAYER_COLUMNS, PlayerStatRecord, StandingsRecord,
    TeamTotals,
};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Missing required element: {0}")]
    MissingElement(String),
    #[error("Failed to parse date: {0}")]
    DateParse(String),
}

static RE_GAMES_PLAYED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"NBA Games Played on\s+(.+)$").expect("invalid regex: games played heading")
});

const TEAM_TOTALS_LABEL: &str = "Team Totals";

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One participant as listed in a game summary block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub score: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub away: Participant,
    pub home: Participant,
}

/// Team short code from a team link, e.g. `/teams/LAC/2024.html` -> `LAC`.
pub fn team_code(href: &str) -> String {
    let parts: Vec<&str> = href.split('/').collect();

    match (parts.get(1), parts.get(2)) {
        (Some(&"teams"), Some(code)) if !code.is_empty() => {
            let code = code.to_uppercase();
            log::debug!("Extracted team abbreviation: {}", code);
            code
        }
        _ => {
            log::warn!("Could not extract team abbreviation from '{}'", href);
            String::new()
        }
    }
}

pub fn boxscore_path(date: NaiveDate, home_code: &str) -> String {
    format!("/boxscores/{}0{}.html", date.format("%Y%m%d"), home_code)
}

/// Date written to the `Date` column when the page gives none.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// The games date as printed in the heading, plus its parsed value for building URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamesDate {
    pub date: NaiveDate,
    pub label: String,
}

impl GamesDate {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date,
            label: display_date(date),
        }
    }
}

/// Reads the date out of the "NBA Games Played on <Month> <Day>, <Year>" heading.
pub fn parse_games_date(html: &str) -> Result<Option<GamesDate>, ParseError> {
    let document = Html::parse_document(html);
    let h1_selector = Selector::parse("h1").unwrap();

    let Some(heading) = document
        .select(&h1_selector)
        .map(|e| normalize_whitespace(&elem_text(e)))
        .find(|t| RE_GAMES_PLAYED.is_match(t))
    else {
        return Ok(None);
    };

    let raw = RE_GAMES_PLAYED
        .captures(&heading)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let date = NaiveDate::parse_from_str(&raw, "%B %d, %Y")
        .map_err(|_| ParseError::DateParse(format!("Unrecognised game date: {}", raw)))?;

    Ok(Some(GamesDate { date, label: raw }))
}

fn parse_participant(row: ElementRef) -> Option<Participant> {
    let a_selector = Selector::parse("a").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    let link = row.select(&a_selector).next()?;
    let name = normalize_whitespace(&elem_text(link));
    let score = row
        .select(&td_selector)
        .nth(1)
        .map(|e| normalize_whitespace(&elem_text(e)))?;
    let code = team_code(link.value().attr("href").unwrap_or(""));

    Some(Participant { name, score, code })
}

/// Game summaries from the `#scores` container, in page order.
///
/// Returns `None` when the page has no scores container at all.
pub fn parse_scoreboard(html: &str) -> Option<Vec<GameSummary>> {
    let document = Html::parse_document(html);
    let scores_selector = Selector::parse("div#scores").unwrap();
    let game_selector = Selector::parse("div.game_summary").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();

    let scores = document.select(&scores_selector).next()?;
    let mut games = Vec::new();

    for game in scores.select(&game_selector) {
        let rows: Vec<ElementRef> = game.select(&tr_selector).take(2).collect();
        if rows.len() < 2 {
            log::warn!("Skipping game summary with fewer than two team rows");
            continue;
        }

        match (parse_participant(rows[0]), parse_participant(rows[1])) {
            (Some(away), Some(home)) => games.push(GameSummary { away, home }),
            _ => log::warn!("Skipping game summary without team link or score"),
        }
    }

    Some(games)
}

fn parse_totals_table(document: &Html, code: &str) -> Extraction<TeamTotals> {
    let table_id = format!("table#box-{}-game-basic", code);
    let Ok(table_selector) = Selector::parse(&table_id) else {
        return Extraction::Malformed(format!("unusable team code '{}'", code));
    };
    let tr_selector = Selector::parse("tr").unwrap();
    let th_selector = Selector::parse("th").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    let Some(table) = document.select(&table_selector).next() else {
        return Extraction::Missing;
    };

    let totals_row = table.select(&tr_selector).find(|row| {
        row.select(&th_selector)
            .next()
            .is_some_and(|th| elem_text(th).trim() == TEAM_TOTALS_LABEL)
    });
    let Some(row) = totals_row else {
        return Extraction::Missing;
    };

    let cells: Vec<String> = row
        .select(&td_selector)
        .map(|e| normalize_whitespace(&elem_text(e)))
        .collect();

    if cells.is_empty() {
        return Extraction::Missing;
    }
    if cells.len() < 19 {
        return Extraction::Malformed(format!("expected 19 cells, found {}", cells.len()));
    }

    // cell 0 is minutes played
    match <[String; 18]>::try_from(cells[1..19].to_vec()) {
        Ok(values) => Extraction::Found(TeamTotals::from_cells(values)),
        Err(_) => Extraction::Malformed("unexpected totals width".to_string()),
    }
}

pub fn parse_team_totals(html: &str, away_code: &str, home_code: &str) -> BoxScoreTotals {
    let document = Html::parse_document(html);

    BoxScoreTotals {
        away: parse_totals_table(&document, away_code),
        home: parse_totals_table(&document, home_code),
    }
}

pub fn parse_standings(html: &str) -> Vec<StandingsRecord> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("tbody tr").unwrap();
    let a_selector = Selector::parse("a").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    let mut standings = Vec::new();

    for conference in Conference::ALL {
        let table_selector = Selector::parse(&format!("table#{}", conference.table_id())).unwrap();
        let Some(table) = document.select(&table_selector).next() else {
            log::warn!("No standings table for the {}", conference);
            continue;
        };

        for row in table.select(&row_selector) {
            if row.value().classes().any(|c| c == "thead") {
                continue;
            }

            let Some(team) = row.select(&a_selector).next() else {
                continue;
            };
            let team = normalize_whitespace(&elem_text(team));

            let cells: Vec<String> = row
                .select(&td_selector)
                .take(2)
                .map(|e| normalize_whitespace(&elem_text(e)))
                .collect();
            let [wins, losses] = <[String; 2]>::try_from(cells).unwrap_or_else(|cells| {
                log::warn!("Standings row for {} has {} cells", team, cells.len());
                [String::new(), String::new()]
            });

            log::debug!("{}: {} Wins, {} Losses", team, wins, losses);
            standings.push(StandingsRecord {
                conference,
                team,
                wins,
                losses,
            });
        }
    }

    standings
}

/// Reads the first table on the page into player rows, copying `PLAYER_COLUMNS` by header name.
pub fn parse_player_stats(html: &str) -> Result<Vec<PlayerStatRecord>, ParseError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ParseError::MissingElement("table".to_string()))?;

    let mut rows = table.select(&tr_selector).map(|row| {
        row.select(&cell_selector)
            .map(|e| normalize_whitespace(&elem_text(e)))
            .collect::<Vec<_>>()
    });

    let headers = rows
        .next()
        .ok_or_else(|| ParseError::MissingElement("header row".to_string()))?;

    let indices = PLAYER_COLUMNS
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| ParseError::MissingColumn(column.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let records = rows
        .filter(|cells| !cells.is_empty())
        .map(|cells| {
            let mut values = indices
                .iter()
                .map(|&i| cells.get(i).cloned().unwrap_or_default());

            let rank = values.next().unwrap_or_default();
            let player = values.next().unwrap_or_default();
            let team = values.next().unwrap_or_default();

            PlayerStatRecord {
                rank,
                player,
                team,
                stats: values.collect(),
            }
        })
        .collect();

    Ok(records)
}
