//! Read-only view over the cleaned files.
//!
//! A [`Snapshot`] is loaded once from the three `*_clean.csv` files and never
//! reloaded. The `Display` impls render the player comparison, the conference
//! wins chart and the per-game detail.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::Path;

use crate::clean::{Category, coerce_number};
use crate::table::{Table, TableError};
use crate::types::{Conference, PLAYER_COLUMNS, TOTALS_COLUMNS};

/// Stats compared against the league leader in the player view.
pub const LEADER_STATS: [(&str, &str); 10] = [
    ("PTS", "Points"),
    ("TRB", "Total Rebounds"),
    ("AST", "Assists"),
    ("STL", "Steals"),
    ("BLK", "Blocks"),
    ("TOV", "Turnovers"),
    ("PF", "Personal Fouls"),
    ("FG", "Field Goals"),
    ("FT", "Free Throws"),
    ("3P", "Three-Point Shots"),
];

const BAR_WIDTH: usize = 40;

fn number(table: &Table, row: &[String], column: usize) -> Result<f64, TableError> {
    let value = &row[column];
    coerce_number(value).ok_or_else(|| TableError::InvalidValue {
        column: table.headers[column].clone(),
        value: value.clone(),
    })
}

/// One side's totals, in `TOTALS_COLUMNS` order.
#[derive(Debug, Clone, PartialEq)]
pub struct SideTotals([f64; 18]);

impl SideTotals {
    pub fn get(&self, column: &str) -> Option<f64> {
        TOTALS_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.0[i])
    }

    fn stat(&self, column: &str) -> f64 {
        self.get(column).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameLine {
    pub date: String,
    pub away_team: String,
    pub away_score: f64,
    pub home_team: String,
    pub home_score: f64,
    pub away: SideTotals,
    pub home: SideTotals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandingLine {
    pub conference: Conference,
    pub team: String,
    pub wins: Option<f64>,
    pub losses: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLine {
    pub rank: String,
    pub name: String,
    pub team: String,
    /// Values for `PLAYER_COLUMNS[3..]`.
    pub stats: Vec<f64>,
}

impl PlayerLine {
    pub fn get(&self, column: &str) -> Option<f64> {
        PLAYER_COLUMNS[3..]
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.stats.get(i).copied())
    }
}

fn side_totals(
    table: &Table,
    row: &[String],
    columns: &[usize],
) -> Result<SideTotals, TableError> {
    let mut values = [0.0; 18];
    for (value, &column) in values.iter_mut().zip(columns) {
        *value = number(table, row, column)?;
    }
    Ok(SideTotals(values))
}

fn load_games(table: &Table) -> Result<Vec<GameLine>, TableError> {
    let date = table.column("Date")?;
    let away_team = table.column("Away Team")?;
    let away_score = table.column("Away Score")?;
    let home_team = table.column("Home Team")?;
    let home_score = table.column("Home Score")?;
    let side_columns = |prefix: &str| {
        TOTALS_COLUMNS
            .iter()
            .map(|c| table.column(&format!("{} {}", prefix, c)))
            .collect::<Result<Vec<_>, _>>()
    };
    let away_columns = side_columns("Away")?;
    let home_columns = side_columns("Home")?;

    table
        .rows
        .iter()
        .map(|row| -> Result<GameLine, TableError> {
            Ok(GameLine {
                date: row[date].clone(),
                away_team: row[away_team].clone(),
                away_score: number(table, row, away_score)?,
                home_team: row[home_team].clone(),
                home_score: number(table, row, home_score)?,
                away: side_totals(table, row, &away_columns)?,
                home: side_totals(table, row, &home_columns)?,
            })
        })
        .collect()
}

fn load_standings(table: &Table) -> Result<Vec<StandingLine>, TableError> {
    let conference = table.column("Conference")?;
    let team = table.column("Team")?;
    let wins = table.column("Wins")?;
    let losses = table.column("Losses")?;

    table
        .rows
        .iter()
        .map(|row| -> Result<StandingLine, TableError> {
            let value = &row[conference];
            let conference =
                value
                    .parse::<Conference>()
                    .map_err(|_| TableError::InvalidValue {
                        column: "Conference".to_string(),
                        value: value.clone(),
                    })?;

            Ok(StandingLine {
                conference,
                team: row[team].clone(),
                wins: coerce_number(&row[wins]),
                losses: coerce_number(&row[losses]),
            })
        })
        .collect()
}

fn load_players(table: &Table) -> Result<Vec<PlayerLine>, TableError> {
    let rank = table.column("Rank")?;
    let name = table.column("Player Name")?;
    let team = table.column("Team")?;
    let stat_columns = PLAYER_COLUMNS[3..]
        .iter()
        .map(|c| table.column(c))
        .collect::<Result<Vec<_>, _>>()?;

    table
        .rows
        .iter()
        .map(|row| -> Result<PlayerLine, TableError> {
            Ok(PlayerLine {
                rank: row[rank].clone(),
                name: row[name].clone(),
                team: row[team].clone(),
                stats: stat_columns
                    .iter()
                    .map(|&c| number(table, row, c))
                    .collect::<Result<Vec<_>, _>>()?,
            })
        })
        .collect()
}

/// The cleaned data set, loaded once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    games: Vec<GameLine>,
    standings: Vec<StandingLine>,
    players: Vec<PlayerLine>,
}

impl Snapshot {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, TableError> {
        let dir = dir.as_ref();
        let read = |category: Category| Table::read(dir.join(category.clean_file()));

        let snapshot = Self {
            games: load_games(&read(Category::DailyScores)?)?,
            standings: load_standings(&read(Category::Standings)?)?,
            players: load_players(&read(Category::PlayerStats)?)?,
        };
        log::debug!(
            "Loaded snapshot: {} games, {} standings rows, {} player rows",
            snapshot.games.len(),
            snapshot.standings.len(),
            snapshot.players.len()
        );
        Ok(snapshot)
    }

    pub fn games(&self) -> &[GameLine] {
        &self.games
    }

    pub fn game(&self, index: usize) -> Option<&GameLine> {
        self.games.get(index)
    }

    pub fn standings(&self) -> &[StandingLine] {
        &self.standings
    }

    pub fn players(&self) -> &[PlayerLine] {
        &self.players
    }

    /// Sorted, de-duplicated player names.
    pub fn player_names(&self) -> Vec<&str> {
        self.players
            .iter()
            .map(|p| p.name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every row for a player; traded players have one row per team.
    pub fn players_named(&self, name: &str) -> Vec<&PlayerLine> {
        self.players.iter().filter(|p| p.name == name).collect()
    }

    /// Best value of `column` across all player rows.
    pub fn leader(&self, column: &str) -> Option<(&PlayerLine, f64)> {
        self.players
            .iter()
            .filter_map(|p| p.get(column).map(|v| (p, v)))
            .fold(None, |best: Option<(&PlayerLine, f64)>, (p, v)| match best {
                Some((_, best_v)) if best_v >= v => best,
                _ => Some((p, v)),
            })
    }

    /// Teams of a conference by wins, most first; ties go to fewer losses.
    pub fn conference_ranking(&self, conference: Conference) -> Vec<&StandingLine> {
        let mut teams: Vec<&StandingLine> = self
            .standings
            .iter()
            .filter(|s| s.conference == conference)
            .collect();
        teams.sort_by(|a, b| {
            let wins = |s: &StandingLine| s.wins.unwrap_or(f64::NEG_INFINITY);
            let losses = |s: &StandingLine| s.losses.unwrap_or(f64::INFINITY);
            wins(b)
                .total_cmp(&wins(a))
                .then(losses(a).total_cmp(&losses(b)))
        });
        teams
    }

    pub fn player_comparison<'a>(&'a self, name: &'a str) -> Option<PlayerComparison<'a>> {
        let rows = self.players_named(name);
        let player = *rows.first()?;
        let leaders = LEADER_STATS
            .iter()
            .filter_map(|&(column, label)| {
                let (leader, best) = self.leader(column)?;
                Some(StatComparison {
                    label,
                    value: player.get(column).unwrap_or_default(),
                    leader: &leader.name,
                    best,
                })
            })
            .collect();

        Some(PlayerComparison {
            name,
            rows,
            leaders,
        })
    }

    pub fn standings_chart(&self, conference: Conference) -> StandingsChart<'_> {
        StandingsChart {
            conference,
            teams: self.conference_ranking(conference),
        }
    }
}

#[derive(Debug)]
pub struct StatComparison<'a> {
    pub label: &'a str,
    pub value: f64,
    pub leader: &'a str,
    pub best: f64,
}

/// A player's rows next to the league leaders of the headline stats.
#[derive(Debug)]
pub struct PlayerComparison<'a> {
    pub name: &'a str,
    pub rows: Vec<&'a PlayerLine>,
    pub leaders: Vec<StatComparison<'a>>,
}

impl Display for PlayerComparison<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─ {}", self.name)?;
        for row in &self.rows {
            writeln!(
                f,
                "│  {:<4} G {:>3}  MP {:>4}  PTS {:>4}  TRB {:>4}  AST {:>4}",
                row.team,
                row.get("G").unwrap_or_default(),
                row.get("MP").unwrap_or_default(),
                row.get("PTS").unwrap_or_default(),
                row.get("TRB").unwrap_or_default(),
                row.get("AST").unwrap_or_default(),
            )?;
        }
        writeln!(f, "└─ vs. league leaders")?;
        for stat in &self.leaders {
            let share = if stat.best > 0.0 {
                (stat.value / stat.best * 100.0).round()
            } else {
                0.0
            };
            writeln!(
                f,
                "   {:<18} {:>5} / {:>5} ({:>3}%)  best: {}",
                stat.label, stat.value, stat.best, share, stat.leader
            )?;
        }
        Ok(())
    }
}

/// Wins per team for one conference, as horizontal bars.
#[derive(Debug)]
pub struct StandingsChart<'a> {
    pub conference: Conference,
    pub teams: Vec<&'a StandingLine>,
}

impl Display for StandingsChart<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Standings - {}", self.conference)?;
        let most = self
            .teams
            .iter()
            .filter_map(|t| t.wins)
            .fold(0.0_f64, f64::max);

        for (i, team) in self.teams.iter().enumerate() {
            let wins = team.wins.unwrap_or_default();
            let width = if most > 0.0 {
                (wins / most * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let record = match (team.wins, team.losses) {
                (Some(w), Some(l)) => format!("{}-{}", w, l),
                _ => "n/a".to_string(),
            };
            writeln!(
                f,
                "{:>2}. {:<24} {:<7} {}",
                i + 1,
                team.team,
                record,
                "█".repeat(width)
            )?;
        }
        Ok(())
    }
}

impl GameLine {
    fn stat_row(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        label: &str,
        column: &str,
    ) -> std::fmt::Result {
        writeln!(
            f,
            "│  {:<18} {:>6} {:>6}",
            label,
            self.away.stat(column),
            self.home.stat(column)
        )
    }
}

impl Display for GameLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "┌─ {} ─ {} {} @ {} {}",
            self.date, self.away_team, self.away_score, self.home_team, self.home_score
        )?;

        writeln!(f, "│  {:<18} {:>6} {:>6}", "Scoring", "Away", "Home")?;
        self.stat_row(f, "Points", "PTS")?;
        self.stat_row(f, "Rebounds", "TRB")?;
        self.stat_row(f, "Assists", "AST")?;
        writeln!(f, "│  Shooting")?;
        self.stat_row(f, "Field Goal %", "FG%")?;
        self.stat_row(f, "Three-Point %", "3P%")?;
        self.stat_row(f, "Free Throw %", "FT%")?;
        writeln!(f, "│  Defense")?;
        self.stat_row(f, "Steals", "STL")?;
        self.stat_row(f, "Blocks", "BLK")?;
        self.stat_row(f, "Turnovers", "TOV")?;
        self.stat_row(f, "Fouls", "PF")?;
        write!(f, "└─")
    }
}
