//! Turns the raw scrape files into their `*_clean.csv` counterparts.
//!
//! Numeric columns are coerced to numbers; text that does not parse becomes an
//! empty cell. Categories that drop incomplete rows remove any row with an
//! empty cell after coercion.

use std::fmt::Display;
use std::path::Path;

use crate::table::{Table, TableError};
use crate::types::{PLAYER_COLUMNS, TeamTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    DailyScores,
    Standings,
    PlayerStats,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::DailyScores,
        Category::Standings,
        Category::PlayerStats,
    ];

    pub fn raw_file(&self) -> &'static str {
        match self {
            Category::DailyScores => "daily_scores.csv",
            Category::Standings => "league_standings.csv",
            Category::PlayerStats => "player_stats.csv",
        }
    }

    pub fn clean_file(&self) -> &'static str {
        match self {
            Category::DailyScores => "daily_scores_clean.csv",
            Category::Standings => "league_standings_clean.csv",
            Category::PlayerStats => "player_stats_clean.csv",
        }
    }

    pub fn rules(&self) -> CleanRules {
        match self {
            Category::DailyScores => {
                let mut numeric = vec!["Away Score".to_string(), "Home Score".to_string()];
                numeric.extend(TeamTotals::prefixed_headers("Away"));
                numeric.extend(TeamTotals::prefixed_headers("Home"));
                CleanRules {
                    numeric,
                    drop_incomplete: true,
                    renames: &[],
                }
            }
            Category::Standings => CleanRules {
                numeric: vec!["Wins".to_string(), "Losses".to_string()],
                drop_incomplete: false,
                renames: &[],
            },
            Category::PlayerStats => CleanRules {
                numeric: PLAYER_COLUMNS[3..].iter().map(|c| c.to_string()).collect(),
                drop_incomplete: true,
                renames: &[("Tm", "Team"), ("Rk", "Rank"), ("Player", "Player Name")],
            },
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::DailyScores => write!(f, "Daily scores"),
            Category::Standings => write!(f, "League standings"),
            Category::PlayerStats => write!(f, "Player stats"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanRules {
    pub numeric: Vec<String>,
    pub drop_incomplete: bool,
    pub renames: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub category: Category,
    pub kept: usize,
    pub dropped: usize,
}

impl Display for CleanReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} cleaned: {} rows kept, {} dropped",
            self.category, self.kept, self.dropped
        )
    }
}

/// Parses numeric text; anything else, including NaN and infinities, is missing.
pub fn coerce_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Shortest text that reads back as the same number: `64`, `0.456`, `34.5`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    value.to_string()
}

pub fn clean_table(mut table: Table, rules: &CleanRules) -> Result<(Table, usize), TableError> {
    let columns = rules
        .numeric
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    for row in table.rows.iter_mut() {
        for &i in &columns {
            if let Some(cell) = row.get_mut(i) {
                *cell = coerce_number(cell).map(format_number).unwrap_or_default();
            }
        }
    }

    let before = table.rows.len();
    if rules.drop_incomplete {
        table
            .rows
            .retain(|row| row.iter().all(|cell| !cell.trim().is_empty()));
    }
    let dropped = before - table.rows.len();

    for (from, to) in rules.renames {
        table.rename(from, to);
    }

    Ok((table, dropped))
}

pub fn clean_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    category: Category,
) -> Result<CleanReport, TableError> {
    let table = Table::read(input)?;
    let (cleaned, dropped) = clean_table(table, &category.rules())?;
    cleaned.write(output)?;

    let report = CleanReport {
        category,
        kept: cleaned.rows.len(),
        dropped,
    };
    log::info!("{}", report);
    Ok(report)
}

/// Cleans every raw file in `dir`, writing the `*_clean.csv` files next to them.
pub fn clean_all(dir: impl AsRef<Path>) -> Result<Vec<CleanReport>, TableError> {
    let dir = dir.as_ref();
    Category::ALL
        .iter()
        .map(|category| {
            clean_file(
                dir.join(category.raw_file()),
                dir.join(category.clean_file()),
                *category,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::write_records;
    use crate::types::{Conference, GameRecord, PlayerStatRecord, StandingsRecord};

    fn player(rank: &str, name: &str, team: &str, fg_pct: &str) -> PlayerStatRecord {
        let mut stats: Vec<String> = [
            "70", "34.2", "11.3", "21.8", ".519", "2.1", "5.7", ".375", "9.2", "16.1", ".571",
            "7.9", "8.8", ".898", "0.9", "4.1", "5.0", "6.4", "1.7", "1.0", "2.4", "2.2", "32.7",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        stats[4] = fg_pct.to_string();

        PlayerStatRecord {
            rank: rank.to_string(),
            player: name.to_string(),
            team: team.to_string(),
            stats,
        }
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("64"), Some(64.0));
        assert_eq!(coerce_number(".456"), Some(0.456));
        assert_eq!(coerce_number(" 34.5 "), Some(34.5));
        assert_eq!(coerce_number("—"), None);
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("NaN"), None);
        assert_eq!(coerce_number("inf"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(64.0), "64");
        assert_eq!(format_number(0.456), "0.456");
        assert_eq!(format_number(34.5), "34.5");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_standings_are_coerced_not_dropped() {
        let table = Table::from_records(&[
            StandingsRecord {
                conference: Conference::Eastern,
                team: "Boston Celtics".to_string(),
                wins: "64".to_string(),
                losses: "18".to_string(),
            },
            StandingsRecord {
                conference: Conference::Eastern,
                team: "Unknown".to_string(),
                wins: "—".to_string(),
                losses: "".to_string(),
            },
        ]);

        let (cleaned, dropped) = clean_table(table, &Category::Standings.rules()).unwrap();

        assert_eq!(dropped, 0);
        assert_eq!(
            cleaned.rows[0],
            vec!["Eastern Conference", "Boston Celtics", "64", "18"]
        );
        assert_eq!(cleaned.rows[1][2], "");
    }

    #[test]
    fn test_player_with_placeholder_is_dropped_and_columns_renamed() {
        let table = Table::from_records(&[
            player("1", "Shai Gilgeous-Alexander", "OKC", ".519"),
            player("2", "Bench Player", "BOS", "—"),
        ]);

        let (cleaned, dropped) = clean_table(table, &Category::PlayerStats.rules()).unwrap();

        assert_eq!(dropped, 1);
        assert_eq!(cleaned.rows.len(), 1);
        assert_eq!(cleaned.rows[0][1], "Shai Gilgeous-Alexander");
        assert_eq!(&cleaned.headers[..3], ["Rank", "Player Name", "Team"]);
        let fg_pct = cleaned.column("FG%").unwrap();
        assert_eq!(cleaned.rows[0][fg_pct], "0.519");
    }

    #[test]
    fn test_repeated_header_rows_are_dropped() {
        let header_row = PlayerStatRecord {
            rank: "Rk".to_string(),
            player: "Player".to_string(),
            team: "Team".to_string(),
            stats: PLAYER_COLUMNS[3..].iter().map(|c| c.to_string()).collect(),
        };
        let table = Table::from_records(&[player("1", "A", "OKC", ".5"), header_row]);

        let (cleaned, dropped) = clean_table(table, &Category::PlayerStats.rules()).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(cleaned.rows.len(), 1);
    }

    #[test]
    fn test_missing_numeric_column_is_an_error() {
        let table = Table {
            headers: vec!["Conference".to_string(), "Team".to_string()],
            rows: Vec::new(),
        };

        assert!(matches!(
            clean_table(table, &Category::Standings.rules()),
            Err(TableError::MissingColumn(column)) if column == "Wins"
        ));
    }

    #[test]
    fn test_clean_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("player_stats.csv");
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");

        write_records(
            &raw,
            &[
                player("1", "Shai Gilgeous-Alexander", "OKC", ".519"),
                player("2", "Nikola Jokić", "DEN", ".576"),
                player("3", "Bench Player", "BOS", ""),
            ],
        )
        .unwrap();

        clean_file(&raw, &first, Category::PlayerStats).unwrap();
        clean_file(&raw, &second, Category::PlayerStats).unwrap();

        let first = std::fs::read(&first).unwrap();
        let second = std::fs::read(&second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clean_all_writes_clean_files() {
        let dir = tempfile::tempdir().unwrap();

        write_records::<GameRecord>(dir.path().join("daily_scores.csv"), &[]).unwrap();
        write_records(
            dir.path().join("league_standings.csv"),
            &[StandingsRecord {
                conference: Conference::Eastern,
                team: "Boston Celtics".to_string(),
                wins: "64".to_string(),
                losses: "18".to_string(),
            }],
        )
        .unwrap();
        write_records(
            dir.path().join("player_stats.csv"),
            &[player("1", "A", "OKC", ".5")],
        )
        .unwrap();

        let reports = clean_all(dir.path()).unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[1].kept, 1);

        let standings = Table::read(dir.path().join("league_standings_clean.csv")).unwrap();
        assert_eq!(
            standings.rows,
            vec![vec!["Eastern Conference", "Boston Celtics", "64", "18"]]
        );
    }
}
