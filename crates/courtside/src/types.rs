use std::{fmt::Display, str::FromStr};

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
#[error("Invalid conference '{0}'. Accepted values: 'east', 'eastern', 'west', 'western'")]
pub struct ConferenceParseError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Conference {
    #[serde(rename = "Eastern Conference")]
    Eastern,
    #[serde(rename = "Western Conference")]
    Western,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::Eastern, Conference::Western];

    /// Id of the conference table on the season standings page.
    pub fn table_id(&self) -> &'static str {
        match self {
            Conference::Eastern => "confs_standings_E",
            Conference::Western => "confs_standings_W",
        }
    }
}

impl FromStr for Conference {
    type Err = ConferenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "east" | "eastern" | "eastern conference" => Ok(Conference::Eastern),
            "west" | "western" | "western conference" => Ok(Conference::Western),
            _ => Err(ConferenceParseError(s.to_string())),
        }
    }
}

impl Display for Conference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conference::Eastern => write!(f, "Eastern Conference"),
            Conference::Western => write!(f, "Western Conference"),
        }
    }
}

/// A flat record that can be written as one delimited row.
pub trait Record {
    fn headers() -> Vec<String>;
    fn fields(&self) -> Vec<String>;
}

/// Column labels of the "Team Totals" row, in page order after the minutes column.
pub const TOTALS_COLUMNS: [&str; 18] = [
    "FG", "FGA", "FG%", "3P", "3PA", "3P%", "FT", "FTA", "FT%", "ORB", "DRB", "TRB", "AST", "STL",
    "BLK", "TOV", "PF", "PTS",
];

/// One side's "Team Totals" row from a box score, kept as page text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamTotals {
    pub fg: String,
    pub fga: String,
    pub fg_pct: String,
    pub fg3: String,
    pub fg3a: String,
    pub fg3_pct: String,
    pub ft: String,
    pub fta: String,
    pub ft_pct: String,
    pub orb: String,
    pub drb: String,
    pub trb: String,
    pub ast: String,
    pub stl: String,
    pub blk: String,
    pub tov: String,
    pub pf: String,
    pub pts: String,
}

impl TeamTotals {
    /// Builds totals from exactly 18 cell texts in `TOTALS_COLUMNS` order.
    pub fn from_cells(cells: [String; 18]) -> Self {
        let [
            fg,
            fga,
            fg_pct,
            fg3,
            fg3a,
            fg3_pct,
            ft,
            fta,
            ft_pct,
            orb,
            drb,
            trb,
            ast,
            stl,
            blk,
            tov,
            pf,
            pts,
        ] = cells;

        Self {
            fg,
            fga,
            fg_pct,
            fg3,
            fg3a,
            fg3_pct,
            ft,
            fta,
            ft_pct,
            orb,
            drb,
            trb,
            ast,
            stl,
            blk,
            tov,
            pf,
            pts,
        }
    }

    pub fn values(&self) -> [&str; 18] {
        [
            &self.fg,
            &self.fga,
            &self.fg_pct,
            &self.fg3,
            &self.fg3a,
            &self.fg3_pct,
            &self.ft,
            &self.fta,
            &self.ft_pct,
            &self.orb,
            &self.drb,
            &self.trb,
            &self.ast,
            &self.stl,
            &self.blk,
            &self.tov,
            &self.pf,
            &self.pts,
        ]
    }

    /// Headers for one side, e.g. `Away FG`, `Home 3P%`.
    pub fn prefixed_headers(prefix: &str) -> Vec<String> {
        TOTALS_COLUMNS
            .iter()
            .map(|col| format!("{prefix} {col}"))
            .collect()
    }
}

/// Result of looking for one field group on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<T> {
    Found(T),
    /// The table or row is not on the page, or the row has no data cells.
    Missing,
    /// The row is there but cannot be read; carries the reason.
    Malformed(String),
}

impl<T> Extraction<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Extraction::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found(_))
    }
}

impl<T> Display for Extraction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Extraction::Found(_) => write!(f, "found"),
            Extraction::Missing => write!(f, "missing"),
            Extraction::Malformed(reason) => write!(f, "malformed ({reason})"),
        }
    }
}

/// Both sides of a box score as located on the game page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxScoreTotals {
    pub away: Extraction<TeamTotals>,
    pub home: Extraction<TeamTotals>,
}

impl BoxScoreTotals {
    /// Both sides, or `None` when either one was not found.
    pub fn complete(self) -> Option<(TeamTotals, TeamTotals)> {
        Some((self.away.found()?, self.home.found()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub date: String,
    pub away_team: String,
    pub away_score: String,
    pub home_team: String,
    pub home_score: String,
    pub away: TeamTotals,
    pub home: TeamTotals,
}

impl Record for GameRecord {
    fn headers() -> Vec<String> {
        let mut headers: Vec<String> = ["Date", "Away Team", "Away Score", "Home Team", "Home Score"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        headers.extend(TeamTotals::prefixed_headers("Away"));
        headers.extend(TeamTotals::prefixed_headers("Home"));
        headers
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.date.clone(),
            self.away_team.clone(),
            self.away_score.clone(),
            self.home_team.clone(),
            self.home_score.clone(),
        ];
        fields.extend(self.away.values().iter().map(|v| v.to_string()));
        fields.extend(self.home.values().iter().map(|v| v.to_string()));
        fields
    }
}

impl Display for GameRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {} @ {} {}",
            self.date, self.away_team, self.away_score, self.home_team, self.home_score
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRecord {
    pub conference: Conference,
    pub team: String,
    pub wins: String,
    pub losses: String,
}

impl Record for StandingsRecord {
    fn headers() -> Vec<String> {
        ["Conference", "Team", "Wins", "Losses"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.conference.to_string(),
            self.team.clone(),
            self.wins.clone(),
            self.losses.clone(),
        ]
    }
}

impl Display for StandingsRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {} Wins, {} Losses",
            self.conference, self.team, self.wins, self.losses
        )
    }
}

/// Columns copied from the per-game table, by header name.
pub const PLAYER_COLUMNS: [&str; 26] = [
    "Rk", "Player", "Team", "G", "MP", "FG", "FGA", "FG%", "3P", "3PA", "3P%", "2P", "2PA", "2P%",
    "FT", "FTA", "FT%", "ORB", "DRB", "TRB", "AST", "STL", "BLK", "TOV", "PF", "PTS",
];

/// One row of the per-game table. `stats` follows `PLAYER_COLUMNS[3..]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStatRecord {
    pub rank: String,
    pub player: String,
    pub team: String,
    pub stats: Vec<String>,
}

impl PlayerStatRecord {
    pub fn stat(&self, column: &str) -> Option<&str> {
        PLAYER_COLUMNS[3..]
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.stats.get(i))
            .map(String::as_str)
    }
}

impl Record for PlayerStatRecord {
    fn headers() -> Vec<String> {
        PLAYER_COLUMNS.iter().map(|h| h.to_string()).collect()
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.rank.clone(), self.player.clone(), self.team.clone()];
        fields.extend(self.stats.iter().cloned());
        fields
    }
}

impl Display for PlayerStatRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>4}. {} ({}) {} PTS in {} G",
            self.rank,
            self.player,
            self.team,
            self.stat("PTS").unwrap_or("-"),
            self.stat("G").unwrap_or("-")
        )
    }
}
