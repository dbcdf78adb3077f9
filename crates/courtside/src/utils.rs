use std::path::{Path, PathBuf};

use crate::clean::Category;
use crate::scraper::ScrapeOutput;
use crate::table::{TableError, write_records};

/// Writes the three raw files into `dir`, replacing any previous run.
pub fn write_raw(
    output: &ScrapeOutput,
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, TableError> {
    let dir = dir.as_ref();
    let paths: Vec<PathBuf> = Category::ALL
        .iter()
        .map(|category| dir.join(category.raw_file()))
        .collect();

    write_records(&paths[0], &output.games)?;
    write_records(&paths[1], &output.standings)?;
    write_records(&paths[2], &output.players)?;

    Ok(paths)
}

#[derive(Debug, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub games: usize,
    pub standings: usize,
    pub players: usize,
}

impl ScrapeSummary {
    pub fn from_output(output: &ScrapeOutput) -> ScrapeSummary {
        ScrapeSummary {
            games: output.games.len(),
            standings: output.standings.len(),
            players: output.players.len(),
        }
    }
}

impl std::fmt::Display for ScrapeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Games with box scores: {}", self.games)?;
        writeln!(f, "  Standings rows:        {}", self.standings)?;
        writeln!(f, "  Player rows:           {}", self.players)
    }
}
