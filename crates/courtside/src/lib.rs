pub mod clean;
mod parser;
pub mod report;
pub mod scraper;
pub mod table;
pub mod types;
pub mod utils;

pub use self::parser::{GamesDate, ParseError, boxscore_path, display_date};
pub use self::scraper::{ScrapeOutput, ScraperError, WebScraper};

pub(crate) const BASE_URL: &str = "https://www.basketball-reference.com";

/// Season whose standings and per-game pages are scraped when none is given.
pub const DEFAULT_SEASON: u16 = 2025;
