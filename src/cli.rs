//! Command-line interface definitions for the PubMed crawler.
//!
//! Run parameters come from flags; crawler tuning (endpoints, concurrency,
//! timeouts, retries) comes from an optional YAML file, see
//! [`CrawlerConfig`](crate::config::CrawlerConfig).

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the crawler.
///
/// # Examples
///
/// ```sh
/// # Look up the page count for every keyword, articles from 2019-2020
/// pubmed_crawler
///
/// # Two pages per keyword, 2020 only, custom output file
/// pubmed_crawler --pages 2 --start 2020 --stop 2020 --output aspirin
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of search result pages to scrape for EACH keyword
    /// (default: look up every page)
    #[arg(long)]
    pub pages: Option<u32>,

    /// Start year of the publication date range
    #[arg(long, default_value_t = 2019)]
    pub start: i32,

    /// Stop year of the publication date range
    #[arg(long, default_value_t = 2020)]
    pub stop: i32,

    /// Output file name; ".csv" is appended if missing
    #[arg(long, default_value = "articles.csv")]
    pub output: String,

    /// Optional path to a YAML crawler config
    #[arg(short, long, env = "PUBMED_CRAWLER_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Output path with the `.csv` suffix enforced.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(normalize_output(&self.output))
    }

    /// Check the year range, returning a message on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.start > self.stop {
            return Err(format!(
                "--start ({}) must not be after --stop ({})",
                self.start, self.stop
            ));
        }
        Ok(())
    }
}

/// Append `.csv` unless the name already ends with it.
pub fn normalize_output(name: &str) -> String {
    if name.ends_with(".csv") {
        name.to_string()
    } else {
        format!("{name}.csv")
    }
}
