//! # PubMed Crawler
//!
//! Asynchronously scrapes PubMed search results for a list of keywords and
//! saves the metadata of every article found to a CSV file, ready for
//! chunking and embedding by downstream tooling.
//!
//! ## Usage
//!
//! ```sh
//! # keywords.txt holds one search keyword per line
//! pubmed_crawler --pages 10 --start 2019 --stop 2020 --output articles.csv
//! ```
//!
//! ## Architecture
//!
//! 1. **Discovery**: fetch every search results page for every keyword and
//!    collect the unique PMIDs listed on them
//! 2. **Extraction**: fetch every article page (100 at a time by default)
//!    and extract title, authors, abstract, affiliations, journal, keywords
//!    and date
//! 3. **Output**: write all records to CSV in one go

use chrono::{Datelike, Local};
use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod client;
mod config;
mod crawler;
mod error;
mod frontier;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use client::{HttpFetcher, RetryFetch};
use config::CrawlerConfig;
use crawler::{Crawler, SearchEndpoints};
use outputs::csv;
use utils::load_keywords;

/// Search keywords are always read from this file in the working directory.
const KEYWORDS_FILE: &str = "keywords.txt";

/// Number of records logged after the crawl as a preview.
const PREVIEW_ROWS: usize = 5;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("pubmed_crawler starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    if let Err(msg) = args.validate() {
        error!(%msg, "Invalid arguments");
        return Err(msg.into());
    }
    let current_year = Local::now().year();
    if args.stop > current_year {
        warn!(
            stop = args.stop,
            current_year, "Stop year is in the future; results will end at the current year"
        );
    }
    let output_path = args.output_path();

    // ---- Load config & keywords ----
    let config = CrawlerConfig::load(args.config.as_deref()).await?;
    info!(
        concurrency = config.concurrency,
        timeout_secs = config.request_timeout_secs,
        retries = config.retries,
        "Crawler configuration"
    );
    let keywords = load_keywords(Path::new(KEYWORDS_FILE)).await?;

    // ---- Crawl ----
    let fetcher = RetryFetch::new(
        HttpFetcher::new(&config)?,
        config.retries,
        StdDuration::from_millis(config.retry_base_delay_ms),
    );
    let endpoints = SearchEndpoints::new(&config, args.start, args.stop);
    let crawler = Crawler::new(fetcher, endpoints, config.concurrency);

    let report = match crawler.run(&keywords, args.pages).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Crawl aborted; no output written");
            return Err(e.into());
        }
    };
    info!(
        articles = report.discovered,
        start = args.start,
        stop = args.stop,
        "Scraping finished for article URLs found in range"
    );

    // ---- Output ----
    info!("Preview of scraped article data");
    csv::preview(&report.records, PREVIEW_ROWS);

    if let Err(e) = csv::write_articles(&output_path, &report.records).await {
        error!(path = %output_path.display(), error = %e, "Failed writing CSV");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        found = report.discovered,
        search_pages = report.search_pages,
        saved = report.records.len(),
        page_failures = report.page_failures,
        article_failures = report.article_failures,
        path = %output_path.display(),
        "Execution complete"
    );

    Ok(())
}
