//! Two-phase crawl of PubMed search results.
//!
//! 1. **Discovery**: every `(keyword, page)` search listing is fetched and
//!    parsed concurrently. The PMIDs returned by each task are folded into a
//!    [`Frontier`], which drops duplicates across pages and keywords.
//! 2. **Extraction**: once discovery has fully drained, every frontier id is
//!    fetched and parsed into an [`ArticleRecord`], again concurrently.
//!
//! Both phases run through `buffer_unordered(concurrency)`, so at most
//! `concurrency` requests are in flight at any time. Tasks return their
//! results to the crawler instead of touching shared state. A failed search
//! page or article is logged and counted; its siblings carry on.

use crate::client::FetchPage;
use crate::config::CrawlerConfig;
use crate::error::Result;
use crate::frontier::Frontier;
use crate::models::{ArticleId, ArticleRecord};
use crate::scrapers::pubmed::{parse_article_page, parse_page_count, parse_search_page};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// URL templates for the search listing and article pages.
#[derive(Debug, Clone)]
pub struct SearchEndpoints {
    search_url: String,
    article_base_url: String,
    start_year: i32,
    stop_year: i32,
}

impl SearchEndpoints {
    /// Build the endpoint templates for one publication year range.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the search listing and article base URLs
    /// * `start_year` - First publication year included in the search
    /// * `stop_year` - Last publication year included in the search
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let e = SearchEndpoints::new(&CrawlerConfig::default(), 2019, 2020);
    /// assert_eq!(e.article_url(&"1".into()), "https://pubmed.ncbi.nlm.nih.gov/1");
    /// ```
    pub fn new(config: &CrawlerConfig, start_year: i32, stop_year: i32) -> Self {
        Self {
            search_url: config.search_url.clone(),
            article_base_url: config.article_base_url.trim_end_matches('/').to_string(),
            start_year,
            stop_year,
        }
    }

    /// Search listing for `keyword` restricted to the publication year range.
    ///
    /// Without a page number this is the first page as used for the page
    /// count lookup.
    pub fn search_url(&self, keyword: &str, page: Option<u32>) -> String {
        let base = format!(
            "{}?term={}%3A{}%5Bdp%5D+{}",
            self.search_url,
            self.start_year,
            self.stop_year,
            urlencoding::encode(keyword)
        );
        match page {
            Some(page) => format!("{base}+&page={page}"),
            None => base,
        }
    }

    pub fn article_url(&self, id: &ArticleId) -> String {
        format!("{}/{}", self.article_base_url, id)
    }
}

/// Outcome of a full crawl.
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Extracted articles in completion order.
    pub records: Vec<ArticleRecord>,
    /// Distinct article ids found during discovery.
    pub discovered: usize,
    /// Search listing pages scheduled during discovery.
    pub search_pages: usize,
    pub page_failures: usize,
    pub article_failures: usize,
}

/// Result of the discovery phase.
#[derive(Debug)]
pub struct Discovery {
    pub frontier: Frontier,
    pub search_pages: usize,
    pub page_failures: usize,
}

pub struct Crawler<F> {
    fetcher: F,
    endpoints: SearchEndpoints,
    concurrency: usize,
}

impl<F> Crawler<F>
where
    F: FetchPage,
{
    /// Create a crawler.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Performs every request of both phases
    /// * `endpoints` - URL templates for search listings and articles
    /// * `concurrency` - Maximum in-flight requests per phase; `0` is
    ///   treated as `1`
    pub fn new(fetcher: F, endpoints: SearchEndpoints, concurrency: usize) -> Self {
        Self {
            fetcher,
            endpoints,
            concurrency: concurrency.max(1),
        }
    }

    /// Discover article ids for `keywords`, then extract every one of them.
    ///
    /// `pages` overrides the number of search pages fetched per keyword;
    /// without it the count is looked up from each keyword's first page.
    /// Only a failed page count lookup aborts the crawl.
    ///
    /// # Returns
    ///
    /// A [`CrawlReport`] with the records in completion order and the
    /// discovery and failure counts.
    #[instrument(level = "info", skip_all, fields(keywords = keywords.len(), ?pages))]
    pub async fn run(&self, keywords: &[String], pages: Option<u32>) -> Result<CrawlReport> {
        let discovery = self.discover(keywords, pages).await?;
        let discovered = discovery.frontier.len();
        if discovery.frontier.is_empty() {
            warn!("Discovery found no articles");
        }

        // Discovery has fully drained; the frontier is frozen from here on.
        let (records, article_failures) = self.extract(discovery.frontier.into_pending()).await;

        Ok(CrawlReport {
            records,
            discovered,
            search_pages: discovery.search_pages,
            page_failures: discovery.page_failures,
            article_failures,
        })
    }

    /// Number of search pages to fetch for `keyword`.
    #[instrument(level = "info", skip(self))]
    pub async fn page_count(&self, keyword: &str, pages: Option<u32>) -> Result<u32> {
        if let Some(pages) = pages {
            return Ok(pages);
        }
        let html = self
            .fetcher
            .fetch(&self.endpoints.search_url(keyword, None))
            .await?;
        let count = parse_page_count(&html)?;
        info!(count, "Looked up result page count");
        Ok(count)
    }

    /// Fetch every search page for every keyword and collect the ids found.
    pub async fn discover(&self, keywords: &[String], pages: Option<u32>) -> Result<Discovery> {
        let t0 = Instant::now();

        let mut jobs = Vec::new();
        for keyword in keywords {
            let count = self.page_count(keyword, pages).await?;
            jobs.extend((1..=count).map(|page| (keyword.as_str(), page)));
        }
        let search_pages = jobs.len();
        info!(
            search_pages,
            concurrency = self.concurrency,
            "Starting discovery"
        );

        let mut frontier = Frontier::new();
        let mut page_failures = 0usize;
        let mut results = stream::iter(jobs)
            .map(|(keyword, page)| async move {
                let url = self.endpoints.search_url(keyword, Some(page));
                let ids = self
                    .fetcher
                    .fetch(&url)
                    .await
                    .and_then(|html| parse_search_page(&html));
                (keyword, page, ids)
            })
            .buffer_unordered(self.concurrency);

        while let Some((keyword, page, ids)) = results.next().await {
            match ids {
                Ok(ids) => {
                    let found = ids.len();
                    let added = frontier.extend(ids);
                    debug!(keyword, page, found, added, "Parsed search page");
                }
                Err(e) => {
                    page_failures += 1;
                    warn!(keyword, page, error = %e, "Search page failed; skipping");
                }
            }
        }

        info!(
            discovered = frontier.len(),
            search_pages,
            page_failures,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Discovery complete"
        );
        Ok(Discovery {
            frontier,
            search_pages,
            page_failures,
        })
    }

    /// Fetch and parse every article in `ids`.
    ///
    /// Returns the records in completion order and the number of articles
    /// whose fetch failed.
    pub async fn extract(&self, ids: Vec<ArticleId>) -> (Vec<ArticleRecord>, usize) {
        let t0 = Instant::now();
        let total = ids.len();
        info!(
            articles = total,
            concurrency = self.concurrency,
            "Starting extraction"
        );

        let mut records = Vec::with_capacity(total);
        let mut failures = 0usize;
        let mut results = stream::iter(ids)
            .map(|id| async move {
                let url = self.endpoints.article_url(&id);
                let record = self
                    .fetcher
                    .fetch(&url)
                    .await
                    .map(|html| parse_article_page(&url, &html));
                (url, record)
            })
            .buffer_unordered(self.concurrency);

        while let Some((url, record)) = results.next().await {
            match record {
                Ok(record) => {
                    debug!(%url, missing = record.missing_fields(), "Extracted article");
                    records.push(record);
                }
                Err(e) => {
                    failures += 1;
                    warn!(%url, error = %e, "Article fetch failed; skipping");
                }
            }
        }

        info!(
            extracted = records.len(),
            failures,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Extraction complete"
        );
        (records, failures)
    }
}
