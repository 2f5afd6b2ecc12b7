//! HTTP fetching with randomized user agents and optional retry logic.
//!
//! # Architecture
//!
//! - [`FetchPage`]: core trait, one GET returning the response body as text
//! - [`HttpFetcher`]: `reqwest` implementation sharing one connection pool
//! - [`RetryFetch`]: decorator that adds exponential backoff to any [`FetchPage`]
//!
//! The crawler is generic over [`FetchPage`], so tests can drive it with
//! canned pages instead of the network.

use crate::config::CrawlerConfig;
use crate::error::{Result, ScrapeError};
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Browser user agents rotated across requests so traffic is not
/// concentrated on a single agent string.
pub const USER_AGENTS: [&str; 21] = [
    "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.1 (KHTML, like Gecko) Chrome/22.0.1207.1 Safari/537.1",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:55.0) Gecko/20100101 Firefox/55.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.101 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.1 (KHTML, like Gecko) Chrome/22.0.1207.1 Safari/537.1",
    "Mozilla/5.0 (X11; CrOS i686 2268.111.0) AppleWebKit/536.11 (KHTML, like Gecko) Chrome/20.0.1132.57 Safari/536.11",
    "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/536.6 (KHTML, like Gecko) Chrome/20.0.1092.0 Safari/536.6",
    "Mozilla/5.0 (Windows NT 6.0) AppleWebKit/536.5 (KHTML, like Gecko) Chrome/19.0.1084.36 Safari/536.5",
    "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/536.3 (KHTML, like Gecko) Chrome/19.0.1063.0 Safari/536.3",
    "Mozilla/5.0 (Windows NT 5.1) AppleWebKit/536.3 (KHTML, like Gecko) Chrome/19.0.1063.0 Safari/536.3",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_8_0) AppleWebKit/536.3 (KHTML, like Gecko) Chrome/19.0.1063.0 Safari/536.3",
    "Mozilla/5.0 (Windows NT 6.2) AppleWebKit/536.3 (KHTML, like Gecko) Chrome/19.0.1062.0 Safari/536.3",
    "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/536.3 (KHTML, like Gecko) Chrome/19.0.1062.0 Safari/536.3",
    "Mozilla/5.0 (Windows NT 6.2) AppleWebKit/536.3 (KHTML, like Gecko) Chrome/19.0.1061.1 Safari/536.3",
    "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/536.3 (KHTML, like Gecko) Chrome/19.0.1061.1 Safari/536.3",
    "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/536.3 (KHTML, like Gecko) Chrome/19.0.1061.1 Safari/536.3",
    "Mozilla/5.0 (Windows NT 6.2) AppleWebKit/536.6 (KHTML, like Gecko) Chrome/20.0.1090.0 Safari/536.6",
    "Mozilla/5.0 (Windows NT 6.2; WOW64) AppleWebKit/537.1 (KHTML, like Gecko) Chrome/19.77.34.5 Safari/537.1",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/536.5 (KHTML, like Gecko) Chrome/19.0.1084.9 Safari/536.5",
    "Mozilla/5.0 (Windows NT 6.2) AppleWebKit/536.3 (KHTML, like Gecko) Chrome/19.0.1061.0 Safari/536.3",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/535.24 (KHTML, like Gecko) Chrome/19.0.1055.1 Safari/535.24",
    "Mozilla/5.0 (Windows NT 6.2; WOW64) AppleWebKit/535.24 (KHTML, like Gecko) Chrome/19.0.1055.1 Safari/535.24",
];

/// Trait for fetching a page body.
///
/// Implementors perform a single GET and return the body text, or an error
/// for transport failures and non-2xx responses.
pub trait FetchPage {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Build request headers with a randomly chosen user agent.
pub fn make_header() -> HeaderMap {
    let agent = USER_AGENTS.choose(&mut rng()).copied().unwrap_or(USER_AGENTS[0]);
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(agent));
    headers
}

/// [`FetchPage`] backed by a shared [`reqwest::Client`].
///
/// The client is constrained to IPv4, uses rustls with the bundled web PKI
/// roots and enforces a per-request timeout. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher from the crawler settings.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the per-request and connect timeouts
    ///
    /// # Returns
    ///
    /// A fetcher whose clones share one connection pool, or an error if the
    /// TLS backend cannot be initialised.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .use_rustls_tls()
            .local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
            .timeout(StdDuration::from_secs(config.request_timeout_secs))
            .connect_timeout(StdDuration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let response = self.client.get(url).headers(make_header()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = body.len(),
            "Fetched page"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchPage`].
///
/// Only transient failures (see [`ScrapeError::is_transient`]) are retried.
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
/// With `max_retries == 0` this is a plain pass-through.
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: FetchPage,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn delay_for(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        let delay = self
            .base_delay
            .saturating_mul(1 << shift)
            .min(self.max_delay);
        delay + StdDuration::from_millis(rng().random_range(0..=250))
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchPage for RetryFetch<T>
where
    T: FetchPage,
{
    async fn fetch(&self, url: &str) -> Result<String> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if !e.is_transient() || attempt > self.max_retries {
                        if self.max_retries > 0 && e.is_transient() {
                            error!(
                                %url,
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                                error = %e,
                                "fetch exhausted retries"
                            );
                        }
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt);
                    warn!(
                        %url,
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
