//! Crawler settings, optionally loaded from a YAML file.
//!
//! Every key has a default, so an empty file (or no file at all) yields the
//! stock PubMed endpoints with 100 concurrent requests.
//!
//! ```yaml
//! concurrency: 20
//! request_timeout_secs: 15
//! retries: 2
//! ```

use crate::error::{Result, ScrapeError};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlerConfig {
    /// Search listing endpoint; the `term` and `page` query is appended.
    pub search_url: String,
    /// Article ids are appended to this as a path segment.
    pub article_base_url: String,
    /// Upper bound on in-flight requests in each crawl phase.
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Retries per request for transient failures. `0` disables retrying.
    pub retries: usize,
    pub retry_base_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            search_url: "https://pubmed.ncbi.nlm.nih.gov/".to_string(),
            article_base_url: "https://pubmed.ncbi.nlm.nih.gov".to_string(),
            concurrency: 100,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            retries: 0,
            retry_base_delay_ms: 1000,
        }
    }
}

impl CrawlerConfig {
    /// Parse and validate settings from a YAML document.
    ///
    /// # Arguments
    ///
    /// * `yaml` - YAML text; missing keys take their defaults and an empty
    ///   document yields [`CrawlerConfig::default`]
    ///
    /// # Returns
    ///
    /// The validated config, [`ScrapeError::Config`] for malformed YAML or
    /// unknown keys, or [`ScrapeError::InvalidConfig`] for values that fail
    /// [`CrawlerConfig::validate`].
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = CrawlerConfig::from_yaml("concurrency: 8")?;
    /// assert_eq!(config.concurrency, 8);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty map.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load settings from `path`, or the defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&yaml)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Reject settings the crawler cannot run with: zero concurrency, zero
    /// timeouts, or endpoints that are not absolute URLs.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(ScrapeError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ScrapeError::InvalidConfig(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ScrapeError::InvalidConfig(
                "connect_timeout_secs must be at least 1".into(),
            ));
        }
        for (key, value) in [
            ("search_url", &self.search_url),
            ("article_base_url", &self.article_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| ScrapeError::InvalidConfig(format!("{key} {value:?}: {e}")))?;
        }
        Ok(())
    }
}
