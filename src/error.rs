//! Error type shared by the crawler.
//!
//! Transport and status failures come from a single fetch; the two
//! structural variants mean a page is missing something the crawl cannot
//! continue without. Optional article fields never produce an error, they
//! fall back to a sentinel instead (see [`crate::models`]).

use thiserror::Error;

pub type Result<T> = core::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("required element is missing from page. Selector: {0}")]
    MissingElement(&'static str),

    #[error("could not read a page count from {0:?}")]
    InvalidPageCount(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScrapeError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ScrapeError::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transience() {
        let busy = ScrapeError::Status {
            url: "https://example.com".into(),
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
        };
        let gone = ScrapeError::Status {
            url: "https://example.com".into(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(busy.is_transient());
        assert!(!gone.is_transient());
        assert!(!ScrapeError::MissingElement("span.total-pages").is_transient());
    }

    #[test]
    fn test_display_names_selector() {
        let e = ScrapeError::MissingElement(r#"meta[name="log_displayeduids"]"#);
        assert!(e.to_string().contains("log_displayeduids"));
    }
}
