//! Utility functions for text cleanup, keyword loading and file system checks.

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapse runs of whitespace (including newlines) into single spaces and
/// trim the ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_whitespace("  a \n\t b "), "a b");
/// ```
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, on a character boundary,
/// with an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Split keyword file contents into search keywords, one per line.
///
/// Lines are trimmed and blank lines are skipped.
pub fn parse_keywords(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read search keywords from `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_keywords(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).await?;
    let keywords = parse_keywords(&contents);
    if keywords.is_empty() {
        warn!("Keyword file contains no keywords");
    } else {
        info!(count = keywords.len(), "Loaded search keywords");
    }
    Ok(keywords)
}

/// Ensure the directory that will hold `path` exists.
///
/// A bare file name (no parent component) refers to the working directory
/// and needs nothing created.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            Ok(())
        }
        _ => Ok(()),
    }
}
