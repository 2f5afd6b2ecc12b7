//! Data models for crawled PubMed articles.
//!
//! - [`ArticleId`]: PubMed accession id (PMID) discovered on a search page
//! - [`ArticleRecord`]: the eight fields extracted from one article page
//!
//! Every [`ArticleRecord`] field is always populated. When a field cannot be
//! extracted it holds that field's sentinel (`NO_TITLE`, `NO_AUTHOR`, ...).

use std::fmt;

pub const NO_TITLE: &str = "NO_TITLE";
pub const NO_AUTHOR: &str = "NO_AUTHOR";
pub const NO_ABSTRACT: &str = "NO_ABSTRACT";
pub const NO_AFFILIATIONS: &str = "NO_AFFILIATIONS";
pub const NO_JOURNAL: &str = "NO_JOURNAL";
pub const NO_KEYWORDS: &str = "NO_KEYWORDS";
pub const NO_DATE: &str = "NO_DATE";

/// Column order of the CSV export, after the leading index column.
pub const CSV_COLUMNS: [&str; 8] = [
    "title",
    "abstract",
    "affiliations",
    "authors",
    "journal",
    "date",
    "keywords",
    "url",
];

/// A PubMed accession id, e.g. `"32887691"`.
///
/// Treated as opaque: it is only compared, hashed and appended to the
/// article base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ArticleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Metadata scraped from a single article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// The article URL that was fetched.
    pub url: String,
    pub title: String,
    /// Author names joined with `", "`.
    pub authors: String,
    /// Abstract paragraphs joined with a single space.
    pub r#abstract: String,
    /// Affiliation entries joined with `"; "`.
    pub affiliations: String,
    pub journal: String,
    pub keywords: String,
    /// Publication year as printed on the page.
    pub date: String,
}

impl ArticleRecord {
    /// Values in [`CSV_COLUMNS`] order.
    pub fn csv_fields(&self) -> [&str; 8] {
        [
            &self.title,
            &self.r#abstract,
            &self.affiliations,
            &self.authors,
            &self.journal,
            &self.date,
            &self.keywords,
            &self.url,
        ]
    }

    /// Number of fields that fell back to their sentinel.
    pub fn missing_fields(&self) -> usize {
        [
            (self.title.as_str(), NO_TITLE),
            (self.authors.as_str(), NO_AUTHOR),
            (self.r#abstract.as_str(), NO_ABSTRACT),
            (self.affiliations.as_str(), NO_AFFILIATIONS),
            (self.journal.as_str(), NO_JOURNAL),
            (self.keywords.as_str(), NO_KEYWORDS),
            (self.date.as_str(), NO_DATE),
        ]
        .into_iter()
        .filter(|(value, sentinel)| value == sentinel)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ArticleRecord {
        ArticleRecord {
            url: "https://pubmed.ncbi.nlm.nih.gov/1".into(),
            title: "A title".into(),
            authors: NO_AUTHOR.into(),
            r#abstract: "Abstract".into(),
            affiliations: NO_AFFILIATIONS.into(),
            journal: "Journal".into(),
            keywords: "aspirin".into(),
            date: "2020".into(),
        }
    }

    #[test]
    fn test_csv_fields_follow_column_order() {
        let r = record();
        let fields = r.csv_fields();
        assert_eq!(fields.len(), CSV_COLUMNS.len());
        assert_eq!(fields[0], "A title");
        assert_eq!(fields[5], "2020");
        assert_eq!(fields[7], "https://pubmed.ncbi.nlm.nih.gov/1");
    }

    #[test]
    fn test_missing_fields_counts_sentinels() {
        assert_eq!(record().missing_fields(), 2);
    }

    #[test]
    fn test_article_id_display() {
        let id = ArticleId::from("32887691");
        assert_eq!(id.to_string(), "32887691");
        assert_eq!(id.as_str(), "32887691");
    }
}
