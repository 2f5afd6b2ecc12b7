//! PubMed page parser.
//!
//! Three kinds of page are read:
//!
//! - **search listing**: the PMIDs shown on the page are listed in
//!   `<meta name="log_displayeduids" content="1,2,3">`
//! - **pagination**: `<span class="total-pages">1,234</span>` on a listing
//! - **article detail**: citation meta tags plus the abstract, author and
//!   affiliation blocks
//!
//! The listing and pagination elements are required and their absence is an
//! error. Article fields are each optional and fall back to a sentinel.

use crate::error::{Result, ScrapeError};
use crate::models::{
    ArticleId, ArticleRecord, NO_ABSTRACT, NO_AFFILIATIONS, NO_AUTHOR, NO_DATE, NO_JOURNAL,
    NO_KEYWORDS, NO_TITLE,
};
use crate::utils::normalize_whitespace;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

const DISPLAYED_IDS: &str = r#"meta[name="log_displayeduids"]"#;
const TOTAL_PAGES: &str = "span.total-pages";

static DISPLAYED_IDS_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(DISPLAYED_IDS));
static TOTAL_PAGES_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(TOTAL_PAGES));
static TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="citation_title"]"#));
static JOURNAL: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="citation_journal_title"]"#));
static AUTHORS_LIST: Lazy<Selector> = Lazy::new(|| selector("div.authors-list"));
static FULL_NAME: Lazy<Selector> = Lazy::new(|| selector("a.full-name"));
static ABSTRACT_CONTENT: Lazy<Selector> =
    Lazy::new(|| selector("div.abstract-content.selected"));
static ABSTRACT: Lazy<Selector> = Lazy::new(|| selector("div.abstract"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));
static ITEM_LIST: Lazy<Selector> = Lazy::new(|| selector("ul.item-list"));
static LIST_ITEM: Lazy<Selector> = Lazy::new(|| selector("li"));
static CITATION_YEAR: Lazy<Selector> = Lazy::new(|| selector("time.citation-year"));

// Selector strings are compile-time constants; a parse failure is a typo.
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

/// Extract the PMIDs listed on a search results page, in page order.
pub fn parse_search_page(html: &str) -> Result<Vec<ArticleId>> {
    let document = Html::parse_document(html);
    let content = document
        .select(&DISPLAYED_IDS_SELECTOR)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .ok_or(ScrapeError::MissingElement(DISPLAYED_IDS))?;

    Ok(content
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ArticleId::from)
        .collect())
}

/// Read the total number of result pages from a search results page.
pub fn parse_page_count(html: &str) -> Result<u32> {
    let document = Html::parse_document(html);
    let text = document
        .select(&TOTAL_PAGES_SELECTOR)
        .next()
        .map(element_text)
        .ok_or(ScrapeError::MissingElement(TOTAL_PAGES))?;

    text.replace(',', "")
        .trim()
        .parse()
        .map_err(|_| ScrapeError::InvalidPageCount(text))
}

/// Extract an [`ArticleRecord`] from an article page.
///
/// Never fails: each field is extracted independently and a field that
/// cannot be found becomes its sentinel.
///
/// A block that is present but yields no text (an empty `authors-list`,
/// an abstract without paragraphs) is treated as missing too, so a CSV cell
/// is never empty: it holds either text or the field's sentinel.
pub fn parse_article_page(url: &str, html: &str) -> ArticleRecord {
    let document = Html::parse_document(html);
    let field = |extract: fn(&Html) -> Option<String>, sentinel: &str| {
        extract(&document)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| sentinel.to_string())
    };

    ArticleRecord {
        url: url.to_string(),
        title: field(title, NO_TITLE),
        authors: field(authors, NO_AUTHOR),
        r#abstract: field(abstract_text, NO_ABSTRACT),
        affiliations: field(affiliations, NO_AFFILIATIONS),
        journal: field(journal, NO_JOURNAL),
        keywords: field(keywords, NO_KEYWORDS),
        date: field(date, NO_DATE),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(normalize_whitespace)
}

fn title(document: &Html) -> Option<String> {
    meta_content(document, &TITLE)
        .map(|t| t.trim_matches(|c| c == '[' || c == ']').trim().to_string())
}

fn journal(document: &Html) -> Option<String> {
    meta_content(document, &JOURNAL)
}

fn authors(document: &Html) -> Option<String> {
    let list = document.select(&AUTHORS_LIST).next()?;
    Some(list.select(&FULL_NAME).map(element_text).join(", "))
}

fn abstract_text(document: &Html) -> Option<String> {
    let content = document.select(&ABSTRACT_CONTENT).next()?;
    Some(
        content
            .select(&PARAGRAPH)
            .map(element_text)
            .filter(|p| !p.is_empty())
            .join(" "),
    )
}

fn affiliations(document: &Html) -> Option<String> {
    let list = document.select(&ITEM_LIST).next()?;
    Some(
        list.select(&LIST_ITEM)
            .map(element_text)
            .filter(|a| !a.is_empty())
            .join("; "),
    )
}

fn keywords(document: &Html) -> Option<String> {
    let block = document.select(&ABSTRACT).next()?;
    let last = block.select(&PARAGRAPH).last()?;
    Some(element_text(last).replace("Keywords:", "").trim().to_string())
}

fn date(document: &Html) -> Option<String> {
    document.select(&CITATION_YEAR).next().map(element_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
        <html><head>
          <meta name="citation_title" content="[Aspirin and the heart.]">
          <meta name="citation_journal_title" content="The Lancet">
        </head><body>
          <div class="authors-list">
            <span><a class="full-name" href="/a">Jane  Doe</a></span>
            <span><a class="full-name" href="/b">John Roe</a></span>
            <a class="other" href="/c">Not an author</a>
          </div>
          <ul class="item-list">
            <li> Dept. of Medicine,
                 Example University </li>
            <li>Heart Institute</li>
          </ul>
          <time class="citation-year">2020</time>
          <div class="abstract">
            <div class="abstract-content selected">
              <p><strong>Background:</strong> Aspirin is widely used.</p>
              <p>It reduces risk.</p>
            </div>
            <p><strong>Keywords:</strong> aspirin; cardiology.</p>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_full_article() {
        let record = parse_article_page("https://pubmed.ncbi.nlm.nih.gov/1", ARTICLE);
        assert_eq!(record.url, "https://pubmed.ncbi.nlm.nih.gov/1");
        assert_eq!(record.title, "Aspirin and the heart.");
        assert_eq!(record.journal, "The Lancet");
        assert_eq!(record.authors, "Jane Doe, John Roe");
        assert_eq!(
            record.affiliations,
            "Dept. of Medicine, Example University; Heart Institute"
        );
        assert_eq!(record.date, "2020");
        assert_eq!(
            record.r#abstract,
            "Background: Aspirin is widely used. It reduces risk."
        );
        assert_eq!(record.keywords, "aspirin; cardiology.");
        assert_eq!(record.missing_fields(), 0);
    }

    #[test]
    fn test_empty_page_yields_all_sentinels() {
        let record = parse_article_page("https://pubmed.ncbi.nlm.nih.gov/2", "");
        assert_eq!(record.url, "https://pubmed.ncbi.nlm.nih.gov/2");
        assert_eq!(record.title, NO_TITLE);
        assert_eq!(record.authors, NO_AUTHOR);
        assert_eq!(record.r#abstract, NO_ABSTRACT);
        assert_eq!(record.affiliations, NO_AFFILIATIONS);
        assert_eq!(record.journal, NO_JOURNAL);
        assert_eq!(record.keywords, NO_KEYWORDS);
        assert_eq!(record.date, NO_DATE);
        assert_eq!(record.missing_fields(), 7);
    }

    #[test]
    fn test_fields_fail_independently() {
        let html = r#"
            <meta name="citation_journal_title" content="BMJ">
            <div class="authors-list"></div>
            <div class="abstract-content selected"></div>
            <time class="citation-year">2019</time>
        "#;
        let record = parse_article_page("u", html);
        assert_eq!(record.journal, "BMJ");
        assert_eq!(record.date, "2019");
        assert_eq!(record.title, NO_TITLE);
        // Present but empty blocks count as missing.
        assert_eq!(record.authors, NO_AUTHOR);
        assert_eq!(record.r#abstract, NO_ABSTRACT);
        assert_eq!(record.keywords, NO_KEYWORDS);
    }

    #[test]
    fn test_malformed_html_does_not_panic() {
        let record = parse_article_page("u", "<div class=\"abstract\"><p>Keywords: x");
        assert_eq!(record.keywords, "x");
        assert_eq!(record.title, NO_TITLE);
    }

    #[test]
    fn test_parse_search_page_preserves_order() {
        let html = r#"<head><meta name="log_displayeduids" content="33,11, 22,"></head>"#;
        let ids = parse_search_page(html).unwrap();
        assert_eq!(
            ids,
            vec![ArticleId::from("33"), ArticleId::from("11"), ArticleId::from("22")]
        );
    }

    #[test]
    fn test_parse_search_page_missing_meta() {
        let err = parse_search_page("<html><body>No results</body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::MissingElement(DISPLAYED_IDS)));
    }

    #[test]
    fn test_parse_page_count_with_separator() {
        let html = r#"<span class="total-pages">1,234</span>"#;
        assert_eq!(parse_page_count(html).unwrap(), 1234);
    }

    #[test]
    fn test_parse_page_count_errors() {
        assert!(matches!(
            parse_page_count("<p>nothing</p>").unwrap_err(),
            ScrapeError::MissingElement(TOTAL_PAGES)
        ));
        assert!(matches!(
            parse_page_count(r#"<span class="total-pages">many</span>"#).unwrap_err(),
            ScrapeError::InvalidPageCount(_)
        ));
    }
}
