//! CSV export of crawled articles.
//!
//! The table has a leading unnamed index column followed by
//! [`CSV_COLUMNS`], one row per article in the order the records were
//! collected. Any existing file at the target path is replaced.

use crate::error::Result;
use crate::models::{ArticleRecord, CSV_COLUMNS};
use crate::utils::{ensure_parent_dir, truncate_for_log};
use std::path::Path;
use tracing::{info, instrument};

/// Write `records` as CSV to `writer`, header row first.
pub fn write_records<W: std::io::Write>(writer: W, records: &[ArticleRecord]) -> Result<()> {
    let mut wtr = ::csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(std::iter::once("").chain(CSV_COLUMNS))?;
    for (index, record) in records.iter().enumerate() {
        let index = index.to_string();
        wtr.write_record(std::iter::once(index.as_str()).chain(record.csv_fields()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` to the CSV file at `path`, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = records.len()))]
pub async fn write_articles(path: &Path, records: &[ArticleRecord]) -> Result<()> {
    ensure_parent_dir(path).await?;

    let mut buf = Vec::new();
    write_records(&mut buf, records)?;
    tokio::fs::write(path, buf).await?;

    info!("Wrote article CSV");
    Ok(())
}

/// Log the first `n` records so a run can be sanity-checked at a glance.
pub fn preview(records: &[ArticleRecord], n: usize) {
    for (index, record) in records.iter().take(n).enumerate() {
        info!(
            index,
            title = %truncate_for_log(&record.title, 80),
            journal = %record.journal,
            date = %record.date,
            url = %record.url,
            "Preview"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_KEYWORDS;

    fn record(id: u32, title: &str) -> ArticleRecord {
        ArticleRecord {
            url: format!("https://pubmed.ncbi.nlm.nih.gov/{id}"),
            title: title.to_string(),
            authors: "Jane Doe, John Roe".into(),
            r#abstract: "Line one. Line two.".into(),
            affiliations: "Example University".into(),
            journal: "BMJ".into(),
            keywords: NO_KEYWORDS.into(),
            date: "2020".into(),
        }
    }

    #[test]
    fn test_header_and_rows() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[record(1, "First"), record(2, "Second")]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            ",title,abstract,affiliations,authors,journal,date,keywords,url"
        );
        assert!(lines[1].starts_with("0,First,"));
        assert!(lines[2].starts_with("1,Second,"));
        assert!(lines[2].ends_with("https://pubmed.ncbi.nlm.nih.gov/2"));
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[record(1, "Aspirin, revisited")]).unwrap();

        let mut rdr = ::csv::Reader::from_reader(buf.as_slice());
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(row.len(), 9);
        assert_eq!(&row[1], "Aspirin, revisited");
        assert_eq!(&row[4], "Jane Doe, John Roe");
        assert_eq!(&row[7], NO_KEYWORDS);
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }

    #[tokio::test]
    async fn test_write_articles_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("articles.csv");

        write_articles(&path, &[record(1, "a"), record(2, "b"), record(3, "c")])
            .await
            .unwrap();
        write_articles(&path, &[record(4, "d")]).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("/4"));
    }
}
