//! Output generation for crawl results.
//!
//! # Submodules
//!
//! - [`csv`]: Writes the collected [`ArticleRecord`](crate::models::ArticleRecord)s
//!   to a CSV file and logs a short preview of the table
//!
//! # Output Structure
//!
//! ```text
//! ,title,abstract,affiliations,authors,journal,date,keywords,url
//! 0,Aspirin and the heart.,...,https://pubmed.ncbi.nlm.nih.gov/32887691
//! ```

pub mod csv;
