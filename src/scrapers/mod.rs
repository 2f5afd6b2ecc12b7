//! Page parsers for crawled sites.
//!
//! Parsers are pure functions over HTML text; fetching lives in
//! [`crate::client`] and scheduling in [`crate::crawler`].
//!
//! | Source | Module | Pages |
//! |--------|--------|-------|
//! | PubMed | [`pubmed`] | search listing, pagination, article detail |

pub mod pubmed;
