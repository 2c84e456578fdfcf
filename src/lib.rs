// src/lib.rs
//! Scraper and word-frequency crawler for MediaWiki sites.
//!
//! ```text
//! crawl::Crawler ─► page::PageSource ─► tokenize ─► store::CorpusStore ─► analyze::compare
//!                    (fetch + parse)     (words)     (merge + persist)     (vs. baseline)
//! ```

#[macro_use]
pub mod macros;

pub mod analyze;
pub mod baseline;
pub mod config;
pub mod core;
pub mod crawl;
pub mod csv;
pub mod error;
pub mod file;
pub mod log;
pub mod page;
pub mod progress;
pub mod store;
pub mod table;
pub mod tokenize;

#[cfg(feature = "cli")]
pub mod cli;

pub use analyze::{Mode, RankedFrequencyList, RankedWord, Ratio, compare};
pub use baseline::{FrequencyBaseline, FrequencyTable};
pub use config::options::{AnalyzeOptions, CrawlOptions, TableOptions};
pub use crawl::{CrawlReport, Crawler, PageFailure};
pub use error::{Error, Result};
pub use page::{LocalFile, Page, PageSource, WikiClient};
pub use store::{Corpus, CorpusStore, MergeOutcome};
pub use tokenize::{WordCounts, count_tokens, tokenize};
