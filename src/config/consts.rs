// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://bulbapedia.bulbagarden.net";
pub const WIKI_PREFIX: &str = "/wiki/";
pub const USER_AGENT: &str = "wiki_scrape/0.2";
pub const HTTP_TIMEOUT_SECS: u64 = 15;

// Page layout (MediaWiki)
pub const CONTENT_CLASS: &str = "mw-parser-output";
pub const CONTENT_ID: &str = "mw-content-text";

// Local state
pub const WORD_COUNTS_FILE: &str = "word-counts.json";
pub const BASELINE_FILE: &str = "word-frequencies.csv";
pub const LOG_FILE: &str = ".store/debug.log";

// Crawl
pub const DEFAULT_DEPTH: u32 = 1;
pub const DEFAULT_WAIT_SECS: f64 = 1.0; // be polite
pub const DEFAULT_CHECKPOINT: usize = 10;

// Analysis
pub const DEFAULT_COUNT: usize = 10;

// Tables
pub const DEFAULT_TABLE_NUMBER: usize = 1;
