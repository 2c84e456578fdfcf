// src/config/options.rs
use std::time::Duration;

use super::consts::*;
use crate::analyze::Mode;
use crate::error::{Error, Result};

/// Knobs that bound one crawl.
#[derive(Clone, Debug, PartialEq)]
pub struct CrawlOptions {
    /// Links are followed while `depth < max_depth`; the start page is depth 0.
    pub max_depth: u32,
    /// Pause between consecutive fetches.
    pub wait_seconds: f64,
    /// Save the corpus after this many newly counted pages. 0 = only at the end.
    pub checkpoint_every: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            wait_seconds: DEFAULT_WAIT_SECS,
            checkpoint_every: DEFAULT_CHECKPOINT,
        }
    }
}

impl CrawlOptions {
    pub fn new(max_depth: u32, wait_seconds: f64) -> Self {
        Self { max_depth, wait_seconds, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::invalid("depth must be a positive integer"));
        }
        if !self.wait_seconds.is_finite() || self.wait_seconds < 0.0 {
            return Err(Error::invalid(format!(
                "wait must be a non-negative number of seconds, got {}",
                self.wait_seconds
            )));
        }
        self.wait().map(|_| ())
    }

    /// Pause as a `Duration`; fails for values `Duration` cannot hold.
    pub fn wait(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.wait_seconds)
            .map_err(|e| Error::invalid(format!("wait of {} seconds: {e}", self.wait_seconds)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyzeOptions {
    pub mode: Mode,
    pub count: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self { mode: Mode::Language, count: DEFAULT_COUNT }
    }
}

impl AnalyzeOptions {
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::invalid("count must be a positive integer"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableOptions {
    /// 1-based index of the table within the article content.
    pub number: usize,
    pub first_row_is_header: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self { number: DEFAULT_TABLE_NUMBER, first_row_is_header: false }
    }
}

impl TableOptions {
    pub fn validate(&self) -> Result<()> {
        if self.number == 0 {
            return Err(Error::invalid("table number starts at 1"));
        }
        Ok(())
    }
}
