// src/progress.rs
/// Lightweight progress reporting used by long-running operations (crawl).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items, if known.
    fn begin(&mut self, _total: Option<usize>) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one page has been fetched and merged.
    fn item_done(&mut self, _title: &str, _depth: u32) {}

    /// Called when one page failed; the crawl goes on without it.
    fn item_failed(&mut self, _title: &str, _reason: &str) {}

    /// Called once after `begin`, whether the run succeeded or failed.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
