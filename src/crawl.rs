// src/crawl.rs
//! Recursive word counting over the wiki link graph.
//!
//! Traversal is breadth-first over an explicit `(title, depth)` worklist. The
//! start page is depth 0; a page's links are queued only while
//! `depth < max_depth`. A title is queued at most once and fetched at most once
//! per crawl. There is no page cap: the crawl ends when the worklist is empty,
//! so a large `max_depth` on a dense wiki can run for a very long time.
//!
//! Fetches are strictly sequential, with `wait_seconds` of sleep between two
//! consecutive requests.

use std::{collections::{HashSet, VecDeque}, thread, time::Duration};

use tracing::{info, warn};

use crate::config::options::CrawlOptions;
use crate::core::sanitize::canonical_title;
use crate::error::{Error, Result};
use crate::page::PageSource;
use crate::progress::{NullProgress, Progress};
use crate::store::{Corpus, CorpusStore, MergeOutcome};
use crate::tokenize::tokenize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageFailure {
    pub title: String,
    pub reason: String,
}

#[derive(Clone, Debug)]
pub struct CrawlReport {
    /// Corpus as saved at the end of the crawl.
    pub corpus: Corpus,
    /// Canonical titles fetched, in visit order.
    pub fetched: Vec<String>,
    /// Pages whose words were newly added (already-counted pages excluded).
    pub counted: usize,
    pub failures: Vec<PageFailure>,
}

/// Titles already queued and titles already fetched.
#[derive(Default)]
struct VisitedSet {
    queued: HashSet<String>,
    fetched: HashSet<String>,
}

impl VisitedSet {
    /// True if `title` was not queued before.
    fn queue(&mut self, title: &str) -> bool {
        self.queued.insert(s!(title))
    }

    fn was_fetched(&self, title: &str) -> bool { self.fetched.contains(title) }

    /// True if `title` was not fetched before.
    fn mark_fetched(&mut self, title: &str) -> bool {
        self.queued.insert(s!(title));
        self.fetched.insert(s!(title))
    }
}

pub struct Crawler<'a, S: PageSource + ?Sized> {
    source: &'a S,
    store: &'a CorpusStore,
}

impl<'a, S: PageSource + ?Sized> Crawler<'a, S> {
    pub fn new(source: &'a S, store: &'a CorpusStore) -> Self {
        Self { source, store }
    }

    /// Crawl from `start`, merging every fetched page into the persisted corpus.
    ///
    /// Argument errors are raised before any request. `NotFound`/`Network` on a
    /// page drop that page and everything only reachable through it; any other
    /// error (store I/O, corrupt corpus) aborts the crawl. Once started, the
    /// progress sink gets `finish` on every exit.
    pub fn crawl(
        &self,
        start: &str,
        opts: &CrawlOptions,
        progress: Option<&mut dyn Progress>,
    ) -> Result<CrawlReport> {
        opts.validate()?;
        let wait = opts.wait()?;
        let start = canonical_title(start);
        if start.is_empty() {
            return Err(Error::invalid("start page title is empty"));
        }

        let mut quiet = NullProgress;
        let progress: &mut dyn Progress = match progress {
            Some(p) => p,
            None => &mut quiet,
        };

        progress.begin(None);
        let outcome = self.walk(start, opts, wait, progress);
        progress.finish();
        outcome
    }

    fn walk(
        &self,
        start: String,
        opts: &CrawlOptions,
        wait: Duration,
        progress: &mut dyn Progress,
    ) -> Result<CrawlReport> {
        let mut corpus = self.store.load()?;
        let mut visited = VisitedSet::default();
        let mut frontier: VecDeque<(String, u32)> = VecDeque::new();
        visited.queue(&start);
        frontier.push_back((start, 0));

        let mut report = CrawlReport {
            corpus: Corpus::default(),
            fetched: Vec::new(),
            counted: 0,
            failures: Vec::new(),
        };
        let mut since_checkpoint = 0usize;
        let mut requested_any = false;

        while let Some((title, depth)) = frontier.pop_front() {
            if visited.was_fetched(&title) {
                continue;
            }

            if requested_any && !wait.is_zero() {
                thread::sleep(wait);
            }
            requested_any = true;

            progress.log(&format!("Processing '{title}' (depth {depth})"));

            let page = match self.source.fetch(&title) {
                Ok(page) => page,
                Err(e) if e.is_page_failure() => {
                    warn!("skipping '{title}': {e}");
                    visited.mark_fetched(&title);
                    progress.item_failed(&title, &e.to_string());
                    report.failures.push(PageFailure { title, reason: e.to_string() });
                    continue;
                }
                Err(e) => {
                    warn!("crawl stopped at '{title}': {e}");
                    // keep what was already counted; the stop reason wins over a save error
                    if let Err(save_err) = self.store.save(&corpus) {
                        warn!("could not save corpus after stop: {save_err}");
                    }
                    return Err(e);
                }
            };

            visited.mark_fetched(&title);
            let canonical = s!(page.title());
            if canonical != title && !visited.mark_fetched(&canonical) {
                // redirect to a page this crawl already handled
                continue;
            }
            report.fetched.push(canonical.clone());

            let text = page.text();
            match self.store.merge(&mut corpus, &canonical, tokenize(&text)) {
                MergeOutcome::Counted { tokens, unique } => {
                    info!("counted '{canonical}': {tokens} words, {unique} unique");
                    report.counted += 1;
                    since_checkpoint += 1;
                }
                MergeOutcome::AlreadyCounted => {
                    info!("'{canonical}' already in corpus, not re-counted");
                }
            }

            if depth < opts.max_depth {
                let links = page.links();
                let mut added = 0usize;
                for link in links.iter() {
                    if !visited.was_fetched(link) && visited.queue(link) {
                        frontier.push_back((link.clone(), depth + 1));
                        added += 1;
                    }
                }
                progress.log(&format!("Found {} links, queued {added} new", links.len()));
            }

            progress.item_done(&canonical, depth);

            if opts.checkpoint_every > 0 && since_checkpoint >= opts.checkpoint_every {
                self.store.save(&corpus)?;
                since_checkpoint = 0;
            }
        }

        self.store.save(&corpus)?;
        report.corpus = corpus;
        Ok(report)
    }
}
