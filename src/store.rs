// src/store.rs
//! Durable word-count corpus.
//!
//! On disk the corpus is one pretty-printed JSON object:
//!
//! ```json
//! {
//!   "pages": ["Pikachu", "Team Rocket"],
//!   "counts": { "electric": 12, "the": 40 }
//! }
//! ```
//!
//! Keys are kept sorted so `save(load())` reproduces the file byte for byte.
//! A bare `{ "word": count }` map (the older format, without page tracking)
//! is still accepted on load.
//!
//! The corpus is only ever mutated through [`CorpusStore::merge`], which skips
//! pages already recorded, so re-counting a page never inflates totals.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::file::ensure_directory;
use crate::tokenize::{WordCounts, count_tokens};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Corpus {
    pages: BTreeSet<String>,
    counts: WordCounts,
}

impl Corpus {
    pub fn counts(&self) -> &WordCounts { &self.counts }

    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Sum of all token occurrences.
    pub fn total(&self) -> u64 { self.counts.values().sum() }

    pub fn distinct_words(&self) -> usize { self.counts.len() }

    pub fn pages(&self) -> &BTreeSet<String> { &self.pages }

    pub fn is_counted(&self, page: &str) -> bool { self.pages.contains(page) }

    pub fn is_empty(&self) -> bool { self.counts.is_empty() && self.pages.is_empty() }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OnDisk {
    Current(Corpus),
    Legacy(BTreeMap<String, u64>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    Counted { tokens: u64, unique: usize },
    AlreadyCounted,
}

/// Handle on the persisted corpus file. Single writer per file.
#[derive(Clone, Debug)]
pub struct CorpusStore {
    path: PathBuf,
}

impl CorpusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Missing file is the initial state and yields an empty corpus.
    pub fn load(&self) -> Result<Corpus> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no corpus at {}, starting empty", self.path.display());
                return Ok(Corpus::default());
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let on_disk: OnDisk = serde_json::from_str(&text).map_err(|source| Error::CorruptState {
            path: self.path.clone(),
            source,
        })?;

        Ok(match on_disk {
            OnDisk::Current(corpus) => corpus,
            OnDisk::Legacy(counts) => {
                info!("{} has no page list; pages counted before will be counted again", self.path.display());
                Corpus { pages: BTreeSet::new(), counts }
            }
        })
    }

    /// Add `tokens` to the corpus under `page`, unless `page` is already counted.
    pub fn merge<I>(&self, corpus: &mut Corpus, page: &str, tokens: I) -> MergeOutcome
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        if corpus.pages.contains(page) {
            return MergeOutcome::AlreadyCounted;
        }

        let page_counts = count_tokens(tokens);
        let unique = page_counts.len();
        let mut total = 0u64;
        for (word, n) in page_counts {
            total += n;
            *corpus.counts.entry(word).or_insert(0) += n;
        }
        corpus.pages.insert(s!(page));

        MergeOutcome::Counted { tokens: total, unique }
    }

    /// Write to a temp file beside the target, then rename over it.
    /// On any failure the previous file is left untouched.
    pub fn save(&self, corpus: &Corpus) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        ensure_directory(&dir)?;

        let tmp = NamedTempFile::new_in(&dir).map_err(|e| Error::io(&dir, e))?;
        {
            let mut w = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut w, corpus)
                .map_err(|e| Error::io(tmp.path(), e.into()))?;
            w.write_all(b"\n").map_err(|e| Error::io(tmp.path(), e))?;
            w.flush().map_err(|e| Error::io(tmp.path(), e))?;
        }
        tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(&self.path).map_err(|e| Error::io(&self.path, e.error))?;

        debug!(
            "saved {} words / {} pages to {}",
            corpus.distinct_words(),
            corpus.pages.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Explicit reset: drop the persisted corpus. Absent file is fine.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }
}
