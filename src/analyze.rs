// src/analyze.rs
//! Corpus vs. general-language frequency comparison.
//!
//! Both sides are compared as relative frequencies: a word's corpus count over
//! the corpus total, against the baseline's relative frequency. Their quotient
//! is the word's [`Ratio`]: above 1 means the word is over-represented in the
//! crawled articles.

use std::cmp::Ordering;
use std::fmt;

use crate::baseline::FrequencyBaseline;
use crate::error::{Error, Result};
use crate::store::Corpus;

/// Which side chooses the top words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Mode {
    /// Most frequent words of the corpus.
    Article,
    /// Corpus words that are most frequent in general language.
    #[default]
    Language,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Mode::Article => "article", Mode::Language => "language" })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ratio {
    Defined(f64),
    /// Baseline frequency absent or zero.
    Undefined,
}

impl Ratio {
    fn of(corpus_freq: f64, baseline_freq: Option<f64>) -> Self {
        match baseline_freq {
            Some(b) if b > 0.0 => Ratio::Defined(corpus_freq / b),
            _ => Ratio::Undefined,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self { Ratio::Defined(v) => Some(v), Ratio::Undefined => None }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Defined(v) => write!(f, "{v:.2}"),
            Ratio::Undefined => f.write_str("n/a"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankedWord {
    pub word: String,
    pub corpus_count: u64,
    /// `corpus_count / corpus.total()`
    pub corpus_frequency: f64,
    pub baseline_frequency: Option<f64>,
    pub ratio: Ratio,
}

pub type RankedFrequencyList = Vec<RankedWord>;

/// Top `count` words of `corpus` under `mode`. A `count` larger than the
/// available vocabulary returns everything available.
pub fn compare<B: FrequencyBaseline + ?Sized>(
    corpus: &Corpus,
    baseline: &B,
    mode: Mode,
    count: usize,
) -> Result<RankedFrequencyList> {
    if count == 0 {
        return Err(Error::invalid("count must be a positive integer"));
    }

    let total = corpus.total();
    let mut rows: Vec<RankedWord> = corpus
        .counts()
        .iter()
        .map(|(word, &n)| {
            let corpus_frequency = if total == 0 { 0.0 } else { n as f64 / total as f64 };
            let baseline_frequency = baseline.lookup(word);
            RankedWord {
                word: word.clone(),
                corpus_count: n,
                corpus_frequency,
                baseline_frequency,
                ratio: Ratio::of(corpus_frequency, baseline_frequency),
            }
        })
        .collect();

    match mode {
        Mode::Article => rows.sort_by(by_corpus),
        Mode::Language => {
            rows.retain(|r| r.baseline_frequency.is_some());
            rows.sort_by(|a, b| {
                let fa = a.baseline_frequency.unwrap_or(0.0);
                let fb = b.baseline_frequency.unwrap_or(0.0);
                fb.total_cmp(&fa).then_with(|| by_corpus(a, b))
            });
        }
    }

    rows.truncate(count);
    Ok(rows)
}

fn by_corpus(a: &RankedWord, b: &RankedWord) -> Ordering {
    b.corpus_count.cmp(&a.corpus_count).then_with(|| a.word.cmp(&b.word))
}
