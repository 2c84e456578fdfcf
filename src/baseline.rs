// src/baseline.rs
//! General-language word frequencies. Not owned by this crate: anything that can
//! answer "how common is this word?" plugs in through [`FrequencyBaseline`].

use std::{collections::HashMap, fs, path::Path};

use tracing::debug;

use crate::csv::{Delim, parse_rows};
use crate::error::{Error, Result};

pub trait FrequencyBaseline {
    /// Relative frequency of `word` in general usage, `None` when unknown.
    fn lookup(&self, word: &str) -> Option<f64>;
}

impl FrequencyBaseline for HashMap<String, f64> {
    fn lookup(&self, word: &str) -> Option<f64> {
        self.get(word).copied()
    }
}

/// In-memory word -> relative frequency table.
#[derive(Clone, Debug, Default)]
pub struct FrequencyTable {
    freqs: HashMap<String, f64>,
}

impl FrequencyTable {
    /// Values are taken as relative frequencies as given.
    pub fn from_frequencies<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let freqs = pairs
            .into_iter()
            .map(|(w, f)| (w.as_ref().to_lowercase(), f))
            .collect();
        Self { freqs }
    }

    /// Raw occurrence counts, divided by their total.
    pub fn from_counts<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let pairs: Vec<(S, u64)> = pairs.into_iter().collect();
        let total: u64 = pairs.iter().map(|(_, n)| *n).sum();
        if total == 0 {
            return Self::from_frequencies(pairs.into_iter().map(|(w, _)| (w, 0.0)));
        }
        Self::from_frequencies(pairs.into_iter().map(|(w, n)| (w, n as f64 / total as f64)))
    }

    /// Load `word,value` rows (TSV when the file ends in `.tsv`).
    ///
    /// A first row whose value column is not a number is taken as a header.
    /// If the values add up to more than 1 they are raw counts and get
    /// normalized by their sum.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let rows = parse_rows(&text, Delim::for_path(path).sep());

        let bad = |line: usize, reason: String| Error::InvalidBaseline {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let mut pairs: Vec<(String, f64)> = Vec::with_capacity(rows.len());
        for (i, (line, row)) in rows.iter().enumerate() {
            let line = *line;
            let (Some(word), Some(value)) = (row.first(), row.get(1)) else {
                return Err(bad(line, s!("expected two columns: word, frequency")));
            };
            let value = match value.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) if i == 0 => continue, // header
                Err(e) => return Err(bad(line, format!("'{value}': {e}"))),
            };
            if !value.is_finite() || value < 0.0 {
                return Err(bad(line, format!("frequency must be a non-negative number, got {value}")));
            }
            pairs.push((s!(word.trim()), value));
        }

        let sum: f64 = pairs.iter().map(|(_, v)| v).sum();
        let table = if sum > 1.0 + 1e-9 {
            Self::from_frequencies(pairs.into_iter().map(|(w, v)| (w, v / sum)))
        } else {
            Self::from_frequencies(pairs)
        };
        debug!("loaded {} baseline words from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn len(&self) -> usize { self.freqs.len() }

    pub fn is_empty(&self) -> bool { self.freqs.is_empty() }
}

impl FrequencyBaseline for FrequencyTable {
    fn lookup(&self, word: &str) -> Option<f64> {
        self.freqs.get(word).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_normalized_by_total() {
        let t = FrequencyTable::from_counts([("the", 3u64), ("cat", 1)]);
        assert_eq!(t.lookup("the"), Some(0.75));
        assert_eq!(t.lookup("cat"), Some(0.25));
        assert_eq!(t.lookup("dog"), None);
    }

    #[test]
    fn words_are_case_folded() {
        let t = FrequencyTable::from_frequencies([("The", 0.05)]);
        assert_eq!(t.lookup("the"), Some(0.05));
    }
}
