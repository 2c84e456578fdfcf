// src/tokenize.rs
//! Word tokenizer: lowercase runs of Unicode word characters (`\w+`).
//! Punctuation and whitespace separate tokens and are dropped. Digits and `_`
//! are word characters, so `"Gen_IV 2006"` yields `gen_iv`, `2006`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("static word pattern"));

/// Word -> occurrences.
pub type WordCounts = BTreeMap<String, u64>;

/// Lazy token stream over borrowed text. Cloning restarts from the clone point.
#[derive(Clone, Debug)]
pub struct Tokens<'t> {
    text: &'t str,
    pos: usize,
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let m = WORD.find_at(self.text, self.pos)?;
        self.pos = m.end();
        Some(m.as_str().to_lowercase())
    }
}

pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { text, pos: 0 }
}

pub fn count_tokens<I>(tokens: I) -> WordCounts
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut counts = WordCounts::new();
    for t in tokens {
        *counts.entry(t.into()).or_insert(0) += 1;
    }
    counts
}
