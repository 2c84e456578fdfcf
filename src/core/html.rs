// src/core/html.rs
//! Read-only views over a parsed MediaWiki article.
//!
//! Everything is scoped to the article content root (`div.mw-parser-output`,
//! falling back to `#mw-content-text`), so site chrome such as navigation,
//! sidebars and footers never reaches the tokenizer or the link frontier.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::sanitize::{normalize_ws, title_from_href};
use crate::config::consts::{CONTENT_CLASS, CONTENT_ID};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static BY_CLASS: LazyLock<Selector> = LazyLock::new(|| selector(&format!("div.{CONTENT_CLASS}")));
static BY_ID: LazyLock<Selector> = LazyLock::new(|| selector(&format!("div#{CONTENT_ID}")));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));

const SKIP_TEXT_IN: &[&str] = &["script", "style", "noscript"];

#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self { html: Html::parse_document(source) }
    }

    pub fn content_root(&self) -> Option<ElementRef<'_>> {
        self.html
            .select(&BY_CLASS)
            .next()
            .or_else(|| self.html.select(&BY_ID).next())
    }

    /// First paragraph of the article that has any text.
    pub fn summary(&self) -> Option<String> {
        let root = self.content_root()?;
        root.select(&PARAGRAPH)
            .map(|p| normalize_ws(&p.text().collect::<String>()))
            .find(|text| !text.is_empty())
    }

    /// All visible article text, text nodes trimmed and joined by single spaces.
    pub fn article_text(&self) -> String {
        match self.content_root() {
            Some(root) => element_text(root),
            None => s!(),
        }
    }

    /// Internal article links in document order, as canonical titles.
    /// Duplicates are kept; the crawler dedups against its visited set.
    pub fn internal_links(&self) -> Vec<String> {
        let Some(root) = self.content_root() else { return Vec::new() };
        root.select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(title_from_href)
            .collect()
    }

    /// Every `<table>` in the content root, nested ones included, in document order.
    pub fn tables(&self) -> Vec<ElementRef<'_>> {
        match self.content_root() {
            Some(root) => root.select(&TABLE).collect(),
            None => Vec::new(),
        }
    }
}

/// Text of an element with script/style bodies removed.
pub fn element_text(el: ElementRef<'_>) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    for node in el.descendants() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| SKIP_TEXT_IN.contains(&e.name()))
        });
        if hidden { continue; }
        let t = text.trim();
        if !t.is_empty() { pieces.push(t); }
    }
    pieces.join(" ")
}
