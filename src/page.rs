// src/page.rs
//! Page fetching. A [`PageSource`] turns a free-text title into a parsed [`Page`]
//! whose title is already canonical, so callers can key dedup and storage on it.

use std::{fs, io::ErrorKind, path::PathBuf};

use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use crate::config::consts::WIKI_PREFIX;
use crate::core::html::Document;
use crate::core::net;
use crate::core::sanitize::{canonical_title, title_from_href, title_to_slug};
use crate::error::{Error, Result};

/// One fetched article. Transient: never persisted itself.
#[derive(Debug)]
pub struct Page {
    title: String,
    doc: Document,
}

impl Page {
    /// `title` is canonicalized here.
    pub fn from_html(title: &str, html: &str) -> Self {
        Self { title: canonical_title(title), doc: Document::parse(html) }
    }

    pub fn title(&self) -> &str { &self.title }

    pub fn text(&self) -> String { self.doc.article_text() }

    pub fn links(&self) -> Vec<String> { self.doc.internal_links() }

    pub fn summary(&self) -> Option<String> { self.doc.summary() }

    pub fn has_content(&self) -> bool { self.doc.content_root().is_some() }

    pub fn document(&self) -> &Document { &self.doc }
}

pub trait PageSource {
    /// Fails with `NotFound` or `Network`. One request per call.
    fn fetch(&self, title: &str) -> Result<Page>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn fetch(&self, title: &str) -> Result<Page> {
        (**self).fetch(title)
    }
}

/// Live wiki over HTTP(S).
pub struct WikiClient {
    client: Client,
    base: Url,
}

impl WikiClient {
    pub fn with_base(base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| Error::invalid(format!("bad base URL '{base}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::invalid(format!("'{base}' cannot be used as a base URL")));
        }
        Ok(Self { client: net::build_client()?, base })
    }

    /// `Team Rocket` -> `{base}/wiki/Team_Rocket`
    pub fn page_url(&self, title: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segs) = url.path_segments_mut() {
            segs.pop_if_empty();
            segs.push(WIKI_PREFIX.trim_matches('/'));
            for part in title_to_slug(title).split('/') {
                segs.push(part);
            }
        }
        url
    }

    /// Canonical title of the URL the server finally answered from.
    fn resolved_title(&self, url: &Url) -> Option<String> {
        if url.host_str() != self.base.host_str() {
            return None;
        }
        title_from_href(url.path())
    }
}

impl PageSource for WikiClient {
    fn fetch(&self, title: &str) -> Result<Page> {
        let requested = canonical_title(title);
        if requested.is_empty() {
            // no article can have this title; a crawl treats it like any missing page
            return Err(Error::NotFound { title: s!(title) });
        }
        let fetched = net::http_get(&self.client, self.page_url(&requested), &requested)?;
        let resolved = self.resolved_title(&fetched.url).unwrap_or_else(|| requested.clone());
        if resolved != requested {
            debug!("'{requested}' redirected to '{resolved}'");
        }
        Ok(Page::from_html(&resolved, &fetched.body))
    }
}

/// Offline mode: serve one saved HTML file for whatever title is asked.
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for LocalFile {
    fn fetch(&self, title: &str) -> Result<Page> {
        match fs::read_to_string(&self.path) {
            Ok(html) => Ok(Page::from_html(title, &html)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound {
                title: format!("{} ({})", canonical_title(title), self.path.display()),
            }),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }
}
