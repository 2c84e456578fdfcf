// tests/crawl.rs
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use wiki_scrape::core::sanitize::canonical_title;
use wiki_scrape::progress::{NullProgress, Progress};
use wiki_scrape::{CorpusStore, CrawlOptions, Crawler, Error, Page, PageSource, Result};

/// In-memory wiki: title -> (html, resolved title).
#[derive(Default)]
struct FakeWiki {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    offline: Vec<String>,
    broken: Vec<String>,
    hits: RefCell<Vec<String>>,
}

impl FakeWiki {
    fn page(mut self, title: &str, links: &[&str], words: &str) -> Self {
        let anchors: String = links
            .iter()
            .map(|l| format!(r#"<a href="/wiki/{}">{l}</a> "#, l.replace(' ', "_")))
            .collect();
        let html = format!(
            r#"<html><body><div id="mw-navigation"><a href="/wiki/Sidebar">nav</a></div>
            <div class="mw-parser-output"><p>{words}</p><p>{anchors}</p></div></body></html>"#
        );
        self.pages.insert(s(title), html);
        self
    }

    fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(s(from), s(to));
        self
    }

    fn offline(mut self, title: &str) -> Self {
        self.offline.push(s(title));
        self
    }

    fn broken(mut self, title: &str) -> Self {
        self.broken.push(s(title));
        self
    }

    fn hits(&self) -> Vec<String> {
        self.hits.borrow().clone()
    }
}

fn s(v: &str) -> String {
    v.to_string()
}

impl PageSource for FakeWiki {
    fn fetch(&self, title: &str) -> Result<Page> {
        let title = canonical_title(title);
        self.hits.borrow_mut().push(title.clone());
        if self.offline.contains(&title) {
            return Err(Error::Network { title, reason: s("connection refused") });
        }
        if self.broken.contains(&title) {
            return Err(Error::Extract(s("boom")));
        }
        let resolved = self.redirects.get(&title).cloned().unwrap_or(title);
        match self.pages.get(&resolved) {
            Some(html) => Ok(Page::from_html(&resolved, html)),
            None => Err(Error::NotFound { title: resolved }),
        }
    }
}

fn store() -> (tempfile::TempDir, CorpusStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = CorpusStore::new(dir.path().join("word-counts.json"));
    (dir, store)
}

fn opts(max_depth: u32) -> CrawlOptions {
    CrawlOptions { max_depth, wait_seconds: 0.0, checkpoint_every: 0 }
}

#[test]
fn depth_one_visits_start_and_its_direct_links_only() {
    let wiki = FakeWiki::default()
        .page("A", &["B", "C"], "alpha")
        .page("B", &["D"], "bravo")
        .page("C", &[], "charlie")
        .page("D", &[], "delta");
    let (_dir, store) = store();

    let mut quiet = NullProgress;
    let report = Crawler::new(&wiki, &store)
        .crawl("A", &opts(1), Some(&mut quiet as &mut dyn Progress))
        .unwrap();

    assert_eq!(report.fetched, ["A", "B", "C"]);
    assert_eq!(wiki.hits(), ["A", "B", "C"]);
    assert_eq!(report.corpus.count("delta"), 0);
    assert_eq!(report.corpus.count("bravo"), 1);
    assert_eq!(report.counted, 3);
}

#[test]
fn navigation_links_outside_content_are_not_followed() {
    let wiki = FakeWiki::default().page("A", &[], "alpha").page("Sidebar", &[], "nav");
    let (_dir, store) = store();
    let report = Crawler::new(&wiki, &store).crawl("A", &opts(3), None).unwrap();
    assert_eq!(report.fetched, ["A"]);
    assert_eq!(report.corpus.count("nav"), 0);
}

#[test]
fn page_reachable_twice_is_fetched_and_counted_once() {
    let wiki = FakeWiki::default()
        .page("A", &["B", "C"], "start")
        .page("B", &["C", "A"], "left")
        .page("C", &["B"], "shared");
    let (_dir, store) = store();

    let report = Crawler::new(&wiki, &store).crawl("A", &opts(3), None).unwrap();

    assert_eq!(wiki.hits().len(), 3);
    assert_eq!(report.corpus.count("shared"), 1);
    assert_eq!(report.corpus.pages().len(), 3);
}

#[test]
fn failing_branch_is_skipped_and_reported() {
    let wiki = FakeWiki::default()
        .page("A", &["Missing", "Down", "B"], "start")
        .page("B", &[], "bravo")
        .offline("Down");
    let (_dir, store) = store();

    let report = Crawler::new(&wiki, &store).crawl("A", &opts(2), None).unwrap();

    assert_eq!(report.fetched, ["A", "B"]);
    let failed: Vec<&str> = report.failures.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(failed, ["Missing", "Down"]);
    assert_eq!(report.corpus.count("bravo"), 1);
    assert_eq!(store.load().unwrap(), report.corpus);
}

#[test]
fn missing_start_page_is_a_reported_failure() {
    let wiki = FakeWiki::default();
    let (_dir, store) = store();
    let report = Crawler::new(&wiki, &store).crawl("Nowhere", &opts(1), None).unwrap();
    assert!(report.fetched.is_empty());
    assert_eq!(report.failures.len(), 1);
}

#[test]
fn invalid_options_fail_before_any_fetch() {
    let wiki = FakeWiki::default().page("A", &[], "alpha");
    let (_dir, store) = store();
    let crawler = Crawler::new(&wiki, &store);

    let err = crawler.crawl("A", &opts(0), None).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let negative_wait = CrawlOptions { wait_seconds: -1.0, ..opts(1) };
    let err = crawler.crawl("A", &negative_wait, None).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let endless_wait = CrawlOptions::new(1, 1e20);
    let err = crawler.crawl("A", &endless_wait, None).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    assert!(wiki.hits().is_empty());
    assert!(!store.path().exists());
}

#[test]
fn redirect_to_a_seen_page_is_not_counted_twice() {
    let wiki = FakeWiki::default()
        .page("A", &["Pika", "Pikachu"], "start")
        .page("Pikachu", &[], "electric mouse")
        .redirect("Pika", "Pikachu");
    let (_dir, store) = store();

    let report = Crawler::new(&wiki, &store).crawl("A", &opts(1), None).unwrap();

    assert_eq!(report.fetched, ["A", "Pikachu"]);
    assert_eq!(wiki.hits(), ["A", "Pika"]);
    assert_eq!(report.corpus.count("electric"), 1);
}

#[test]
fn second_crawl_adds_nothing_new() {
    let wiki = FakeWiki::default().page("A", &["B"], "alpha").page("B", &[], "bravo");
    let (_dir, store) = store();
    let crawler = Crawler::new(&wiki, &store);

    let first = crawler.crawl("A", &opts(1), None).unwrap();
    let second = crawler.crawl("a", &opts(1), None).unwrap();

    assert_eq!(second.counted, 0);
    assert_eq!(second.fetched, ["A", "B"]);
    assert_eq!(first.corpus, second.corpus);
}

#[test]
fn fatal_error_keeps_what_was_counted() {
    let wiki = FakeWiki::default().page("A", &["Broken"], "alpha").broken("Broken");
    let (_dir, store) = store();

    let err = Crawler::new(&wiki, &store).crawl("A", &opts(1), None).unwrap_err();
    assert!(matches!(err, Error::Extract(_)));
    assert_eq!(store.load().unwrap().count("alpha"), 1);
}

/// Records whether the corpus file existed each time a page finished.
struct FileWatch {
    path: PathBuf,
    seen: Vec<bool>,
}

impl Progress for FileWatch {
    fn item_done(&mut self, _title: &str, _depth: u32) {
        self.seen.push(self.path.exists());
    }
}

#[test]
fn checkpoints_save_during_the_crawl() {
    let wiki = FakeWiki::default()
        .page("A", &["B", "C"], "alpha")
        .page("B", &[], "bravo")
        .page("C", &[], "charlie");
    let (_dir, store) = store();
    let mut watch = FileWatch { path: store.path().to_path_buf(), seen: Vec::new() };
    let every_page = CrawlOptions { checkpoint_every: 1, ..opts(1) };

    Crawler::new(&wiki, &store)
        .crawl("A", &every_page, Some(&mut watch as &mut dyn Progress))
        .unwrap();

    assert_eq!(watch.seen, [false, true, true]);
}

#[test]
fn encoded_percent_link_is_just_another_page() {
    // href /wiki/%2523 names the page titled "%23"
    let wiki = FakeWiki::default()
        .page("A", &["%2523", "B"], "alpha")
        .page("%23", &[], "percent")
        .page("B", &[], "bravo");
    let (_dir, store) = store();

    let report = Crawler::new(&wiki, &store).crawl("A", &opts(1), None).unwrap();

    assert_eq!(report.fetched, ["A", "%23", "B"]);
    assert!(report.failures.is_empty());
    assert_eq!(report.corpus.count("percent"), 1);
    assert_eq!(report.corpus.count("bravo"), 1);
}

#[test]
fn wait_applies_only_between_real_fetches() {
    let wiki = FakeWiki::default()
        .page("A", &["B", "Pika", "Pikachu"], "alpha")
        .page("B", &[], "bravo")
        .page("Pikachu", &[], "electric")
        .redirect("Pika", "Pikachu");
    let (_dir, store) = store();
    let paced = CrawlOptions { wait_seconds: 0.1, ..opts(1) };

    let started = Instant::now();
    Crawler::new(&wiki, &store).crawl("A", &paced, None).unwrap();
    let elapsed = started.elapsed();

    // A, B, Pika are fetched; the queued Pikachu entry is skipped
    assert_eq!(wiki.hits(), ["A", "B", "Pika"]);
    assert!(elapsed >= Duration::from_millis(200), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(290), "elapsed {elapsed:?}");
}

/// Names of the progress callbacks, in call order.
#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
}

impl Progress for Recorder {
    fn begin(&mut self, _total: Option<usize>) {
        self.calls.push("begin");
    }

    fn finish(&mut self) {
        self.calls.push("finish");
    }
}

#[test]
fn progress_is_finished_even_when_the_crawl_stops() {
    let wiki = FakeWiki::default().page("A", &["Broken"], "alpha").broken("Broken");
    let (_dir, store) = store();
    let mut rec = Recorder::default();

    let result = Crawler::new(&wiki, &store).crawl("A", &opts(1), Some(&mut rec as &mut dyn Progress));

    assert!(result.is_err());
    assert_eq!(rec.calls, ["begin", "finish"]);
}

/// Read-only directories are not enforced for root; such runs skip the check.
#[cfg(unix)]
fn make_read_only(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o555)).unwrap();
    let writable = std::fs::File::create(dir.join(".writable")).is_ok();
    if writable {
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    !writable
}

#[cfg(unix)]
fn make_writable(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn stop_reason_survives_a_failed_save() {
    let wiki = FakeWiki::default().page("A", &["Broken"], "alpha").broken("Broken");
    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    let store = CorpusStore::new(locked.join("word-counts.json"));
    if !make_read_only(&locked) {
        return;
    }

    let err = Crawler::new(&wiki, &store).crawl("A", &opts(1), None).unwrap_err();
    make_writable(&locked);

    assert!(matches!(err, Error::Extract(_)), "got {err:?}");
    assert!(!store.path().exists());
}
