// src/cli.rs
use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use color_eyre::eyre::{Result, WrapErr};

use crate::analyze::{Mode, RankedWord, compare};
use crate::baseline::FrequencyTable;
use crate::config::consts::*;
use crate::config::options::{AnalyzeOptions, CrawlOptions, TableOptions};
use crate::core::sanitize::sanitize_filename;
use crate::crawl::Crawler;
use crate::csv::Delim;
use crate::file::{resolve_single_out_path, write_rows};
use crate::page::{LocalFile, PageSource, WikiClient};
use crate::progress::Progress;
use crate::store::{CorpusStore, MergeOutcome};
use crate::table::extract_table;
use crate::tokenize::tokenize;

const RULE: &str = "------------------------------------------------------------";

#[derive(Parser, Debug)]
#[command(name = "wiki_scrape", version, about = "Scraper and word counter for Bulbapedia (or any MediaWiki site)")]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["summary", "table", "count_words", "analyze_relative_word_frequency", "auto_count_words", "reset_counts"]),
))]
pub struct Cli {
    /// Print the first paragraph of the article
    #[arg(long, value_name = "PHRASE")]
    pub summary: Option<String>,

    /// Print the N-th table of the article and save it as CSV
    #[arg(long, value_name = "PHRASE")]
    pub table: Option<String>,

    /// Count the article's words into the corpus file
    #[arg(long, value_name = "PHRASE")]
    pub count_words: Option<String>,

    /// Compare corpus word frequencies with general language usage
    #[arg(long)]
    pub analyze_relative_word_frequency: bool,

    /// Count words recursively, following internal links from PHRASE
    #[arg(long, value_name = "PHRASE")]
    pub auto_count_words: Option<String>,

    /// Delete the corpus file
    #[arg(long)]
    pub reset_counts: bool,

    /// Table number to fetch (1-based, with --table)
    #[arg(long, default_value_t = DEFAULT_TABLE_NUMBER)]
    pub number: usize,

    /// Treat the table's first row as column headers (with --table)
    #[arg(long)]
    pub first_row_is_header: bool,

    /// Read the article from a local HTML file instead of the network
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Link depth for --auto-count-words
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,

    /// Seconds to wait between requests (with --auto-count-words)
    #[arg(long, default_value_t = DEFAULT_WAIT_SECS, allow_negative_numbers = true)]
    pub wait: f64,

    /// Save the corpus every N newly counted pages during a crawl (0 = at the end only)
    #[arg(long, default_value_t = DEFAULT_CHECKPOINT)]
    pub checkpoint: usize,

    /// Ranking mode for the analysis
    #[arg(long, value_enum, default_value_t = Mode::Language)]
    pub mode: Mode,

    /// Number of words to analyze
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// Word frequency list: `word,frequency` rows (CSV, or TSV by extension)
    #[arg(long, value_name = "PATH", default_value = BASELINE_FILE)]
    pub baseline: PathBuf,

    /// Output file for --table or --analyze-relative-word-frequency
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Corpus file
    #[arg(long, value_name = "PATH", default_value = WORD_COUNTS_FILE)]
    pub store: PathBuf,

    /// Wiki root URL
    #[arg(long, value_name = "URL", default_value = BASE_URL)]
    pub base_url: String,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Append logs to a file instead of stderr
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = LOG_FILE)]
    pub log_file: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    crate::log::init(cli.verbose, cli.log_file.as_deref())?;
    execute(&cli)
}

pub fn execute(cli: &Cli) -> Result<()> {
    let store = CorpusStore::new(&cli.store);

    if let Some(phrase) = &cli.summary {
        println!("--- Fetching summary for {phrase} from {} ---", cli.base_url);
        let page = source(cli)?.fetch(phrase)?;
        match page.summary() {
            Some(text) => println!("{text}"),
            None if !page.has_content() => println!("Could not find content on the page."),
            None => println!("No summary available."),
        }
        println!("{RULE}");
    } else if let Some(phrase) = &cli.table {
        println!("--- Fetching table for {phrase} from {} ---", cli.base_url);
        let opts = TableOptions { number: cli.number, first_row_is_header: cli.first_row_is_header };
        opts.validate()?;
        let page = source(cli)?.fetch(phrase)?;
        let table = extract_table(&page, &opts)?;

        println!("\nExtracted Table Data:");
        print!("{}", crate::csv::rows_to_string(&table.rows, table.headers.as_deref(), '\t'));
        println!("\nValue Counts:");
        for (value, n) in table.value_counts() {
            println!("{n:>6}  {value}");
        }

        let default_name = join!(sanitize_filename(phrase, "table"), ".csv");
        let path = resolve_single_out_path(cli.out.as_deref(), &default_name)?;
        let written = table.write_csv(&path)?;
        println!("\nSaved {}", written.display());
        println!("{RULE}");
    } else if let Some(phrase) = &cli.count_words {
        println!("--- Counting words for {phrase} from {} ---", cli.base_url);
        let page = source(cli)?.fetch(phrase)?;
        if !page.has_content() {
            println!("Could not find content on the page.");
            return Ok(());
        }
        let mut corpus = store.load()?;
        let text = page.text();
        match store.merge(&mut corpus, page.title(), tokenize(&text)) {
            MergeOutcome::Counted { tokens, unique } => {
                println!("Found {unique} unique words ({tokens} total).");
                store.save(&corpus)?;
                println!("Updated word counts saved to {}.", store.path().display());
            }
            MergeOutcome::AlreadyCounted => {
                println!("'{}' is already counted in {}; nothing to do.", page.title(), store.path().display());
            }
        }
        println!("Total unique words: {}.", corpus.distinct_words());
        println!("{RULE}");
    } else if cli.analyze_relative_word_frequency {
        println!("--- Analyzing Word Frequency (Mode: {}) ---", cli.mode);
        let opts = AnalyzeOptions { mode: cli.mode, count: cli.count };
        opts.validate()?;
        let corpus = store.load()?;
        if corpus.is_empty() {
            println!("Warning: {} is empty or missing. Run --count-words first.", store.path().display());
        }
        let baseline = FrequencyTable::load(&cli.baseline)
            .wrap_err_with(|| format!("loading baseline {}", cli.baseline.display()))?;
        let ranked = compare(&corpus, &baseline, opts.mode, opts.count)?;

        print_ranking(&ranked);
        if let Some(out) = &cli.out {
            let written = write_ranking(&ranked, out)?;
            println!("\nSaved {}", written.display());
        }
        println!("{RULE}");
    } else if let Some(phrase) = &cli.auto_count_words {
        println!("--- Auto-scraping starting from '{phrase}' ---");
        let opts = CrawlOptions {
            max_depth: cli.depth,
            wait_seconds: cli.wait,
            checkpoint_every: cli.checkpoint,
        };
        opts.validate()?;
        let client = WikiClient::with_base(&cli.base_url)?;
        let mut console = Console;
        let report = Crawler::new(&client, &store).crawl(phrase, &opts, Some(&mut console as &mut dyn Progress))?;

        println!(
            "Auto-scraping finished: {} pages fetched, {} newly counted, {} failed.",
            report.fetched.len(),
            report.counted,
            report.failures.len()
        );
        for f in &report.failures {
            println!("    ! {}: {}", f.title, f.reason);
        }
        println!("Total unique words: {}.", report.corpus.distinct_words());
    } else if cli.reset_counts {
        store.reset()?;
        println!("Removed {}.", store.path().display());
    }

    Ok(())
}

fn source(cli: &Cli) -> Result<Box<dyn PageSource>> {
    Ok(match &cli.file {
        Some(path) => Box::new(LocalFile::new(path)),
        None => Box::new(WikiClient::with_base(&cli.base_url)?),
    })
}

fn fmt_freq(f: Option<f64>) -> String {
    match f {
        Some(v) => format!("{v:.6}"),
        None => s!("-"),
    }
}

fn print_ranking(ranked: &[RankedWord]) {
    println!("{:<20} {:>8} {:>12} {:>12} {:>8}", "word", "count", "wiki_freq", "lang_freq", "ratio");
    for r in ranked {
        println!(
            "{:<20} {:>8} {:>12.6} {:>12} {:>8}",
            r.word,
            r.corpus_count,
            r.corpus_frequency,
            fmt_freq(r.baseline_frequency),
            r.ratio.to_string()
        );
    }
}

fn write_ranking(ranked: &[RankedWord], out: &std::path::Path) -> crate::Result<PathBuf> {
    let headers = ["word", "count", "wiki_freq", "lang_freq", "ratio"].map(String::from);
    let rows: Vec<Vec<String>> = ranked
        .iter()
        .map(|r| {
            vec![
                r.word.clone(),
                r.corpus_count.to_string(),
                r.corpus_frequency.to_string(),
                r.baseline_frequency.map(|f| f.to_string()).unwrap_or_default(),
                r.ratio.value().map(|v| v.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    write_rows(out, Some(&headers[..]), &rows, Delim::for_path(out))
}

/// Prints crawl progress the way the per-page log reads.
struct Console;

impl Progress for Console {
    fn log(&mut self, msg: &str) {
        println!("    {msg}");
    }

    fn item_done(&mut self, title: &str, depth: u32) {
        println!("    ok  {title} (depth {depth})");
        println!("{RULE}");
    }

    fn item_failed(&mut self, title: &str, reason: &str) {
        println!("    !!  {title}: {reason}");
        println!("{RULE}");
    }
}
