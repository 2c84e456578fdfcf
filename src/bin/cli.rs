// src/bin/cli.rs
use wiki_scrape::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
