// src/log.rs
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, fmt::time::uptime};

use crate::error::{Error, Result};
use crate::file::ensure_directory;

/// Install the global subscriber. `RUST_LOG` wins over `verbose` when set.
/// Lines carry time since start, like `0.153s INFO wiki_scrape::crawl: ...`.
/// With `log_file`, output is appended there instead of stderr.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default = if verbose { "wiki_scrape=debug" } else { "wiki_scrape=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = fmt().with_env_filter(filter).with_timer(uptime());

    // A second init (tests, embedding) keeps the first subscriber.
    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    ensure_directory(parent)?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::io(path, e))?;
            let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
    Ok(())
}
