// src/error.rs
use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The title does not resolve to a page (HTTP 404, or a missing local file).
    #[error("page '{title}' was not found")]
    NotFound { title: String },

    /// Transport failure: timeout, DNS, refused connection, HTTP 5xx/blocked.
    #[error("network error fetching '{title}': {reason}")]
    Network { title: String, reason: String },

    /// Persisted corpus exists but cannot be parsed. Never overwritten silently.
    #[error("corpus file {} is corrupt: {source}", path.display())]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("baseline file {} line {line}: {reason}", path.display())]
    InvalidBaseline {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The page was fetched but the requested content is not on it.
    #[error("{0}")]
    Extract(String),
}

impl Error {
    /// Failures that only abort one crawl branch.
    pub fn is_page_failure(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::Network { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
