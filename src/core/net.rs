// src/core/net.rs
// Blocking HTTP GET. One request per call, no retries.

use std::time::Duration;

use reqwest::{StatusCode, blocking::Client};
use tracing::debug;
use url::Url;

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

/// Response body plus the URL it was finally served from (after redirects).
pub struct Fetched {
    pub url: Url,
    pub body: String,
}

pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::Network { title: s!(), reason: format!("could not build HTTP client: {e}") })
}

/// `title` is only used to label errors.
pub fn http_get(client: &Client, url: Url, title: &str) -> Result<Fetched> {
    debug!("GET {url}");
    let network = |reason: String| Error::Network { title: s!(title), reason };

    let resp = client.get(url).send().map_err(|e| network(e.to_string()))?;
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound { title: s!(title) });
    }
    if !status.is_success() {
        return Err(network(format!("HTTP {status}")));
    }

    let url = resp.url().clone();
    let body = resp.text().map_err(|e| network(e.to_string()))?;
    Ok(Fetched { url, body })
}
