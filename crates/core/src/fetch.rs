//! Content fetching from URLs, files, and stdin.
//!
//! Secondary enrichment (comment pages and live post feeds) goes through the
//! [`Fetcher`] trait so callers can plug in their own request queue. The
//! default [`HttpFetcher`] uses reqwest. A fetch is a single awaited call:
//! there is no retry, and cancelling means dropping the future.

use std::fs;
use std::path::PathBuf;

#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{DepecheError, Result};

/// Retrieves the body of a URL as text.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Depeche/0.1)".to_string() }
    }
}

/// [`Fetcher`] backed by a reqwest client.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    /// Builds a fetcher with its own connection pool.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(DepecheError::HttpError)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(feature = "fetch")]
#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        fetch_url(&self.client, url, self.config.timeout).await
    }
}

/// Fetches a URL with an existing client and returns the response body.
///
/// Follows redirects; a non-success status is [`DepecheError::HttpStatus`].
#[cfg(feature = "fetch")]
pub async fn fetch_url(client: &Client, url: &str, timeout: u64) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| DepecheError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(DepecheError::InvalidUrl(format!(
            "unsupported scheme '{}' in {}",
            parsed_url.scheme(),
            url
        )));
    }

    tracing::debug!(%url, "Fetching");

    let response = client
        .get(parsed_url)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "fr-FR,fr;q=0.9,en;q=0.8")
        .send()
        .await
        .map_err(|e| if e.is_timeout() { DepecheError::Timeout { timeout } } else { DepecheError::HttpError(e) })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DepecheError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    let content = response.text().await?;
    Ok(content)
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(DepecheError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(DepecheError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(DepecheError::from)?;

    Ok(buffer)
}
