//! Page fetching over HTTP.
//!
//! One job: turn a URL into raw HTML, with a browser-like identifying
//! header and a hard timeout. Anything non-2xx or slower than the timeout
//! is an error the caller counts against that item.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{Result, RetexoError};

/// Browser-like User-Agent; some origins refuse obvious bots outright.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent string sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

/// Fetches HTML content from a URL.
///
/// Performs an HTTP GET and returns the response body as text. Follows
/// redirects, respects the configured timeout, and fails on non-success
/// status codes.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| RetexoError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(RetexoError::InvalidUrl(format!(
            "URL must use http or https, got '{}'",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(RetexoError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                RetexoError::Timeout { timeout: config.timeout }
            } else {
                RetexoError::HttpError(e)
            }
        })?;

    let response = response.error_for_status().map_err(RetexoError::HttpError)?;

    Ok(response.text().await?)
}
