// Hacker News API HTTP client.
// Handles request construction, per-request timeouts, and response
// classification into the fetch error taxonomy.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{FetchError, Result};

/// Public Firebase endpoint for the Hacker News API.
pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Upper bound per request; a slower response is treated as failed.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Hacker News API client. Cheap to clone; concurrent batch fetches share
/// the same connection pool.
#[derive(Debug, Clone)]
pub struct HnClient {
    client: Client,
    base_url: String,
}

impl HnClient {
    /// Create a client against the public API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a specific base URL (tests, mirrors).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("hearth")
            .build()
            .map_err(classify)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a JSON document at a path relative to the API base.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await.map_err(classify)?;

        match response.status() {
            StatusCode::OK => response.json::<T>().await.map_err(classify),
            status => Err(FetchError::BadStatus(status.as_u16())),
        }
    }
}

/// Map a transport error onto the fetch error taxonomy.
fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_builder() {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        FetchError::BadUrl(url)
    } else if err.is_decode() {
        FetchError::BadBody(err.to_string())
    } else {
        FetchError::Network(err)
    }
}
