//! Page retrieval with bounded retries.
//!
//! One fixed URL, plain GET, constant wait between attempts. Exhausting
//! the attempt budget is fatal for the run; the external scheduler owns
//! any longer-horizon retry.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};

/// Request timeout for a single attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport capable of fetching one page body.
///
/// Implementations return the body only for a 200 response; any other
/// status or transport failure is an error so the retry loop can count
/// it as a failed attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> FetchResult<String>;
}

/// Reqwest-backed transport with a fixed per-request timeout.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        // Browser-like User-Agent: ticket sites tend to reject default
        // client strings
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> FetchResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })
    }
}

/// Fetches the monitored page, retrying on any non-200 outcome.
pub struct PageFetcher<T: Transport> {
    transport: T,
    url: String,
    max_attempts: u32,
    wait: Duration,
}

impl<T: Transport> PageFetcher<T> {
    /// Create a fetcher with the default budget of 3 attempts, 5 seconds
    /// apart.
    pub fn new(transport: T, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
            max_attempts: 3,
            wait: Duration::from_secs(5),
        }
    }

    /// Set how many attempts are made before giving up. Clamped to at
    /// least one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the constant wait between attempts.
    pub fn with_retry_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// URL this fetcher is bound to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the page body.
    ///
    /// Each failed attempt is logged at warning level with its cause;
    /// the wait between attempts is constant, no backoff.
    pub async fn fetch(&self) -> FetchResult<String> {
        for attempt in 1..=self.max_attempts {
            match self.transport.get(&self.url).await {
                Ok(body) => {
                    debug!(url = %self.url, attempt, bytes = body.len(), "page fetched");
                    return Ok(body);
                }
                Err(e) => {
                    warn!(
                        url = %self.url,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "fetch attempt failed"
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.wait).await;
                    }
                }
            }
        }

        Err(FetchError::AttemptsExhausted {
            url: self.url.clone(),
            attempts: self.max_attempts,
        })
    }
}
