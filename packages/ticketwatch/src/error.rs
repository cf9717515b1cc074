//! Typed errors for the watcher pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers handle
//! each failure branch explicitly. Only the binary edge wraps these in
//! `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching the monitored page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with something other than 200
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// Transport-level failure (timeout, connection refused, DNS)
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Every attempt failed
    #[error("giving up on {url} after {attempts} attempts")]
    AttemptsExhausted { url: String, attempts: u32 },
}

/// Errors raised by the fingerprint store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the state file failed for a reason other than absence
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the state file (or creating its directory) failed
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while summarizing page text.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The chat completion call failed
    #[error("completion failed: {0}")]
    Completion(#[from] openai_client::OpenAIError),
}

/// Fatal pipeline failures.
///
/// Summarization and notification failures are recovered inside the
/// pipeline and never surface here; the scheduler only sees a failed run
/// when the page could not be fetched or the state could not be persisted.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("fingerprint store failed: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
