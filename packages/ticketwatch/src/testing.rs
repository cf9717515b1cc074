//! Mock collaborators for testing.
//!
//! Configurable stand-ins for the transport, fingerprint store,
//! summarizer, and notifier. Each records the calls it receives; clones
//! share the recorded state so a test can keep a handle while the
//! watcher owns another.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{FetchError, FetchResult, StoreError, StoreResult, SummarizeError};
use crate::fetcher::Transport;
use crate::fingerprint::{ContentFingerprint, FingerprintStore};
use crate::notifier::Notifier;
use crate::summarizer::{Summarizer, SummaryResult};
use openai_client::{OpenAIError, Usage};

/// Transport that always answers with the same body.
pub struct StaticTransport {
    body: String,
    calls: Arc<RwLock<Vec<String>>>,
}

impl StaticTransport {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of times `get` was called.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// URLs that were requested, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

impl Clone for StaticTransport {
    fn clone(&self) -> Self {
        Self {
            body: self.body.clone(),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, url: &str) -> FetchResult<String> {
        self.calls.write().unwrap().push(url.to_string());
        Ok(self.body.clone())
    }
}

/// Transport that fails a configurable number of leading attempts.
///
/// Failures surface as a 503 status so they count as retryable fetch
/// errors, same shape as a real outage.
pub struct FlakyTransport {
    body: String,
    fail_first: usize,
    always_fail: bool,
    calls: Arc<RwLock<usize>>,
}

impl FlakyTransport {
    /// Fail the first `failures` calls, then answer with `body`.
    pub fn succeeds_after(failures: usize, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            fail_first: failures,
            always_fail: false,
            calls: Arc::new(RwLock::new(0)),
        }
    }

    /// Fail every call.
    pub fn always_failing() -> Self {
        Self {
            body: String::new(),
            fail_first: 0,
            always_fail: true,
            calls: Arc::new(RwLock::new(0)),
        }
    }

    /// Number of times `get` was called.
    pub fn call_count(&self) -> usize {
        *self.calls.read().unwrap()
    }
}

impl Clone for FlakyTransport {
    fn clone(&self) -> Self {
        Self {
            body: self.body.clone(),
            fail_first: self.fail_first,
            always_fail: self.always_fail,
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl Transport for FlakyTransport {
    async fn get(&self, url: &str) -> FetchResult<String> {
        let attempt = {
            let mut calls = self.calls.write().unwrap();
            *calls += 1;
            *calls
        };

        if self.always_fail || attempt <= self.fail_first {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            });
        }

        Ok(self.body.clone())
    }
}

/// In-memory fingerprint store.
#[derive(Default)]
pub struct MemoryFingerprintStore {
    stored: Arc<RwLock<Option<ContentFingerprint>>>,
    saves: Arc<RwLock<usize>>,
}

impl MemoryFingerprintStore {
    /// Create an empty store, as on a first run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a fingerprint.
    pub fn with_stored(fingerprint: ContentFingerprint) -> Self {
        let store = Self::new();
        *store.stored.write().unwrap() = Some(fingerprint);
        store
    }

    /// Currently stored fingerprint, if any.
    pub fn stored(&self) -> Option<ContentFingerprint> {
        self.stored.read().unwrap().clone()
    }

    /// Number of times `save_current` was called.
    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap()
    }
}

impl Clone for MemoryFingerprintStore {
    fn clone(&self) -> Self {
        Self {
            stored: Arc::clone(&self.stored),
            saves: Arc::clone(&self.saves),
        }
    }
}

impl FingerprintStore for MemoryFingerprintStore {
    fn load_previous(&self) -> StoreResult<Option<ContentFingerprint>> {
        Ok(self.stored.read().unwrap().clone())
    }

    fn save_current(&self, fingerprint: &ContentFingerprint) -> StoreResult<()> {
        *self.stored.write().unwrap() = Some(fingerprint.clone());
        *self.saves.write().unwrap() += 1;
        Ok(())
    }
}

/// Store whose writes always fail, for exercising the abort path.
#[derive(Clone, Copy)]
pub struct FailingFingerprintStore;

impl FingerprintStore for FailingFingerprintStore {
    fn load_previous(&self) -> StoreResult<Option<ContentFingerprint>> {
        Ok(None)
    }

    fn save_current(&self, _fingerprint: &ContentFingerprint) -> StoreResult<()> {
        Err(StoreError::Write {
            path: PathBuf::from("cache/last_content_hash.txt"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        })
    }
}

/// Summarizer with a canned answer, or a canned failure.
pub struct MockSummarizer {
    response: Option<SummaryResult>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockSummarizer {
    /// Answer every call with `text` and fixed usage counters.
    pub fn with_summary(text: impl Into<String>) -> Self {
        let usage = Usage {
            prompt_tokens: 100,
            completion_tokens: 50,
            total_tokens: 150,
        };
        Self {
            response: Some(SummaryResult::new(text, &usage)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Fail every call with an API error.
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of times `summarize` was called.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Page texts that were passed in, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

impl Clone for MockSummarizer {
    fn clone(&self) -> Self {
        Self {
            response: self.response.clone(),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, page_text: &str) -> Result<SummaryResult, SummarizeError> {
        self.calls.write().unwrap().push(page_text.to_string());

        match &self.response {
            Some(result) => Ok(result.clone()),
            None => Err(SummarizeError::Completion(OpenAIError::Api {
                status: 500,
                message: "mock summarizer failure".to_string(),
            })),
        }
    }
}

/// Notifier that records every delivered message.
#[derive(Default)]
pub struct MockNotifier {
    messages: Arc<RwLock<Vec<String>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.read().unwrap().clone()
    }

    /// Number of messages delivered.
    pub fn message_count(&self) -> usize {
        self.messages.read().unwrap().len()
    }
}

impl Clone for MockNotifier {
    fn clone(&self) -> Self {
        Self {
            messages: Arc::clone(&self.messages),
        }
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, message: &str) {
        self.messages.write().unwrap().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flaky_transport_recovers() {
        let transport = FlakyTransport::succeeds_after(2, "ok");

        assert!(transport.get("https://example.com").await.is_err());
        assert!(transport.get("https://example.com").await.is_err());
        assert_eq!(transport.get("https://example.com").await.unwrap(), "ok");
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_recorded_calls() {
        let notifier = MockNotifier::new();
        let handle = notifier.clone();

        notifier.notify("hello").await;

        assert_eq!(handle.message_count(), 1);
        assert_eq!(handle.messages(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryFingerprintStore::new();
        assert_eq!(store.load_previous().unwrap(), None);

        let fp = ContentFingerprint::from_text("content");
        store.save_current(&fp).unwrap();

        assert_eq!(store.load_previous().unwrap(), Some(fp));
        assert_eq!(store.save_count(), 1);
    }
}
