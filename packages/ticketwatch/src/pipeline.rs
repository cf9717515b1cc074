//! The check-and-notify workflow.
//!
//! One run walks fetch → normalize → compare → [summarize] → notify and
//! reports what it concluded. The new fingerprint is persisted the
//! moment a change is detected, before summarization, so a failed or
//! interrupted summary never causes the same change to be summarized
//! twice. Summarization and delivery failures degrade the message; only
//! fetching and state persistence can abort the run.

use tracing::{debug, error, info};

use crate::error::WatchError;
use crate::fetcher::{PageFetcher, Transport};
use crate::fingerprint::{ContentFingerprint, FingerprintStore};
use crate::normalizer::PageSnapshot;
use crate::notifier::Notifier;
use crate::summarizer::{Summarizer, SummaryResult};

/// Notice sent when the page content is unchanged; `{short}` is replaced
/// with the leading characters of the digest.
pub const UNCHANGED_MESSAGE_TEMPLATE: &str = "📭 網頁內容無變化（hash {short}），暫無新票務資訊。";

/// Notice sent when the page changed but summarization failed.
pub const SUMMARY_UNAVAILABLE_MESSAGE: &str =
    "⚠️ 偵測到網頁內容變化，但摘要服務暫時無法使用，請直接檢查網頁。";

/// Render the unchanged notice for a digest.
pub fn format_unchanged_message(fingerprint: &ContentFingerprint) -> String {
    UNCHANGED_MESSAGE_TEMPLATE.replace("{short}", fingerprint.short())
}

/// What one run concluded.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// Content matches the stored fingerprint; no summarization happened
    /// and the stored state was left untouched.
    Unchanged { fingerprint: ContentFingerprint },

    /// Content changed and the new fingerprint was persisted. `summary`
    /// is `None` when summarization failed and the fallback notice was
    /// delivered instead.
    Changed {
        fingerprint: ContentFingerprint,
        summary: Option<SummaryResult>,
    },
}

/// Orchestrates one complete check.
pub struct TicketWatcher<T, S, N, F>
where
    T: Transport,
    S: Summarizer,
    N: Notifier,
    F: FingerprintStore,
{
    fetcher: PageFetcher<T>,
    store: F,
    summarizer: S,
    notifier: N,
}

impl<T, S, N, F> TicketWatcher<T, S, N, F>
where
    T: Transport,
    S: Summarizer,
    N: Notifier,
    F: FingerprintStore,
{
    pub fn new(fetcher: PageFetcher<T>, store: F, summarizer: S, notifier: N) -> Self {
        Self {
            fetcher,
            store,
            summarizer,
            notifier,
        }
    }

    /// Run one check: fetch, normalize, compare, optionally summarize,
    /// notify.
    pub async fn run(&self) -> Result<CheckOutcome, WatchError> {
        let html = self.fetcher.fetch().await?;

        let snapshot = PageSnapshot::from_html(self.fetcher.url(), &html);
        debug!(url = %snapshot.url, chars = snapshot.text.len(), "page normalized");

        let current = snapshot.fingerprint();
        let previous = self.store.load_previous()?;

        if previous.as_ref() == Some(&current) {
            info!(digest = current.short(), "content unchanged");

            let message = format_unchanged_message(&current);
            self.notifier.notify(&message).await;

            return Ok(CheckOutcome::Unchanged {
                fingerprint: current,
            });
        }

        match &previous {
            Some(prev) => info!(old = prev.short(), new = current.short(), "content changed"),
            None => info!(new = current.short(), "first run, no stored fingerprint"),
        }

        // Persist before summarizing: the new state counts as seen even
        // if the summary never materializes.
        self.store.save_current(&current)?;

        let summary = match self.summarizer.summarize(&snapshot.text).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!(error = %e, "summarization failed");
                None
            }
        };

        let message = summary
            .as_ref()
            .map(|s| s.notification_text())
            .unwrap_or_else(|| SUMMARY_UNAVAILABLE_MESSAGE.to_string());
        self.notifier.notify(&message).await;

        Ok(CheckOutcome::Changed {
            fingerprint: current,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FailingFingerprintStore, MemoryFingerprintStore, MockNotifier, MockSummarizer,
        StaticTransport,
    };
    use crate::normalizer::extract_visible_text;
    use std::time::Duration;

    const PAGE: &str = "<html><body><h1>F1 Japan</h1><p>Tickets from April.</p></body></html>";

    fn page_fingerprint() -> ContentFingerprint {
        ContentFingerprint::from_text(&extract_visible_text(PAGE))
    }

    fn fetcher(body: &str) -> PageFetcher<StaticTransport> {
        PageFetcher::new(StaticTransport::new(body), "https://tickets.example/f1")
            .with_retry_wait(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_unchanged_page_skips_summarizer_and_store_write() {
        let store = MemoryFingerprintStore::with_stored(page_fingerprint());
        let summarizer = MockSummarizer::with_summary("unused");
        let notifier = MockNotifier::new();

        let watcher = TicketWatcher::new(
            fetcher(PAGE),
            store.clone(),
            summarizer.clone(),
            notifier.clone(),
        );
        let outcome = watcher.run().await.unwrap();

        assert!(matches!(outcome, CheckOutcome::Unchanged { .. }));
        assert_eq!(summarizer.call_count(), 0);
        assert_eq!(store.save_count(), 0);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains(page_fingerprint().short()));
    }

    #[tokio::test]
    async fn test_changed_page_saves_then_summarizes() {
        let store = MemoryFingerprintStore::with_stored(ContentFingerprint::from_text("old"));
        let summarizer = MockSummarizer::with_summary("四月開賣");
        let notifier = MockNotifier::new();

        let watcher = TicketWatcher::new(
            fetcher(PAGE),
            store.clone(),
            summarizer.clone(),
            notifier.clone(),
        );
        let outcome = watcher.run().await.unwrap();

        match outcome {
            CheckOutcome::Changed {
                fingerprint,
                summary,
            } => {
                assert_eq!(fingerprint, page_fingerprint());
                assert!(summary.is_some());
            }
            other => panic!("expected Changed, got {other:?}"),
        }

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.stored(), Some(page_fingerprint()));
        assert_eq!(summarizer.call_count(), 1);

        // the summarizer received the normalized text, not raw HTML
        let seen = summarizer.calls();
        assert_eq!(seen[0], extract_visible_text(PAGE));

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("四月開賣"));
        assert!(messages[0].contains("💰"));
    }

    #[tokio::test]
    async fn test_summarizer_failure_degrades_to_fallback_message() {
        let store = MemoryFingerprintStore::new();
        let summarizer = MockSummarizer::failing();
        let notifier = MockNotifier::new();

        let watcher = TicketWatcher::new(
            fetcher(PAGE),
            store.clone(),
            summarizer.clone(),
            notifier.clone(),
        );
        let outcome = watcher.run().await.unwrap();

        // the fingerprint is persisted even though summarization failed
        assert!(matches!(outcome, CheckOutcome::Changed { summary: None, .. }));
        assert_eq!(store.stored(), Some(page_fingerprint()));
        assert_eq!(notifier.messages(), vec![SUMMARY_UNAVAILABLE_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_first_run_takes_change_branch() {
        let store = MemoryFingerprintStore::new();
        let summarizer = MockSummarizer::with_summary("首次檢查");
        let notifier = MockNotifier::new();

        let watcher = TicketWatcher::new(
            fetcher(PAGE),
            store.clone(),
            summarizer.clone(),
            notifier.clone(),
        );
        let outcome = watcher.run().await.unwrap();

        assert!(matches!(outcome, CheckOutcome::Changed { .. }));
        assert_eq!(summarizer.call_count(), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_store_write_failure_aborts_run() {
        let summarizer = MockSummarizer::with_summary("unused");
        let notifier = MockNotifier::new();

        let watcher = TicketWatcher::new(
            fetcher(PAGE),
            FailingFingerprintStore,
            summarizer.clone(),
            notifier.clone(),
        );
        let err = watcher.run().await.unwrap_err();

        assert!(matches!(err, WatchError::Store(_)));
        // nothing was summarized or sent for a run that could not record state
        assert_eq!(summarizer.call_count(), 0);
        assert_eq!(notifier.message_count(), 0);
    }

    #[test]
    fn test_unchanged_message_embeds_short_digest() {
        let fp = ContentFingerprint::from_text("anything");
        let message = format_unchanged_message(&fp);

        assert!(message.contains(fp.short()));
        assert!(!message.contains("{short}"));
    }
}
