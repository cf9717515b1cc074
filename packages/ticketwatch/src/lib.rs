//! Ticket Page Watcher
//!
//! Watches one ticket listing page for content changes. Each run fetches
//! the page, reduces it to stable visible text, fingerprints that text
//! with SHA-256, and compares against the fingerprint persisted by the
//! previous run. Only a changed page is summarized (in Chinese, via the
//! OpenAI chat API) and the summary pushed to a LINE recipient;
//! an unchanged page sends a short no-change notice instead.
//!
//! The process runs once and exits. Scheduling lives outside, in cron or
//! a CI workflow.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ticketwatch::{
//!     Config, FileFingerprintStore, HttpTransport, LineNotifier, PageFetcher,
//!     TicketSummarizer, TicketWatcher,
//! };
//!
//! let config = Config::from_env()?;
//!
//! let watcher = TicketWatcher::new(
//!     PageFetcher::new(HttpTransport::new()?, &config.ticket_url),
//!     FileFingerprintStore::new(&config.cache_dir),
//!     TicketSummarizer::new(OpenAIClient::new(config.openai_api_key), config.openai_model),
//!     LineNotifier::new(line_client, config.line_user_id),
//! );
//!
//! let outcome = watcher.run().await?;
//! ```
//!
//! # Modules
//!
//! - [`fetcher`] - Page retrieval with bounded retries
//! - [`normalizer`] - HTML to stable visible text
//! - [`fingerprint`] - SHA-256 digests and the persisted state file
//! - [`summarizer`] - LLM summarization with cost accounting
//! - [`notifier`] - LINE push delivery
//! - [`pipeline`] - The check-and-notify workflow
//! - [`testing`] - Mock collaborators for tests

pub mod config;
pub mod error;
pub mod fetcher;
pub mod fingerprint;
pub mod normalizer;
pub mod notifier;
pub mod pipeline;
pub mod summarizer;
pub mod testing;

// Re-export the pieces a run is wired from
pub use config::Config;
pub use error::{FetchError, StoreError, SummarizeError, WatchError};
pub use fetcher::{HttpTransport, PageFetcher, Transport};
pub use fingerprint::{ContentFingerprint, FileFingerprintStore, FingerprintStore};
pub use normalizer::{extract_visible_text, PageSnapshot};
pub use notifier::{LineNotifier, Notifier};
pub use pipeline::{
    format_unchanged_message, CheckOutcome, TicketWatcher, SUMMARY_UNAVAILABLE_MESSAGE,
    UNCHANGED_MESSAGE_TEMPLATE,
};
pub use summarizer::{
    estimated_cost, format_user_prompt, SummaryResult, Summarizer, TicketSummarizer,
    SYSTEM_PROMPT, USER_PROMPT_TEMPLATE,
};
