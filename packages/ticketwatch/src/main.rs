// Main entry point for the ticket watcher

use anyhow::{Context, Result};
use line::{LineClient, LineOptions};
use openai_client::OpenAIClient;
use ticketwatch::{
    CheckOutcome, Config, FileFingerprintStore, HttpTransport, LineNotifier, PageFetcher,
    TicketSummarizer, TicketWatcher,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ticketwatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ticket check");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(url = %config.ticket_url, "Configuration loaded");

    // Wire up the collaborators
    let transport = HttpTransport::new().context("Failed to create HTTP client")?;
    let fetcher = PageFetcher::new(transport, &config.ticket_url)
        .with_max_attempts(config.fetch_max_attempts)
        .with_retry_wait(config.fetch_retry_wait);

    let store = FileFingerprintStore::new(&config.cache_dir);

    let summarizer = TicketSummarizer::new(
        OpenAIClient::new(config.openai_api_key),
        config.openai_model,
    );

    let notifier = LineNotifier::new(
        LineClient::new(LineOptions {
            access_token: config.line_token,
        }),
        config.line_user_id,
    );

    // Run one check
    let watcher = TicketWatcher::new(fetcher, store, summarizer, notifier);
    let outcome = watcher.run().await.context("Check failed")?;

    match outcome {
        CheckOutcome::Unchanged { fingerprint } => {
            tracing::info!(digest = fingerprint.short(), "Check complete, no change");
        }
        CheckOutcome::Changed {
            fingerprint,
            summary,
        } => {
            tracing::info!(
                digest = fingerprint.short(),
                summarized = summary.is_some(),
                "Check complete, change detected"
            );
        }
    }

    Ok(())
}
