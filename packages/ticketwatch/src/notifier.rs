//! Delivery of the final message to the configured recipient.

use async_trait::async_trait;
use line::LineClient;
use tracing::{info, warn};

/// Delivery capability for the final message.
///
/// Delivery is best-effort: implementations log failures and return
/// normally, so a missed notification never fails the run and is never
/// retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}

/// LINE push notifier bound to one fixed recipient.
pub struct LineNotifier {
    client: LineClient,
    recipient: String,
}

impl LineNotifier {
    pub fn new(client: LineClient, recipient: impl Into<String>) -> Self {
        Self {
            client,
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl Notifier for LineNotifier {
    async fn notify(&self, message: &str) {
        match self.client.push_text(&self.recipient, message).await {
            Ok(()) => info!(chars = message.len(), "message pushed to LINE"),
            Err(e) => warn!(error = %e, "LINE push failed"),
        }
    }
}
