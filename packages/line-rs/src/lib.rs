//! Minimal LINE Messaging API client.
//!
//! Supports exactly one operation: pushing a text message to a single
//! recipient via the bot push endpoint, authenticated with a channel
//! access token.
//!
//! # Example
//!
//! ```rust,ignore
//! use line::{LineClient, LineOptions};
//!
//! let client = LineClient::new(LineOptions {
//!     access_token: std::env::var("LINE_TOKEN")?,
//! });
//! client.push_text("U1234567890abcdef", "tickets are on sale").await?;
//! ```

pub mod models;

use models::{PushRequest, TextMessage};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Result type for LINE client operations.
pub type Result<T> = std::result::Result<T, LineError>;

/// LINE client errors.
#[derive(Debug, Error)]
pub enum LineError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-200 response)
    #[error("LINE API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Response body describing the failure
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct LineOptions {
    /// Channel access token for the Messaging API bot.
    pub access_token: String,
}

/// Client for the LINE Messaging API push endpoint.
#[derive(Debug, Clone)]
pub struct LineClient {
    options: LineOptions,
    http_client: Client,
    base_url: String,
}

impl LineClient {
    pub fn new(options: LineOptions) -> Self {
        Self {
            options,
            http_client: Client::new(),
            base_url: "https://api.line.me".to_string(),
        }
    }

    /// Set a custom base URL (for tests and proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Push one text message to one recipient.
    ///
    /// `to` is the recipient's user ID. Succeeds only on HTTP 200; any
    /// other status is returned as [`LineError::Api`] with the response
    /// body, which LINE fills with a JSON error description.
    pub async fn push_text(&self, to: &str, text: &str) -> Result<()> {
        let body = PushRequest {
            to: to.to_string(),
            messages: vec![TextMessage::new(text)],
        };

        let response = self
            .http_client
            .post(format!("{}/v2/bot/message/push", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.options.access_token),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| LineError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(LineError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        debug!(to = %to, "LINE push delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = LineClient::new(LineOptions {
            access_token: "token".to_string(),
        })
        .with_base_url("http://localhost:9999");

        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.options.access_token, "token");
    }
}
