use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Page watched when `TICKET_URL` is not set.
pub const DEFAULT_TICKET_URL: &str = "https://motorsporttickets.com/en/f1/japan";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub ticket_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub line_token: String,
    pub line_user_id: String,
    pub cache_dir: PathBuf,
    pub fetch_max_attempts: u32,
    pub fetch_retry_wait: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            ticket_url: env::var("TICKET_URL")
                .unwrap_or_else(|_| DEFAULT_TICKET_URL.to_string()),
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "o4-mini".to_string()),
            line_token: env::var("LINE_TOKEN")
                .context("LINE_TOKEN must be set")?,
            line_user_id: env::var("LINE_USER_ID")
                .context("LINE_USER_ID must be set")?,
            cache_dir: env::var("CACHE_DIR")
                .unwrap_or_else(|_| "cache".to_string())
                .into(),
            fetch_max_attempts: env::var("FETCH_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("FETCH_MAX_ATTEMPTS must be a valid number")?,
            fetch_retry_wait: Duration::from_secs(
                env::var("FETCH_RETRY_WAIT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .context("FETCH_RETRY_WAIT_SECS must be a valid number")?,
            ),
        })
    }
}
