use eyre::{Result, eyre};
use std::{env, time::Duration};

/// Configuration for notification delivery.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Endpoint receiving JSON messages (optional)
    pub webhook_url: Option<String>,
    /// Per-request timeout in seconds (defaults to 10)
    pub timeout_seconds: Option<u64>,
}

impl NotifierConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let webhook_url = env::var("NOTIFY_WEBHOOK_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        if let Some(url) = &webhook_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(eyre!("NOTIFY_WEBHOOK_URL must be an http(s) URL"));
            }
        }

        let timeout_seconds = match env::var("NOTIFY_TIMEOUT_SECONDS") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| eyre!("NOTIFY_TIMEOUT_SECONDS must be a valid u64"))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            webhook_url,
            timeout_seconds,
        })
    }

    /// Get the request timeout (defaults to 10 seconds if not set)
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(10))
    }
}
