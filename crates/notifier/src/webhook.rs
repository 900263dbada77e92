use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, WrapErr, eyre};
use reqwest::Client;
use timeline_core::{models::notification::Message, repositories::Notifier};
use tracing::debug;

/// Posts each message as JSON to a fixed endpoint, typically a mail relay.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("failed to build webhook client")?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_message(&self, message: Message) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&message)
            .send()
            .await
            .wrap_err("failed to reach notification webhook")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("notification webhook returned {}: {}", status, body));
        }

        debug!(recipient = %message.recipient, "notification delivered");
        Ok(())
    }
}
