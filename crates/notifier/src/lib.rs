//! Notification senders for booking reminders.
//!
//! Delivery mechanics stay outside the booking core: a sender only has to
//! accept a [`Message`](timeline_core::models::notification::Message) and
//! report whether it went out.

use std::sync::Arc;

use eyre::Result;
use timeline_core::repositories::Notifier;
use tracing::info;

pub mod config;
pub mod log;
pub mod webhook;

pub use log::LogNotifier;
pub use webhook::WebhookNotifier;

/// Picks the sender described by the configuration.
///
/// A webhook URL selects [`WebhookNotifier`]; without one, messages are only
/// logged.
pub fn build_notifier(config: &config::NotifierConfig) -> Result<Arc<dyn Notifier>> {
    match &config.webhook_url {
        Some(url) => {
            info!(url = %url, "Delivering notifications through webhook");
            Ok(Arc::new(WebhookNotifier::new(url.clone(), config.timeout())?))
        }
        None => {
            info!("No webhook configured, notifications will be logged only");
            Ok(Arc::new(LogNotifier))
        }
    }
}
