use async_trait::async_trait;
use timeline_core::{models::notification::Message, repositories::Notifier};
use tracing::info;

/// Writes every message to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_message(&self, message: Message) -> eyre::Result<()> {
        info!(
            recipient = %message.recipient,
            template = ?message.template,
            attach = message.attach,
            payload = %message.payload,
            "notification"
        );
        Ok(())
    }
}
