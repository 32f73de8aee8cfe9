use super::{INotifier, Recipient};
use tracing::info;

/// Used when no notification provider is configured.
/// Notifications are logged and then dropped.
pub struct LogNotifier;

#[async_trait::async_trait]
impl INotifier for LogNotifier {
    async fn trigger(
        &self,
        workflow_id: &str,
        recipient: &Recipient,
        payload: serde_json::Value,
    ) -> anyhow::Result<()> {
        info!(
            workflow_id,
            subscriber_id = %recipient.subscriber_id,
            %payload,
            "No notification provider configured, dropping notification"
        );
        Ok(())
    }
}
