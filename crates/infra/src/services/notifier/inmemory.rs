use super::{INotifier, Recipient};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub workflow_id: String,
    pub recipient: Recipient,
    pub payload: serde_json::Value,
}

/// Keeps every notification in memory instead of delivering it, for tests.
/// Recipients can be configured to fail to simulate an unreachable provider.
pub struct InMemoryNotifier {
    sent: Mutex<Vec<SentNotification>>,
    failing: Mutex<HashSet<String>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Every successfully triggered notification in the order they were triggered
    pub fn sent(&self) -> Vec<SentNotification> {
        lock(&self.sent).clone()
    }

    pub fn fail_for(&self, email: &str) {
        lock(&self.failing).insert(email.to_string());
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl INotifier for InMemoryNotifier {
    async fn trigger(
        &self,
        workflow_id: &str,
        recipient: &Recipient,
        payload: serde_json::Value,
    ) -> anyhow::Result<()> {
        if lock(&self.failing).contains(&recipient.email) {
            return Err(anyhow::anyhow!(
                "Notifier rejected {} for {}",
                workflow_id,
                recipient.email
            ));
        }
        lock(&self.sent).push(SentNotification {
            workflow_id: workflow_id.to_string(),
            recipient: recipient.clone(),
            payload,
        });
        Ok(())
    }
}
