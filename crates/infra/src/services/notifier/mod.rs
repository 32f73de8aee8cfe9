mod inmemory;
mod logging;
mod novu;

use events_api_domain::User;
pub use inmemory::{InMemoryNotifier, SentNotification};
pub use logging::LogNotifier;
pub use novu::NovuNotifier;
use serde::Serialize;

/// Who a notification is delivered to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub subscriber_id: String,
    pub email: String,
}

impl From<&User> for Recipient {
    fn from(user: &User) -> Self {
        Self {
            subscriber_id: user.email.clone(),
            email: user.email.clone(),
        }
    }
}

/// Delivers a named notification workflow to a `Recipient`
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn trigger(
        &self,
        workflow_id: &str,
        recipient: &Recipient,
        payload: serde_json::Value,
    ) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn users_are_known_to_the_notifier_by_email() {
        let user = User::new("Ada".into(), "ada@example.com".into(), 0);
        let recipient = Recipient::from(&user);
        assert_eq!(recipient.subscriber_id, "ada@example.com");
        assert_eq!(recipient.email, "ada@example.com");
        assert_eq!(
            serde_json::to_value(&recipient).unwrap(),
            json!({ "subscriberId": "ada@example.com", "email": "ada@example.com" })
        );
    }

    #[tokio::test]
    async fn inmemory_notifier_records_and_fails_on_demand() {
        let notifier = InMemoryNotifier::new();
        notifier.fail_for("bob@example.com");

        let ada = Recipient::from(&User::new("Ada".into(), "ada@example.com".into(), 0));
        let bob = Recipient::from(&User::new("Bob".into(), "bob@example.com".into(), 0));

        assert!(notifier
            .trigger("workflow", &ada, json!({ "name": "Ada" }))
            .await
            .is_ok());
        assert!(notifier
            .trigger("workflow", &bob, json!({ "name": "Bob" }))
            .await
            .is_err());

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].workflow_id, "workflow");
        assert_eq!(sent[0].recipient, ada);
        assert_eq!(sent[0].payload["name"], "Ada");
    }

    #[tokio::test]
    async fn log_notifier_accepts_everything() {
        let ada = Recipient::from(&User::new("Ada".into(), "ada@example.com".into(), 0));
        for i in 0..100 {
            assert!(LogNotifier
                .trigger("workflow", &ada, json!({ "attempt": i }))
                .await
                .is_ok());
        }
    }
}
