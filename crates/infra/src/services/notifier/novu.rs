use super::{INotifier, Recipient};
use crate::config::NovuConfig;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
struct TriggerRequest<'a> {
    name: &'a str,
    to: &'a Recipient,
    payload: serde_json::Value,
}

/// Triggers workflows through the Novu events api
pub struct NovuNotifier {
    client: Client,
    secret_key: String,
    api_url: String,
}

impl NovuNotifier {
    pub fn new(config: &NovuConfig) -> Self {
        Self {
            client: Client::new(),
            secret_key: config.secret_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl INotifier for NovuNotifier {
    async fn trigger(
        &self,
        workflow_id: &str,
        recipient: &Recipient,
        payload: serde_json::Value,
    ) -> anyhow::Result<()> {
        let body = TriggerRequest {
            name: workflow_id,
            to: recipient,
            payload,
        };
        let res = self
            .client
            .post(&format!("{}/v1/events/trigger", self.api_url))
            .header("authorization", format!("ApiKey {}", self.secret_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[Network Error] Novu trigger of {} failed. Error message: {:?}",
                    workflow_id, e
                );
                anyhow::Error::new(e)
            })?;

        res.error_for_status().map(|_| ()).map_err(|e| {
            error!(
                "[Unexpected Response] Novu trigger of {} failed. Error message: {:?}",
                workflow_id, e
            );
            anyhow::Error::new(e)
        })
    }
}
