//! Message relay client.
//!
//! The relay stores and forwards sealed envelopes; it never sees
//! plaintext or key material. Send, fetch, and clear map onto the
//! backend's mail endpoints.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::types::{ApiStatus, OutboundMessage, StatusEnvelope, StoredMessage};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Client for the store-and-forward message relay.
#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    config: ClientConfig,
}

#[derive(Deserialize)]
struct InboxResponse {
    #[serde(flatten)]
    status: StatusEnvelope,
    #[serde(rename = "Messages", default)]
    messages: Vec<StoredMessage>,
}

impl RelayClient {
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self { client, config }
    }

    /// Hands a sealed message to the relay for delivery.
    pub async fn send(&self, message: &OutboundMessage) -> ClientResult<()> {
        let url = format!("{}/post-message", self.config.api_base_url);
        debug!(recipient = %message.recipient, "posting sealed message");

        let resp: StatusEnvelope = self
            .client
            .post(&url)
            .json(message)
            .send()
            .await?
            .json()
            .await?;

        if resp.status == ApiStatus::Negative {
            return Err(ClientError::Api(resp.message));
        }
        Ok(())
    }

    /// Fetches the stored messages for `identifier`.
    pub async fn fetch_inbox(&self, identifier: &str) -> ClientResult<Vec<StoredMessage>> {
        let url = format!("{}/inbox", self.config.api_base_url);
        debug!(identifier, "fetching inbox");

        let resp: InboxResponse = self
            .client
            .get(&url)
            .query(&[("identifier", identifier)])
            .send()
            .await?
            .json()
            .await?;

        if resp.status.status == ApiStatus::Negative {
            return Err(ClientError::Api(resp.status.message));
        }
        Ok(resp.messages)
    }

    /// Deletes all stored messages for `identifier`.
    pub async fn clear_inbox(&self, identifier: &str) -> ClientResult<()> {
        let url = format!("{}/clear-inbox", self.config.api_base_url);
        debug!(identifier, "clearing inbox");

        let resp: StatusEnvelope = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "identifier": identifier }))
            .send()
            .await?
            .json()
            .await?;

        if resp.status == ApiStatus::Negative {
            return Err(ClientError::Api(resp.message));
        }
        Ok(())
    }
}
