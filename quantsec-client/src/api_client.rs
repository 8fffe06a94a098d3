//! HTTP client for the KEM service and recipient directory.
//!
//! Implements the [`Kem`] boundary trait against the backend's
//! Kyber endpoints and resolves human-readable recipient identifiers to
//! current public keys. Key material crosses the wire as base64 strings;
//! shared secrets are decoded into zeroizing buffers and never logged.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::types::{ApiStatus, RecipientRecord, StatusEnvelope};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use quantsec_crypto::{Encapsulation, Kem, KemError, KemKeyPair, SharedSecret};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Client for the KEM service and directory endpoints.
#[derive(Clone)]
pub struct KemApiClient {
    client: Client,
    config: ClientConfig,
}

#[derive(Deserialize)]
struct KeygenResponse {
    #[serde(flatten)]
    status: StatusEnvelope,
    #[serde(default)]
    public_key: String,
    #[serde(default)]
    private_key: String,
}

#[derive(Deserialize)]
struct EncapsulateResponse {
    #[serde(flatten)]
    status: StatusEnvelope,
    #[serde(default)]
    wrapped_secret: String,
    #[serde(default)]
    shared_secret: String,
}

#[derive(Deserialize)]
struct DecapsulateResponse {
    #[serde(flatten)]
    status: StatusEnvelope,
    #[serde(default)]
    shared_secret: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(flatten)]
    status: StatusEnvelope,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Public Key", default)]
    public_key: String,
}

impl KemApiClient {
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self { client, config }
    }

    /// Resolves a recipient identifier (username or email) to the
    /// recipient's display name and current public key.
    ///
    /// A miss is "recipient unknown", not a cryptographic failure.
    pub async fn lookup_recipient(&self, identifier: &str) -> ClientResult<RecipientRecord> {
        let url = format!("{}/get-user-public-key", self.config.api_base_url);
        debug!(identifier, "resolving recipient public key");

        let resp: LookupResponse = self
            .client
            .get(&url)
            .query(&[("identifier", identifier)])
            .send()
            .await?
            .json()
            .await?;

        if resp.status.status == ApiStatus::Negative {
            return Err(ClientError::RecipientUnknown(identifier.to_string()));
        }

        Ok(RecipientRecord {
            display_name: resp.name,
            public_key: resp.public_key,
        })
    }
}

fn decode_secret(field: &str, value: &str) -> Result<Vec<u8>, KemError> {
    BASE64
        .decode(value)
        .map_err(|e| KemError::Service(format!("malformed {field} in response: {e}")))
}

impl Kem for KemApiClient {
    async fn generate_keypair(&self) -> Result<KemKeyPair, KemError> {
        let url = format!("{}/kyber-keygen", self.config.api_base_url);
        debug!("requesting KEM key pair");

        let resp: KeygenResponse = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| KemError::Service(e.to_string()))?
            .json()
            .await
            .map_err(|e| KemError::Service(e.to_string()))?;

        if resp.status.status == ApiStatus::Negative {
            return Err(KemError::Service(resp.status.message));
        }

        Ok(KemKeyPair {
            public_key: resp.public_key,
            private_key: resp.private_key,
        })
    }

    async fn encapsulate(&self, recipient_public_key: &str) -> Result<Encapsulation, KemError> {
        let url = format!("{}/kyber-encapsulate", self.config.api_base_url);
        debug!("requesting encapsulation");

        let resp: EncapsulateResponse = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "public_key": recipient_public_key }))
            .send()
            .await
            .map_err(|e| KemError::Service(e.to_string()))?
            .json()
            .await
            .map_err(|e| KemError::Service(e.to_string()))?;

        if resp.status.status == ApiStatus::Negative {
            return Err(KemError::MalformedKey(resp.status.message));
        }

        Ok(Encapsulation {
            wrapped_secret: decode_secret("wrapped_secret", &resp.wrapped_secret)?,
            shared_secret: SharedSecret::new(decode_secret("shared_secret", &resp.shared_secret)?),
        })
    }

    async fn decapsulate(
        &self,
        recipient_private_key: &str,
        wrapped_secret: &[u8],
    ) -> Result<SharedSecret, KemError> {
        let url = format!("{}/kyber-decapsulate", self.config.api_base_url);
        debug!("requesting decapsulation");

        let resp: DecapsulateResponse = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "private_key": recipient_private_key,
                "wrapped_secret": BASE64.encode(wrapped_secret),
            }))
            .send()
            .await
            .map_err(|e| KemError::Service(e.to_string()))?
            .json()
            .await
            .map_err(|e| KemError::Service(e.to_string()))?;

        if resp.status.status == ApiStatus::Negative {
            return Err(KemError::Decapsulation(resp.status.message));
        }

        Ok(SharedSecret::new(decode_secret(
            "shared_secret",
            &resp.shared_secret,
        )?))
    }
}
