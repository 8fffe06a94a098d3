//! Shared types for the QuantSec HTTP boundary.

use chrono::{DateTime, Utc};
use quantsec_crypto::Envelope;
use serde::{Deserialize, Serialize};

/// Outcome marker used by every backend response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiStatus {
    Positive,
    Negative,
}

/// The `{Status, Message}` pair the backend wraps every response in.
#[derive(Clone, Debug, Deserialize)]
pub struct StatusEnvelope {
    #[serde(rename = "Status")]
    pub status: ApiStatus,
    #[serde(rename = "Message", default)]
    pub message: String,
}

/// Directory entry for a resolved recipient identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRecord {
    pub display_name: String,
    pub public_key: String,
}

/// A sealed message handed to the relay. Subject and body are sealed
/// independently, each under its own fresh secret.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub recipient: String,
    pub sender: String,
    pub subject: Envelope,
    pub body: Envelope,
}

/// A message fetched from the relay. Envelopes stay opaque to the relay;
/// only the recipient can open them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredMessage {
    pub sender: String,
    #[serde(default)]
    pub sender_name: String,
    pub sent_at: DateTime<Utc>,
    pub subject: Envelope,
    pub body: Envelope,
}
