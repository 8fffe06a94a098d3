//! High-level send/read flows composing directory, KEM, and relay.
//!
//! `send` resolves the recipient, seals subject and body independently,
//! and hands the result to the relay. `read_inbox` opens each fetched
//! message on its own; one forged message never hides the rest of the
//! inbox, and a failed open is reported per entry without exposing its
//! content as verified.

use crate::api_client::KemApiClient;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::relay::RelayClient;
use crate::types::{OutboundMessage, StoredMessage};
use chrono::{DateTime, Utc};
use quantsec_crypto::{open, seal, OpenError};
use rand::CryptoRng;
use tracing::warn;

/// Plaintext of a successfully verified message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptedMessage {
    pub subject: String,
    pub body: String,
}

/// One inbox message with its decryption outcome.
///
/// Sender metadata comes from the relay and is not authenticated by the
/// envelope; treat it as routing information.
#[derive(Debug)]
pub struct InboxEntry {
    pub sender: String,
    pub sender_name: String,
    pub sent_at: DateTime<Utc>,
    pub outcome: Result<DecryptedMessage, OpenError>,
}

/// End-to-end mail operations against one backend.
#[derive(Clone)]
pub struct Mailbox {
    kem: KemApiClient,
    relay: RelayClient,
}

impl Mailbox {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            kem: KemApiClient::new(config.clone()),
            relay: RelayClient::new(config),
        }
    }

    /// Seals `subject` and `body` for `recipient` and posts the message.
    ///
    /// A directory miss surfaces as `RecipientUnknown` before any
    /// cryptographic work happens.
    pub async fn send<R: CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> ClientResult<()> {
        let record = self.kem.lookup_recipient(recipient).await?;

        let subject = seal(&self.kem, rng, subject, &record.public_key).await?;
        let body = seal(&self.kem, rng, body, &record.public_key).await?;

        self.relay
            .send(&OutboundMessage {
                recipient: recipient.to_string(),
                sender: sender.to_string(),
                subject,
                body,
            })
            .await
    }

    /// Fetches and opens the inbox for `identifier`.
    pub async fn read_inbox(
        &self,
        identifier: &str,
        private_key: &str,
    ) -> ClientResult<Vec<InboxEntry>> {
        let stored = self.relay.fetch_inbox(identifier).await?;

        let mut entries = Vec::with_capacity(stored.len());
        for message in stored {
            entries.push(self.open_message(message, private_key).await);
        }
        Ok(entries)
    }

    async fn open_message(&self, message: StoredMessage, private_key: &str) -> InboxEntry {
        let StoredMessage {
            sender,
            sender_name,
            sent_at,
            subject,
            body,
        } = message;

        let outcome = match open(&self.kem, &subject, private_key).await {
            Ok(subject) => match open(&self.kem, &body, private_key).await {
                Ok(body) => Ok(DecryptedMessage { subject, body }),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        if outcome.is_err() {
            warn!(%sender, "message failed to open; content withheld as unverified");
        }

        InboxEntry {
            sender,
            sender_name,
            sent_at,
            outcome,
        }
    }
}
