//! HTTP boundary for QuantSec.
//!
//! The envelope core in `quantsec-crypto` is pure; everything that
//! touches the network lives here:
//!
//! - [`KemApiClient`] — the remote KEM service (key generation,
//!   encapsulation, decapsulation) and the recipient directory.
//! - [`RelayClient`] — the store-and-forward message relay; it only
//!   ever sees sealed envelopes.
//! - [`Mailbox`] — the composed send/read flows a frontend drives.

pub mod api_client;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod relay;
pub mod types;

pub use api_client::KemApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use mailbox::{DecryptedMessage, InboxEntry, Mailbox};
pub use relay::RelayClient;
pub use types::{ApiStatus, OutboundMessage, RecipientRecord, StoredMessage};
