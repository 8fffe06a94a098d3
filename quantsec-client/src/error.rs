//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from the HTTP boundary (KEM service, directory, relay).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Directory lookup miss. Not a cryptographic failure.
    #[error("recipient unknown: {0}")]
    RecipientUnknown(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("KEM error: {0}")]
    Kem(#[from] quantsec_crypto::KemError),

    #[error("seal failed: {0}")]
    Seal(#[from] quantsec_crypto::SealError),
}
