//! Envelope core error types.

use thiserror::Error;

/// Result type for envelope core operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors from the envelope building blocks (KDF, cipher, codec).
///
/// These are input-shape errors, not security verdicts. Authentication
/// failures during [`open`](crate::envelope::open) are reported through
/// [`AuthFailure`](crate::envelope::AuthFailure) instead.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("cipher error: {0}")]
    Cipher(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
}

/// Errors from the external KEM collaborator.
///
/// The KEM service is a remote boundary; its failures are surfaced
/// distinctly from authentication failures because they are not
/// attacker-observable oracles over envelope contents.
#[derive(Debug, Error)]
pub enum KemError {
    #[error("KEM service error: {0}")]
    Service(String),

    #[error("malformed key material: {0}")]
    MalformedKey(String),

    #[error("decapsulation failed: {0}")]
    Decapsulation(String),
}
