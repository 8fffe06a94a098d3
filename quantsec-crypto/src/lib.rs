//! Envelope encryption core for QuantSec.
//!
//! Protects message content end-to-end between two parties whose key
//! pairs are issued by an external post-quantum KEM service:
//! - scrypt for key derivation from the per-message shared secret
//! - AES-256-CBC (PKCS#7) for confidentiality
//! - HMAC-SHA256 over the serialized payload for authenticity
//!
//! # Architecture
//!
//! `seal` asks the KEM collaborator to encapsulate a fresh secret under
//! the recipient's public key, derives domain-separated encryption and
//! MAC keys from that secret and a fresh salt, encrypts under a fresh
//! IV, serializes `{salt, iv, cipher_text, wrapped_secret}`, and signs
//! the serialized bytes. `open` reverses this, verifying the tag before
//! any decrypted byte is trusted.
//!
//! Every key, salt, and IV lives for exactly one call. Nothing is cached
//! across messages; secrets are zeroed on drop and never logged.

mod cipher;
mod codec;
mod error;
mod key;
mod mac;
pub mod envelope;

pub use cipher::{decrypt, encrypt, BLOCK_SIZE, IV_SIZE};
pub use codec::{deserialize, serialize, EnvelopeParts};
pub use envelope::{
    open, open_with_params, seal, seal_with_params, AuthFailure, Encapsulation, Envelope, Kem,
    KemKeyPair, OpenError, OpenStage, SealError, SharedSecret,
};
pub use error::{CryptoError, CryptoResult, KemError};
pub use key::{derive, derive_keys, KdfParams, KeyMaterial, Salt, SymmetricKey, KEY_SIZE, SALT_SIZE};
pub use mac::{sign, verify, TAG_SIZE};
