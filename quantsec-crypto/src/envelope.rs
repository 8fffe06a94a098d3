//! End-to-end envelope protocol.
//!
//! `seal` turns a plaintext and a recipient public key into a
//! self-describing authenticated envelope; `open` reverses it. The KEM
//! collaborator is an injected boundary (a remote service in
//! production, a test double in tests), and every call sources its salt
//! and IV fresh from the injected CSPRNG.
//!
//! `open` authenticates before it decrypts. The tag is verified over the
//! exact transmitted payload bytes, and only a successful verification
//! releases plaintext. Every post-decapsulation failure collapses into a
//! single [`AuthFailure`] so an adversary who controls the envelope
//! bytes cannot distinguish which structural step broke.

use crate::cipher::{self, IV_SIZE};
use crate::codec::{self, EnvelopeParts};
use crate::error::{CryptoError, KemError};
use crate::key::{derive_keys, KdfParams, Salt};
use crate::mac;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::CryptoRng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The transportable authenticated-ciphertext object.
///
/// `tag` is the base64 HMAC-SHA256 tag over the exact bytes of
/// `payload`; `payload` is the JSON blob produced by the
/// [codec](crate::codec).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub tag: String,
    pub payload: String,
}

/// A KEM shared secret. Zeroed on drop, redacted in debug output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

/// Key pair issued by the KEM service, base64-encoded per the service
/// contract. The private key is zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KemKeyPair {
    pub public_key: String,
    pub private_key: String,
}

impl std::fmt::Debug for KemKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KemKeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"..")
            .finish()
    }
}

/// Output of a KEM encapsulation: the wrapped secret travels inside the
/// envelope, the shared secret keys this message and is then discarded.
#[derive(Debug)]
pub struct Encapsulation {
    pub wrapped_secret: Vec<u8>,
    pub shared_secret: SharedSecret,
}

/// External key-encapsulation collaborator.
///
/// Key material crosses this boundary as base64-encoded strings. The
/// production implementation talks to the KEM service over HTTP; tests
/// inject an in-process double.
pub trait Kem {
    /// Generates a fresh key pair.
    fn generate_keypair(&self) -> impl Future<Output = Result<KemKeyPair, KemError>> + Send;

    /// Encapsulates a fresh per-message secret under a public key.
    fn encapsulate(
        &self,
        recipient_public_key: &str,
    ) -> impl Future<Output = Result<Encapsulation, KemError>> + Send;

    /// Recovers the shared secret from a wrapped secret.
    fn decapsulate(
        &self,
        recipient_private_key: &str,
        wrapped_secret: &[u8],
    ) -> impl Future<Output = Result<SharedSecret, KemError>> + Send;
}

/// Stage at which `open` gave up on an envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenStage {
    Deserialize,
    DeriveKeys,
    VerifyTag,
    Decrypt,
}

/// Terminal authentication failure from [`open`].
///
/// Deliberately uniform: the display message never says which structural
/// step failed, so a forged envelope cannot be used as an error oracle.
/// The stage and any attempted plaintext are available as diagnostic
/// accessors only.
#[derive(Clone, Debug, Error)]
#[error("authentication failed: content may be forged or corrupted")]
pub struct AuthFailure {
    stage: OpenStage,
    diagnostic: Option<String>,
}

impl AuthFailure {
    fn new(stage: OpenStage, diagnostic: Option<String>) -> Self {
        Self { stage, diagnostic }
    }

    /// The stage that failed. Diagnostic use only.
    pub fn stage(&self) -> OpenStage {
        self.stage
    }

    /// Best-effort attempted plaintext or error description.
    ///
    /// This content failed verification. It may be forged or corrupted
    /// and must never be displayed, logged, or stored as authentic.
    pub fn unverified_diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }
}

/// Errors from [`seal`].
#[derive(Debug, Error)]
pub enum SealError {
    #[error(transparent)]
    Kem(#[from] KemError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Errors from [`open`].
///
/// KEM collaborator failures surface distinctly; everything that happens
/// after the secret is recovered folds into [`AuthFailure`].
#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Kem(#[from] KemError),
    #[error(transparent)]
    AuthFailure(#[from] AuthFailure),
}

/// Seals `plaintext` for the holder of `recipient_public_key`.
pub async fn seal<K, R>(
    kem: &K,
    rng: &mut R,
    plaintext: &str,
    recipient_public_key: &str,
) -> Result<Envelope, SealError>
where
    K: Kem,
    R: CryptoRng + ?Sized,
{
    seal_with_params(kem, rng, plaintext, recipient_public_key, &KdfParams::default()).await
}

/// [`seal`] with explicit KDF work factors.
///
/// Both parties must use the same parameters; they are not part of the
/// wire format.
pub async fn seal_with_params<K, R>(
    kem: &K,
    rng: &mut R,
    plaintext: &str,
    recipient_public_key: &str,
    params: &KdfParams,
) -> Result<Envelope, SealError>
where
    K: Kem,
    R: CryptoRng + ?Sized,
{
    let Encapsulation {
        wrapped_secret,
        shared_secret,
    } = kem.encapsulate(recipient_public_key).await?;

    let salt = Salt::random(rng);
    let keys = derive_keys(shared_secret.as_bytes(), &salt, params)?;

    let mut iv = [0u8; IV_SIZE];
    rng.fill_bytes(&mut iv);

    let cipher_text = cipher::encrypt(keys.encryption(), &iv, plaintext.as_bytes())?;
    let payload = codec::serialize(&EnvelopeParts {
        salt,
        iv,
        cipher_text,
        wrapped_secret,
    })?;
    let tag = mac::sign(keys.mac().as_bytes(), payload.as_bytes());

    Ok(Envelope {
        tag: BASE64.encode(tag),
        payload,
    })
}

/// Opens an envelope, verifying authenticity before trusting anything.
pub async fn open<K: Kem>(
    kem: &K,
    envelope: &Envelope,
    recipient_private_key: &str,
) -> Result<String, OpenError> {
    open_with_params(kem, envelope, recipient_private_key, &KdfParams::default()).await
}

/// [`open`] with explicit KDF work factors (must match the sealer's).
pub async fn open_with_params<K: Kem>(
    kem: &K,
    envelope: &Envelope,
    recipient_private_key: &str,
    params: &KdfParams,
) -> Result<String, OpenError> {
    // Received -> Deserialized
    let parts = codec::deserialize(&envelope.payload)
        .map_err(|e| AuthFailure::new(OpenStage::Deserialize, Some(e.to_string())))?;

    // Deserialized -> SecretRecovered
    let shared_secret = kem
        .decapsulate(recipient_private_key, &parts.wrapped_secret)
        .await?;

    let keys = derive_keys(shared_secret.as_bytes(), &parts.salt, params)
        .map_err(|e| AuthFailure::new(OpenStage::DeriveKeys, Some(e.to_string())))?;

    // SecretRecovered -> Verified | VerifyFailed. The tag covers the
    // exact payload bytes as transmitted, never a re-serialized form.
    let tag_valid = BASE64
        .decode(&envelope.tag)
        .map(|tag| mac::verify(keys.mac().as_bytes(), envelope.payload.as_bytes(), &tag))
        .unwrap_or(false);

    if !tag_valid {
        // Attempted decryption is diagnostic context only; the caller
        // gets it clearly tagged as unverified, never as content.
        let attempted = cipher::decrypt(keys.encryption(), &parts.iv, &parts.cipher_text)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok());
        return Err(AuthFailure::new(OpenStage::VerifyTag, attempted).into());
    }

    // Verified -> Decrypted
    let plaintext = cipher::decrypt(keys.encryption(), &parts.iv, &parts.cipher_text)
        .map_err(|e| AuthFailure::new(OpenStage::Decrypt, Some(e.to_string())))?;

    let plaintext = String::from_utf8(plaintext).map_err(|_| {
        AuthFailure::new(OpenStage::Decrypt, Some("plaintext is not valid UTF-8".to_string()))
    })?;

    Ok(plaintext)
}
