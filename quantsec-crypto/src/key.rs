//! Key derivation from a KEM shared secret.
//!
//! Uses scrypt (memory-hard, N=2^14, r=8, p=1) so that brute-forcing the
//! passkey stays expensive on parallel hardware. Derivation is
//! deterministic in `(passkey, salt, out_len)`: the recipient re-derives
//! the same keys from the transmitted salt rather than receiving them.
//!
//! A single 64-byte scrypt output is split into a 32-byte encryption key
//! and a 32-byte MAC key, so the two keys are domain-separated while both
//! remain recoverable from one shared secret.

use crate::error::{CryptoError, CryptoResult};
use rand::CryptoRng;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Symmetric key length in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Salt length in bytes.
pub const SALT_SIZE: usize = 16;

/// Public random value that diversifies key derivation per message.
///
/// Salts are not secret; they travel in cleartext inside the envelope
/// and exist to defeat precomputation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Generates a fresh random salt from the injected CSPRNG.
    pub fn random<R: CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// A derived symmetric key. Zeroed on drop, never serialized.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

// Keys must never leak through debug output.
impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

/// scrypt work-factor parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost (N = 2^log_n).
    pub log_n: u8,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // N=2^14, r=8, p=1
        Self { log_n: 14, r: 8, p: 1 }
    }
}

/// Encryption and MAC keys derived together from one secret.
pub struct KeyMaterial {
    encryption: SymmetricKey,
    mac: SymmetricKey,
}

impl KeyMaterial {
    pub fn encryption(&self) -> &SymmetricKey {
        &self.encryption
    }

    pub fn mac(&self) -> &SymmetricKey {
        &self.mac
    }
}

/// Derives `out_len` bytes from a passkey and a 16-byte salt.
///
/// Deterministic: identical inputs always yield identical output.
/// Fails on a wrong-length salt or a zero output length.
pub fn derive(passkey: &[u8], salt: &[u8], params: &KdfParams, out_len: usize) -> CryptoResult<Zeroizing<Vec<u8>>> {
    if salt.len() != SALT_SIZE {
        return Err(CryptoError::Derivation(format!(
            "salt must be {SALT_SIZE} bytes, got {}",
            salt.len()
        )));
    }
    if out_len == 0 {
        return Err(CryptoError::Derivation("output length must be positive".to_string()));
    }

    let scrypt_params = scrypt::Params::new(params.log_n, params.r, params.p, out_len)
        .map_err(|e| CryptoError::Derivation(format!("invalid scrypt parameters: {e}")))?;

    let mut out = Zeroizing::new(vec![0u8; out_len]);
    scrypt::scrypt(passkey, salt, &scrypt_params, &mut out)
        .map_err(|e| CryptoError::Derivation(format!("scrypt failed: {e}")))?;

    Ok(out)
}

/// Derives the per-message encryption and MAC keys from a shared secret.
///
/// One 64-byte scrypt call, split 32/32. The first half keys the cipher,
/// the second half keys the MAC; the raw encryption key is never reused
/// as the MAC key.
pub fn derive_keys(passkey: &[u8], salt: &Salt, params: &KdfParams) -> CryptoResult<KeyMaterial> {
    let block = derive(passkey, salt.as_bytes(), params, KEY_SIZE * 2)?;

    let mut enc = [0u8; KEY_SIZE];
    let mut mac = [0u8; KEY_SIZE];
    enc.copy_from_slice(&block[..KEY_SIZE]);
    mac.copy_from_slice(&block[KEY_SIZE..]);

    Ok(KeyMaterial {
        encryption: SymmetricKey::from_bytes(enc),
        mac: SymmetricKey::from_bytes(mac),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cheap parameters so the test suite stays fast; production uses
    // KdfParams::default().
    fn test_params() -> KdfParams {
        KdfParams { log_n: 4, r: 8, p: 1 }
    }

    #[test]
    fn derivation_is_deterministic() {
        let salt = [7u8; SALT_SIZE];
        let a = derive(b"test-key", &salt, &test_params(), 32).unwrap();
        let b = derive(b"test-key", &salt, &test_params(), 32).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn one_byte_salt_change_gives_unrelated_output() {
        let mut salt = [7u8; SALT_SIZE];
        let a = derive(b"test-key", &salt, &test_params(), 32).unwrap();
        salt[0] ^= 0x01;
        let b = derive(b"test-key", &salt, &test_params(), 32).unwrap();
        assert_ne!(*a, *b);
        // No shared prefix either
        assert_ne!(a[..8], b[..8]);
    }

    #[test]
    fn wrong_salt_length_rejected() {
        let result = derive(b"pw", &[0u8; 8], &test_params(), 32);
        assert!(matches!(result, Err(CryptoError::Derivation(_))));
    }

    #[test]
    fn zero_output_length_rejected() {
        let result = derive(b"pw", &[0u8; SALT_SIZE], &test_params(), 0);
        assert!(matches!(result, Err(CryptoError::Derivation(_))));
    }

    #[test]
    fn encryption_and_mac_keys_differ() {
        let salt = Salt::from_bytes([1u8; SALT_SIZE]);
        let keys = derive_keys(b"shared-secret", &salt, &test_params()).unwrap();
        assert_ne!(keys.encryption().as_bytes(), keys.mac().as_bytes());
    }

    #[test]
    fn key_material_matches_raw_derivation() {
        let salt = Salt::from_bytes([2u8; SALT_SIZE]);
        let keys = derive_keys(b"shared-secret", &salt, &test_params()).unwrap();
        let block = derive(b"shared-secret", salt.as_bytes(), &test_params(), 64).unwrap();
        assert_eq!(keys.encryption().as_bytes(), &block[..32]);
        assert_eq!(keys.mac().as_bytes(), &block[32..]);
    }

    #[test]
    fn random_salts_do_not_collide() {
        let mut rng = rand::rng();
        let a = Salt::random(&mut rng);
        let b = Salt::random(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn debug_output_never_shows_key_bytes() {
        let key = SymmetricKey::from_bytes([0xAB; KEY_SIZE]);
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("171"));
        assert_eq!(rendered, "SymmetricKey(..)");
    }
}
