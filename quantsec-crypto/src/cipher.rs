//! AES-256-CBC confidentiality transform.
//!
//! Plaintext is padded to the 16-byte block boundary with PKCS#7. The
//! reference implementation padded with spaces and trimmed whitespace on
//! decrypt, which silently corrupts any plaintext ending in whitespace;
//! PKCS#7 round-trips every input exactly.

use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKey;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Cipher block size in bytes; the IV has the same length.
pub const BLOCK_SIZE: usize = 16;

/// Initialization vector length in bytes.
pub const IV_SIZE: usize = BLOCK_SIZE;

/// Encrypts plaintext under `key` and a fresh 16-byte IV.
///
/// The IV must never be reused with the same key; callers source it from
/// a CSPRNG for every message. Output length is always a multiple of the
/// block size (PKCS#7 always appends at least one padding byte).
pub fn encrypt(key: &SymmetricKey, iv: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| CryptoError::Cipher(format!("IV must be {IV_SIZE} bytes, got {}", iv.len())))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypts ciphertext and strips the PKCS#7 padding.
///
/// Fails if the ciphertext length is not a positive multiple of the
/// block size, or if the padding is invalid after decryption. Callers
/// must authenticate the ciphertext before trusting this output.
pub fn decrypt(key: &SymmetricKey, iv: &[u8], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::Cipher(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_SIZE}",
            ciphertext.len()
        )));
    }

    let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| CryptoError::Cipher(format!("IV must be {IV_SIZE} bytes, got {}", iv.len())))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Cipher("invalid padding".to_string()))
}
