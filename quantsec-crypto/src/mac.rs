//! Message authentication over serialized envelope payloads.
//!
//! HMAC-SHA256, keyed by the MAC half of the derived key material.
//! Verification runs in constant time with respect to the tag value;
//! a mismatch is a boolean outcome for the protocol layer to interpret,
//! not an error in itself.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Authentication tag length in bytes (SHA-256 digest).
pub const TAG_SIZE: usize = 32;

/// Computes the HMAC-SHA256 tag over `message`.
pub fn sign(key: &[u8], message: &[u8]) -> [u8; TAG_SIZE] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// Verifies `tag` against `message` in constant time.
///
/// Returns `false` for a wrong-length tag as well as a mismatched one.
pub fn verify(key: &[u8], message: &[u8], tag: &[u8]) -> bool {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(message);
    mac.verify_slice(tag).is_ok()
}
