//! Envelope payload codec.
//!
//! Serializes `{salt, cipher_text, iv, wrapped_secret}` into a single
//! transport-safe JSON string with base64-encoded binary fields, and
//! parses it back. The serialized string is what gets signed, so the
//! codec never re-canonicalizes: the authentication tag always covers
//! the exact transmitted bytes.
//!
//! Unknown extra fields in an incoming payload are ignored, matching the
//! reference behavior; missing or undecodable fields are rejected.

use crate::cipher::{BLOCK_SIZE, IV_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{Salt, SALT_SIZE};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Decoded contents of an envelope payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvelopeParts {
    pub salt: Salt,
    pub iv: [u8; IV_SIZE],
    pub cipher_text: Vec<u8>,
    pub wrapped_secret: Vec<u8>,
}

/// On-the-wire field layout. All binary values are base64.
#[derive(Serialize, Deserialize)]
struct WireBlob {
    salt: String,
    cipher_text: String,
    iv: String,
    wrapped_secret: String,
}

/// Serializes envelope parts into the JSON payload string.
pub fn serialize(parts: &EnvelopeParts) -> CryptoResult<String> {
    let blob = WireBlob {
        salt: BASE64.encode(parts.salt.as_bytes()),
        cipher_text: BASE64.encode(&parts.cipher_text),
        iv: BASE64.encode(parts.iv),
        wrapped_secret: BASE64.encode(&parts.wrapped_secret),
    };
    serde_json::to_string(&blob).map_err(|e| CryptoError::MalformedEnvelope(e.to_string()))
}

/// Parses a JSON payload string back into envelope parts.
///
/// Validates field lengths here so later stages can assume well-formed
/// shapes: 16-byte salt and IV, block-aligned non-empty ciphertext.
pub fn deserialize(payload: &str) -> CryptoResult<EnvelopeParts> {
    let blob: WireBlob = serde_json::from_str(payload)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("unparseable payload: {e}")))?;

    let salt = decode_fixed::<SALT_SIZE>("salt", &blob.salt)?;
    let iv = decode_fixed::<IV_SIZE>("iv", &blob.iv)?;
    let cipher_text = decode_field("cipher_text", &blob.cipher_text)?;
    let wrapped_secret = decode_field("wrapped_secret", &blob.wrapped_secret)?;

    if cipher_text.is_empty() || cipher_text.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::MalformedEnvelope(format!(
            "cipher_text length {} is not a positive multiple of {BLOCK_SIZE}",
            cipher_text.len()
        )));
    }

    Ok(EnvelopeParts {
        salt: Salt::from_bytes(salt),
        iv,
        cipher_text,
        wrapped_secret,
    })
}

fn decode_field(name: &str, value: &str) -> CryptoResult<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("field {name}: invalid base64: {e}")))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> CryptoResult<[u8; N]> {
    let bytes = decode_field(name, value)?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        CryptoError::MalformedEnvelope(format!("field {name}: expected {N} bytes, got {}", v.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> EnvelopeParts {
        EnvelopeParts {
            salt: Salt::from_bytes([1u8; SALT_SIZE]),
            iv: [2u8; IV_SIZE],
            cipher_text: vec![3u8; 32],
            wrapped_secret: vec![4u8; 768],
        }
    }

    #[test]
    fn round_trip_exact() {
        let parts = sample();
        let payload = serialize(&parts).unwrap();
        assert_eq!(deserialize(&payload).unwrap(), parts);
    }

    #[test]
    fn payload_is_plain_text() {
        let payload = serialize(&sample()).unwrap();
        assert!(payload.is_ascii());
        assert!(!payload.chars().any(char::is_control));
    }

    #[test]
    fn missing_field_rejected() {
        let payload = r#"{"salt":"AAAAAAAAAAAAAAAAAAAAAA==","iv":"AAAAAAAAAAAAAAAAAAAAAA=="}"#;
        assert!(matches!(
            deserialize(payload),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn invalid_base64_rejected() {
        let mut payload = serialize(&sample()).unwrap();
        payload = payload.replace(&BASE64.encode([2u8; IV_SIZE]), "!!not-base64!!");
        assert!(matches!(
            deserialize(&payload),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn non_json_rejected() {
        assert!(matches!(
            deserialize("salt=abc&iv=def"),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn wrong_salt_length_rejected() {
        let payload = format!(
            r#"{{"salt":"{}","cipher_text":"{}","iv":"{}","wrapped_secret":"{}"}}"#,
            BASE64.encode([0u8; 8]),
            BASE64.encode([0u8; 16]),
            BASE64.encode([0u8; IV_SIZE]),
            BASE64.encode([0u8; 4]),
        );
        assert!(matches!(
            deserialize(&payload),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn unaligned_cipher_text_rejected() {
        let payload = format!(
            r#"{{"salt":"{}","cipher_text":"{}","iv":"{}","wrapped_secret":"{}"}}"#,
            BASE64.encode([0u8; SALT_SIZE]),
            BASE64.encode([0u8; 17]),
            BASE64.encode([0u8; IV_SIZE]),
            BASE64.encode([0u8; 4]),
        );
        assert!(matches!(
            deserialize(&payload),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn extra_fields_ignored() {
        let parts = sample();
        let payload = serialize(&parts).unwrap();
        let extended = payload.replacen('{', r#"{"version":2,"#, 1);
        assert_eq!(deserialize(&extended).unwrap(), parts);
    }

    #[test]
    fn empty_wrapped_secret_allowed() {
        // The codec does not interpret KEM output; length policy for the
        // wrapped secret belongs to the KEM boundary.
        let mut parts = sample();
        parts.wrapped_secret.clear();
        let payload = serialize(&parts).unwrap();
        assert_eq!(deserialize(&payload).unwrap(), parts);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn serialize_deserialize_round_trips(
                salt in proptest::array::uniform16(any::<u8>()),
                iv in proptest::array::uniform16(any::<u8>()),
                blocks in 1usize..8,
                ct_byte in any::<u8>(),
                wrapped in proptest::collection::vec(any::<u8>(), 0..1024),
            ) {
                let parts = EnvelopeParts {
                    salt: Salt::from_bytes(salt),
                    iv,
                    cipher_text: vec![ct_byte; blocks * BLOCK_SIZE],
                    wrapped_secret: wrapped,
                };
                let payload = serialize(&parts).unwrap();
                prop_assert_eq!(deserialize(&payload).unwrap(), parts);
            }
        }
    }
}
