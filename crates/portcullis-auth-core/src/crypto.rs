//! Session signing key
//!
//! HMAC-SHA256 over the encoded cookie payload. Signatures are compared in
//! constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Validated HMAC key shared by every codec clone.
#[derive(Clone)]
pub struct HmacKey {
    key_bytes: Arc<[u8]>,
}

impl HmacKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Create a new HMAC key from bytes.
    ///
    /// # Errors
    /// Returns error if key is too short (less than 32 bytes).
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, HmacKeyError> {
        let key_bytes = key.as_ref();
        if key_bytes.len() < Self::MIN_KEY_LENGTH {
            return Err(HmacKeyError::KeyTooShort {
                actual: key_bytes.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            key_bytes: Arc::from(key_bytes),
        })
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length; `new` only enforces our minimum.
        match HmacSha256::new_from_slice(&self.key_bytes) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC-SHA256 accepts any key length"),
        }
    }

    /// Sign data and return the MAC bytes
    pub fn sign(&self, data: &[u8]) -> [u8; 32] {
        let mut mac = self.mac();
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Verify a signature in constant time
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        constant_time_eq(&self.sign(data), signature)
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating an HMAC key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HmacKeyError {
    #[error("HMAC key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}

/// Constant-time byte slice comparison (length is not secret).
#[inline]
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello world", b"hello world"));
        assert!(!constant_time_eq(b"hello world", b"hello worle"));
        assert!(!constant_time_eq(b"hello", b"hello world"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_hmac_key_too_short() {
        let result = HmacKey::new("short");
        assert!(matches!(
            result,
            Err(HmacKeyError::KeyTooShort {
                actual: 5,
                minimum: 32
            })
        ));
        assert!(HmacKey::new("a".repeat(31)).is_err());
        assert!(HmacKey::new("a".repeat(32)).is_ok());
    }

    #[test]
    fn test_hmac_sign_verify() {
        let key = HmacKey::new("k".repeat(32)).unwrap();
        let data = b"payload";
        let signature = key.sign(data);
        assert!(key.verify(data, &signature));
        assert!(!key.verify(b"other payload", &signature));
        assert!(!key.verify(data, &signature[..31]));
    }

    #[test]
    fn test_different_keys_disagree() {
        let a = HmacKey::new("a".repeat(32)).unwrap();
        let b = HmacKey::new("b".repeat(32)).unwrap();
        assert!(!b.verify(b"data", &a.sign(b"data")));
    }

    #[test]
    fn test_debug_hides_key() {
        let key = HmacKey::new("s".repeat(40)).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("key_length: 40"));
        assert!(!debug.contains("ssss"));
    }
}
