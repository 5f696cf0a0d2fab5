//! Ciphertext envelope.
//!
//! A [`Ciphertext`] is an opaque handle to an encrypted 32-bit word. The core
//! stores and forwards it but never interprets `body`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::EncryptionNonce;
use crate::error::{BackendError, Result};

/// Format identifier for ciphertexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CiphertextFormat {
    /// A 32-bit word under the shadow backend's ChaCha20-Poly1305 network key.
    ShadowU32 = 1,
}

/// An encrypted 32-bit word.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    /// Which backend scheme produced this ciphertext.
    pub format: CiphertextFormat,

    /// Nonce used for this encryption (unique per ciphertext).
    pub nonce: EncryptionNonce,

    /// Backend-specific encrypted body.
    pub body: Bytes,
}

impl Ciphertext {
    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| BackendError::SerializationError(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| BackendError::SerializationError(e.to_string()))
    }
}

// Bodies are opaque; keep them out of logs.
impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ciphertext")
            .field("format", &self.format)
            .field("body_len", &self.body.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ciphertext_serialization() {
        let ct = Ciphertext {
            format: CiphertextFormat::ShadowU32,
            nonce: EncryptionNonce::from_bytes([3; 12]),
            body: Bytes::from_static(&[1, 2, 3, 4, 5]),
        };

        let recovered = Ciphertext::from_bytes(&ct.to_bytes().unwrap()).unwrap();
        assert_eq!(ct, recovered);
    }

    #[test]
    fn test_debug_hides_body() {
        let ct = Ciphertext {
            format: CiphertextFormat::ShadowU32,
            nonce: EncryptionNonce::from_bytes([0; 12]),
            body: Bytes::from_static(&[0xde, 0xad]),
        };
        let debug = format!("{:?}", ct);
        assert!(debug.contains("body_len: 2"));
        assert!(!debug.contains("222"));
    }
}
