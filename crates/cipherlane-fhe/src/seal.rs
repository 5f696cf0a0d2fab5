//! Sealing a word for a single recipient.
//!
//! The sealer generates an ephemeral X25519 key, agrees a secret with the
//! recipient's [`SealingPublicKey`], derives a wrap key bound to both public
//! keys and encrypts the 4-byte word with ChaCha20-Poly1305.

use serde::{Deserialize, Serialize};

use crate::crypto::{EncryptionNonce, EphemeralKeyPair, SealingPublicKey, SealingSecret, SymmetricKey};
use crate::error::{BackendError, Result};

const SEAL_CONTEXT: &str = "cipherlane-seal-v0";

/// A word sealed for exactly one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedOutput {
    /// Ephemeral X25519 public key (sealer's side of ECDH).
    pub ephemeral_public: SealingPublicKey,

    /// Nonce used for encryption.
    pub nonce: EncryptionNonce,

    /// The encrypted word, including the authentication tag.
    pub ciphertext: Vec<u8>,
}

impl SealedOutput {
    /// Seal `word` so only the holder of `recipient`'s secret can open it.
    pub fn seal(word: u32, recipient: &SealingPublicKey) -> Result<Self> {
        let ephemeral = EphemeralKeyPair::generate();
        let ephemeral_public = ephemeral.public_key();
        let shared = ephemeral.diffie_hellman(recipient);

        let wrap_key = wrap_key(&shared, &ephemeral_public, recipient);
        let nonce = EncryptionNonce::generate();
        let ciphertext = wrap_key.encrypt(&word.to_le_bytes(), &nonce)?;

        Ok(Self {
            ephemeral_public,
            nonce,
            ciphertext,
        })
    }

    /// Open the sealed word with the recipient's secret.
    pub fn unseal(&self, recipient_secret: &SealingSecret) -> Result<u32> {
        let shared = recipient_secret.diffie_hellman(&self.ephemeral_public);
        let wrap_key = wrap_key(&shared, &self.ephemeral_public, &recipient_secret.public_key());

        let bytes = wrap_key
            .decrypt(&self.ciphertext, &self.nonce)
            .map_err(|_| BackendError::UnsealError("not sealed for this recipient".into()))?;

        let word: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
            BackendError::UnsealError(format!("expected 4 bytes, got {}", bytes.len()))
        })?;
        Ok(u32::from_le_bytes(word))
    }

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

/// Recipient-side unseal, the counterpart of a backend's `reseal`.
pub fn unseal(sealed: &SealedOutput, recipient_secret: &SealingSecret) -> Result<u32> {
    sealed.unseal(recipient_secret)
}

fn wrap_key(
    shared: &[u8; 32],
    ephemeral_public: &SealingPublicKey,
    recipient: &SealingPublicKey,
) -> SymmetricKey {
    SymmetricKey::derive(
        SEAL_CONTEXT,
        &[shared, ephemeral_public.as_bytes(), recipient.as_bytes()],
    )
}
