//! Plaintext-shadow backend.
//!
//! Every ciphertext is an authenticated encryption of a little-endian word
//! under a network key derived from the backend seed. Homomorphic operations
//! open their operands inside the backend, apply the bit operation and
//! encrypt the result under a fresh nonce. Callers outside the backend only
//! ever hold opaque [`Ciphertext`] values.
//!
//! Backends built from the same seed share the network key and can open each
//! other's ciphertexts. Nonces come from a counter hashed with a random
//! per-backend key, so no two backends ever encrypt under the same
//! (key, nonce) pair.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use rand::RngCore;

use crate::backend::ConfidentialArithmetic;
use crate::ciphertext::{Ciphertext, CiphertextFormat};
use crate::crypto::{EncryptionNonce, SealingPublicKey, SymmetricKey};
use crate::error::{BackendError, Result};
use crate::seal::SealedOutput;

const NETWORK_KEY_CONTEXT: &str = "cipherlane-shadow-network-key-v0";
const NONCE_CONTEXT: &str = "cipherlane-shadow-nonce-v0";

/// Stand-in for an FHE host with exact plaintext bit semantics.
pub struct ShadowBackend {
    network_key: SymmetricKey,
    nonce_key: [u8; 32],
    counter: AtomicU64,
}

impl ShadowBackend {
    /// Build a backend from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let mut nonce_key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut nonce_key);
        Self {
            network_key: SymmetricKey::derive(NETWORK_KEY_CONTEXT, &[&seed]),
            nonce_key,
            counter: AtomicU64::new(0),
        }
    }

    /// Open a ciphertext.
    ///
    /// Exposed for test inspection only. The aggregation core never calls it;
    /// it only reseals.
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<u32> {
        self.open(ciphertext)
    }

    /// Number of ciphertexts produced so far.
    pub fn ciphertexts_issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    fn next_nonce(&self) -> EncryptionNonce {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = blake3::Hasher::new_derive_key(NONCE_CONTEXT);
        hasher.update(&self.nonce_key);
        hasher.update(&n.to_le_bytes());
        let digest = hasher.finalize();

        let mut nonce = [0u8; 12];
        nonce.copy_from_slice(&digest.as_bytes()[..12]);
        EncryptionNonce::from_bytes(nonce)
    }

    fn close(&self, word: u32) -> Result<Ciphertext> {
        let nonce = self.next_nonce();
        let body = self.network_key.encrypt(&word.to_le_bytes(), &nonce)?;
        Ok(Ciphertext {
            format: CiphertextFormat::ShadowU32,
            nonce,
            body: Bytes::from(body),
        })
    }

    fn open(&self, ciphertext: &Ciphertext) -> Result<u32> {
        match ciphertext.format {
            CiphertextFormat::ShadowU32 => {}
        }
        let bytes = self.network_key.decrypt(&ciphertext.body, &ciphertext.nonce)?;
        let word: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
            BackendError::MalformedCiphertext(format!("expected 4 bytes, got {}", bytes.len()))
        })?;
        Ok(u32::from_le_bytes(word))
    }
}

impl ConfidentialArithmetic for ShadowBackend {
    fn encrypt(&self, value: u32) -> Result<Ciphertext> {
        self.close(value)
    }

    fn and(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        self.close(self.open(lhs)? & self.open(rhs)?)
    }

    fn or(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        self.close(self.open(lhs)? | self.open(rhs)?)
    }

    fn shl(&self, value: &Ciphertext, bits: u32) -> Result<Ciphertext> {
        self.close(self.open(value)?.checked_shl(bits).unwrap_or(0))
    }

    fn reseal(&self, value: &Ciphertext, recipient: &SealingPublicKey) -> Result<SealedOutput> {
        SealedOutput::seal(self.open(value)?, recipient)
    }
}

impl std::fmt::Debug for ShadowBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowBackend")
            .field("ciphertexts_issued", &self.ciphertexts_issued())
            .finish()
    }
}
