//! # Cipherlane FHE
//!
//! The confidential arithmetic capability consumed by the aggregation core.
//!
//! ## Overview
//!
//! The core never performs cryptography of its own. Everything it needs from
//! a homomorphic host is expressed by the [`ConfidentialArithmetic`] trait:
//!
//! - **encrypt / trivial_encrypt**: turn a word into a [`Ciphertext`]
//! - **and / or / shl**: bitwise operations evaluated over ciphertexts
//! - **reseal**: re-encrypt a ciphertext so only one recipient can open it
//!
//! ## Sealing Model
//!
//! A [`SealedOutput`] is produced with an ephemeral X25519 key agreement
//! against the recipient's [`SealingPublicKey`], a Blake3-derived wrap key and
//! ChaCha20-Poly1305. Only the holder of the matching [`SealingSecret`] can
//! [`unseal`] it.
//!
//! ## Backends
//!
//! [`ShadowBackend`] performs the same bit operations as a real FHE host over
//! authenticated-encrypted words. It exists so access control and lane
//! composition can be tested without an FHE library.
//!
//! ```rust
//! use cipherlane_fhe::{ConfidentialArithmetic, SealingSecret, ShadowBackend, unseal};
//!
//! let backend = ShadowBackend::from_seed([7; 32]);
//! let a = backend.encrypt(0x1234).unwrap();
//! let mask = backend.trivial_encrypt(0xFF).unwrap();
//! let low = backend.and(&a, &mask).unwrap();
//!
//! let viewer = SealingSecret::generate();
//! let sealed = backend.reseal(&low, &viewer.public_key()).unwrap();
//! assert_eq!(unseal(&sealed, &viewer).unwrap(), 0x34);
//! ```

pub mod backend;
pub mod ciphertext;
pub mod crypto;
pub mod error;
pub mod seal;
pub mod shadow;

pub use backend::ConfidentialArithmetic;
pub use ciphertext::{Ciphertext, CiphertextFormat};
pub use crypto::{EncryptionNonce, SealingPublicKey, SealingSecret, SymmetricKey};
pub use error::{BackendError, Result};
pub use seal::{unseal, SealedOutput};
pub use shadow::ShadowBackend;
