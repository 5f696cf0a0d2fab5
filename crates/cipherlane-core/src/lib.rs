//! # Cipherlane Core
//!
//! Pure primitives shared by every Cipherlane crate: participant identities,
//! checkpoint slots, instance identifiers and canonical encoding.
//!
//! This crate contains no I/O and no confidential arithmetic. It is pure
//! computation over identifiers and signatures.
//!
//! ## Key Types
//!
//! - [`Ed25519PublicKey`] - A participant identity (writer or viewer)
//! - [`Keypair`] - Signing capability behind an identity
//! - [`CheckpointSlot`] - One of the four byte-wide lanes of an aggregate
//! - [`InstanceId`] - Identifier of one aggregation instance, used to bind grants
//!
//! ## Canonicalization
//!
//! Signed structures are encoded with deterministic CBOR. See [`canonical`].

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod types;

pub use canonical::canonical_encode;
pub use crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature, Identity, Keypair};
pub use error::{CoreError, Result};
pub use types::{CheckpointSlot, InstanceId, LANE_BITS, LANE_COUNT, LANE_MASK};
