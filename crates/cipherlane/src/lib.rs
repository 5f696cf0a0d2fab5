//! # Cipherlane
//!
//! Confidential multi-party aggregation: four writers each contribute a secret
//! byte to one encrypted 32-bit word, and a single viewer may obtain that word
//! sealed to its own key.
//!
//! ## Overview
//!
//! - **Lanes**: slot `i` owns bits `[8i, 8i + 8)` of the aggregate
//! - **Writers**: each slot is bound to exactly one identity at construction
//! - **Composition**: writes are masked to 8 bits and merged into the
//!   aggregate with homomorphic AND/OR/shift; the core never sees plaintext
//! - **Sealed reads**: the viewer presents a signed, one-use grant and
//!   receives the aggregate resealed to its key
//! - **Notifications**: every accepted write publishes (writer, slot), never
//!   the value
//!
//! ## Usage
//!
//! ```rust
//! use cipherlane::{Aggregator, AggregatorConfig};
//! use cipherlane::core::Keypair;
//! use cipherlane::fhe::{unseal, ConfidentialArithmetic, SealingSecret, ShadowBackend};
//! use cipherlane::perms::{GrantConditions, PermissionGrant};
//!
//! let viewer = Keypair::from_seed(&[0; 32]);
//! let writers: Vec<Keypair> = (1..=4u8).map(|i| Keypair::from_seed(&[i; 32])).collect();
//!
//! let mut ids = vec![viewer.public_key()];
//! ids.extend(writers.iter().map(|w| w.public_key()));
//!
//! let backend = ShadowBackend::from_seed([42; 32]);
//! let mut agg = Aggregator::new(&ids, backend, AggregatorConfig::default()).unwrap();
//!
//! let secret = agg.backend().encrypt(100).unwrap();
//! agg.set_lane(&writers[0].public_key(), 0, &secret).unwrap();
//!
//! let sealing = SealingSecret::generate();
//! let grant = PermissionGrant::issue(
//!     *agg.instance_id(),
//!     &viewer,
//!     sealing.public_key(),
//!     0,
//!     GrantConditions::none(),
//! )
//! .unwrap();
//! let sealed = agg.get_aggregate(&viewer.public_key(), &grant).unwrap();
//! assert_eq!(unseal(&sealed, &sealing).unwrap(), 100);
//! ```
//!
//! ## Re-exports
//!
//! - `cipherlane::core` - identities, slots, instance ids
//! - `cipherlane::fhe` - the confidential arithmetic capability and sealing
//! - `cipherlane::perms` - registry, grants, verification

pub mod aggregate;
pub mod aggregator;
pub mod error;
pub mod events;

pub use cipherlane_core as core;
pub use cipherlane_fhe as fhe;
pub use cipherlane_perms as perms;

pub use aggregate::{AggregateState, ConfidentialAggregate};
pub use aggregator::{Aggregator, AggregatorConfig};
pub use error::{AccessDenied, AggregatorError, Result};
pub use events::{EventNotifier, RequirementUpdated};

pub use cipherlane_core::{CheckpointSlot, Identity, InstanceId, Keypair};
pub use cipherlane_fhe::{Ciphertext, ConfidentialArithmetic, SealedOutput};
pub use cipherlane_perms::{AccessRegistry, GrantConditions, Participants, PermissionGrant};
