//! # Cipherlane Permissions
//!
//! Who may write which lane, and who may read the aggregate.
//!
//! ## Key Concepts
//!
//! - **Participants**: the five identities an instance is constructed with,
//!   one viewer followed by the writers of slots 0..3
//! - **AccessRegistry**: the immutable slot -> writer binding plus the viewer
//! - **PermissionGrant**: a signed, one-use statement by a requester that it
//!   wants the aggregate of one specific instance sealed to its key
//! - **PermissionVerifier**: checks grants and remembers which ones were used
//!
//! ## Grant Model
//!
//! A grant is signed by the requester's Ed25519 key over a canonical CBOR
//! body naming the instance, the requester, the X25519 sealing key the result
//! should be sealed to, a random nonce, and optional expiry. The signature
//! binds the sealing key, so nobody can redirect a viewer's grant to a key of
//! their own.
//!
//! ```rust,no_run
//! use cipherlane_core::{InstanceId, Keypair};
//! use cipherlane_fhe::SealingSecret;
//! use cipherlane_perms::{GrantConditions, PermissionGrant};
//!
//! let viewer = Keypair::generate();
//! let sealing = SealingSecret::generate();
//! let instance = InstanceId::from_bytes([0; 32]);
//!
//! let grant = PermissionGrant::issue(
//!     instance,
//!     &viewer,
//!     sealing.public_key(),
//!     1_700_000_000_000,
//!     GrantConditions::expires_at(1_700_000_060_000),
//! )
//! .unwrap();
//! ```

pub mod error;
pub mod grant;
pub mod registry;
pub mod verifier;

pub use error::{PermsError, Result};
pub use grant::{GrantConditions, GrantId, PermissionGrant};
pub use registry::{AccessRegistry, Participants, PARTICIPANT_COUNT};
pub use verifier::PermissionVerifier;
