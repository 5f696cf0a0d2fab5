//! Strong type definitions for Cipherlane.
//!
//! Slot indices and instance identifiers are newtypes so that a raw `u8` or a
//! stray hash can never be passed where a validated value is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::Ed25519PublicKey;
use crate::error::CoreError;

/// Number of lanes (checkpoint slots) in an aggregate.
pub const LANE_COUNT: usize = 4;

/// Width of a single lane in bits.
pub const LANE_BITS: u32 = 8;

/// Mask selecting the low lane of a word.
pub const LANE_MASK: u32 = 0xFF;

/// One of the four checkpoint slots of an aggregate.
///
/// Slot `i` owns bits `[8i, 8i + 8)` of the 32-bit aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CheckpointSlot(u8);

impl CheckpointSlot {
    /// Validate a raw slot index.
    pub fn new(index: u8) -> Result<Self, CoreError> {
        if (index as usize) < LANE_COUNT {
            Ok(Self(index))
        } else {
            Err(CoreError::InvalidSlot(index))
        }
    }

    /// All slots in index order.
    pub fn all() -> [CheckpointSlot; LANE_COUNT] {
        [Self(0), Self(1), Self(2), Self(3)]
    }

    /// The raw index.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Bit offset of this slot's lane within the aggregate.
    pub const fn shift(self) -> u32 {
        self.0 as u32 * LANE_BITS
    }

    /// Mask covering this slot's lane within the aggregate.
    pub const fn lane_mask(self) -> u32 {
        LANE_MASK << self.shift()
    }

    /// Extract this slot's lane from a plaintext aggregate word.
    pub const fn lane_of(self, word: u32) -> u8 {
        ((word >> self.shift()) & LANE_MASK) as u8
    }
}

impl TryFrom<u8> for CheckpointSlot {
    type Error = CoreError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<CheckpointSlot> for u8 {
    fn from(slot: CheckpointSlot) -> Self {
        slot.0
    }
}

impl fmt::Display for CheckpointSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 32-byte identifier of one aggregation instance.
///
/// Permission grants name the instance they were issued for, so a grant for
/// one instance is useless against another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub [u8; 32]);

impl InstanceId {
    /// Derive an instance ID from the ordered participant list and a salt.
    pub fn derive(participants: &[Ed25519PublicKey], salt: &[u8; 32]) -> Self {
        let mut hasher = blake3::Hasher::new_derive_key("cipherlane-instance-v0");
        hasher.update(&(participants.len() as u64).to_le_bytes());
        for identity in participants {
            hasher.update(identity.as_bytes());
        }
        hasher.update(salt);
        Self(*hasher.finalize().as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slot_bounds() {
        for i in 0..4u8 {
            assert_eq!(CheckpointSlot::new(i).unwrap().index(), i);
        }
        assert_eq!(CheckpointSlot::new(4), Err(CoreError::InvalidSlot(4)));
        assert_eq!(CheckpointSlot::new(255), Err(CoreError::InvalidSlot(255)));
    }

    #[test]
    fn test_slot_geometry() {
        let slot = CheckpointSlot::new(3).unwrap();
        assert_eq!(slot.shift(), 24);
        assert_eq!(slot.lane_mask(), 0xFF00_0000);
        assert_eq!(slot.lane_of(0x1234_5678), 0x12);
    }

    #[test]
    fn test_slot_serde_rejects_out_of_range() {
        let mut buf = Vec::new();
        ciborium::into_writer(&7u8, &mut buf).unwrap();
        assert!(ciborium::from_reader::<CheckpointSlot, _>(buf.as_slice()).is_err());
    }

    #[test]
    fn test_instance_id_depends_on_salt_and_order() {
        let a = Ed25519PublicKey::from_bytes([1; 32]);
        let b = Ed25519PublicKey::from_bytes([2; 32]);

        let base = InstanceId::derive(&[a, b], &[0; 32]);
        assert_eq!(base, InstanceId::derive(&[a, b], &[0; 32]));
        assert_ne!(base, InstanceId::derive(&[a, b], &[1; 32]));
        assert_ne!(base, InstanceId::derive(&[b, a], &[0; 32]));
    }

    proptest! {
        #[test]
        fn lane_masks_partition_the_word(word in any::<u32>()) {
            let rebuilt = CheckpointSlot::all()
                .iter()
                .fold(0u32, |acc, slot| acc | ((slot.lane_of(word) as u32) << slot.shift()));
            prop_assert_eq!(rebuilt, word);
        }
    }
}
