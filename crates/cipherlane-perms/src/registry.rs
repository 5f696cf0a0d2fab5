//! Slot ownership and the viewer binding.
//!
//! Bindings are fixed when an instance is constructed. Nothing in this module
//! can change them afterwards.

use serde::{Deserialize, Serialize};

use cipherlane_core::{CheckpointSlot, CoreError, Identity, LANE_COUNT};

use crate::error::{PermsError, Result};

/// Number of identities an instance is constructed with.
pub const PARTICIPANT_COUNT: usize = LANE_COUNT + 1;

/// The five construction identities: one viewer, then the writers of slots 0..3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    viewer: Identity,
    writers: [Identity; LANE_COUNT],
}

impl Participants {
    /// Build from a viewer and the writers in slot order.
    ///
    /// Writers must be pairwise distinct, and the viewer must not also be a
    /// writer.
    pub fn new(viewer: Identity, writers: [Identity; LANE_COUNT]) -> Result<Self> {
        for (i, a) in writers.iter().enumerate() {
            if *a == viewer {
                return Err(PermsError::MalformedParticipants(format!(
                    "writer of slot {i} is also the viewer"
                )));
            }
            if let Some(j) = writers[i + 1..].iter().position(|b| b == a) {
                return Err(PermsError::MalformedParticipants(format!(
                    "slots {i} and {} share a writer",
                    i + 1 + j
                )));
            }
        }
        Ok(Self { viewer, writers })
    }

    /// Build from the ordered list `[viewer, writer0, writer1, writer2, writer3]`.
    pub fn from_slice(identities: &[Identity]) -> Result<Self> {
        match identities {
            [viewer, w0, w1, w2, w3] => Self::new(*viewer, [*w0, *w1, *w2, *w3]),
            _ => Err(PermsError::MalformedParticipants(format!(
                "expected {PARTICIPANT_COUNT} identities, got {}",
                identities.len()
            ))),
        }
    }

    /// The ordered list `[viewer, writer0, writer1, writer2, writer3]`.
    pub fn to_list(&self) -> [Identity; PARTICIPANT_COUNT] {
        let [w0, w1, w2, w3] = self.writers;
        [self.viewer, w0, w1, w2, w3]
    }

    /// The viewer identity.
    pub fn viewer(&self) -> &Identity {
        &self.viewer
    }

    /// The writers in slot order.
    pub fn writers(&self) -> &[Identity; LANE_COUNT] {
        &self.writers
    }
}

/// Immutable slot -> writer mapping plus the single viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRegistry {
    participants: Participants,
}

impl AccessRegistry {
    /// Create the registry. The bindings never change afterwards.
    pub fn new(participants: Participants) -> Self {
        Self { participants }
    }

    /// The writer bound to `slot`.
    pub fn writer_of(&self, slot: CheckpointSlot) -> &Identity {
        &self.participants.writers[slot.index() as usize]
    }

    /// The writer bound to a raw slot index.
    pub fn writer_at(&self, index: u8) -> std::result::Result<&Identity, CoreError> {
        CheckpointSlot::new(index).map(|slot| self.writer_of(slot))
    }

    /// Whether `identity` is the writer bound to `slot`.
    pub fn is_writer(&self, identity: &Identity, slot: CheckpointSlot) -> bool {
        self.writer_of(slot) == identity
    }

    /// Whether `identity` is the viewer.
    pub fn is_viewer(&self, identity: &Identity) -> bool {
        self.participants.viewer == *identity
    }

    /// The slot owned by `identity`, if it is a writer.
    pub fn slot_of(&self, identity: &Identity) -> Option<CheckpointSlot> {
        CheckpointSlot::all()
            .into_iter()
            .find(|slot| self.is_writer(identity, *slot))
    }

    /// The construction identities.
    pub fn participants(&self) -> &Participants {
        &self.participants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlane_core::Keypair;

    fn identities() -> Vec<Identity> {
        (0..5u8)
            .map(|i| Keypair::from_seed(&[i + 1; 32]).public_key())
            .collect()
    }

    #[test]
    fn test_registry_bindings() {
        let ids = identities();
        let registry = AccessRegistry::new(Participants::from_slice(&ids).unwrap());

        assert!(registry.is_viewer(&ids[0]));
        for slot in CheckpointSlot::all() {
            let writer = &ids[slot.index() as usize + 1];
            assert_eq!(registry.writer_of(slot), writer);
            assert!(registry.is_writer(writer, slot));
            assert!(!registry.is_viewer(writer));
            assert_eq!(registry.slot_of(writer), Some(slot));
        }
        assert!(!registry.is_writer(&ids[0], CheckpointSlot::new(0).unwrap()));
        assert!(!registry.is_writer(&ids[2], CheckpointSlot::new(0).unwrap()));
        assert_eq!(registry.slot_of(&ids[0]), None);
    }

    #[test]
    fn test_writer_at_rejects_bad_slot() {
        let registry = AccessRegistry::new(Participants::from_slice(&identities()).unwrap());
        assert_eq!(registry.writer_at(4), Err(CoreError::InvalidSlot(4)));
        assert!(registry.writer_at(3).is_ok());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let ids = identities();
        assert!(matches!(
            Participants::from_slice(&ids[..4]),
            Err(PermsError::MalformedParticipants(_))
        ));

        let mut six = ids.clone();
        six.push(Keypair::generate().public_key());
        assert!(Participants::from_slice(&six).is_err());
    }

    #[test]
    fn test_duplicate_writer_rejected() {
        let mut ids = identities();
        ids[4] = ids[2];
        let err = Participants::from_slice(&ids).unwrap_err();
        assert_eq!(
            err,
            PermsError::MalformedParticipants("slots 1 and 3 share a writer".into())
        );
    }

    #[test]
    fn test_viewer_as_writer_rejected() {
        let mut ids = identities();
        ids[3] = ids[0];
        assert!(Participants::from_slice(&ids).is_err());
    }

    #[test]
    fn test_list_roundtrip() {
        let ids = identities();
        let participants = Participants::from_slice(&ids).unwrap();
        assert_eq!(participants.to_list().to_vec(), ids);
    }
}
