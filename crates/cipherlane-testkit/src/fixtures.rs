//! Test fixtures and helpers.
//!
//! The five parties are derived from fixed seeds, so identities and instance
//! IDs are stable across runs.

use cipherlane::{Aggregator, AggregatorConfig, Result};
use cipherlane_core::{Identity, Keypair};
use cipherlane_fhe::{unseal, ConfidentialArithmetic, SealingSecret, ShadowBackend};
use cipherlane_perms::{GrantConditions, PermissionGrant};

const SIGNING_SEED_CONTEXT: &str = "cipherlane-testkit-signing-seed-v0";
const SEALING_SEED_CONTEXT: &str = "cipherlane-testkit-sealing-seed-v0";

/// One participant: signing key plus sealing key.
pub struct Party {
    pub keypair: Keypair,
    pub sealing: SealingSecret,
}

impl Party {
    /// Deterministic party from a one-byte tag.
    ///
    /// Both secrets are derived from the tag under separate contexts. Raw tag
    /// bytes must not land in the X25519 scalar directly: clamping would fold
    /// neighbouring tags onto the same key.
    pub fn with_tag(tag: u8) -> Self {
        Self {
            keypair: Keypair::from_seed(&blake3::derive_key(SIGNING_SEED_CONTEXT, &[tag])),
            sealing: SealingSecret::from_bytes(blake3::derive_key(SEALING_SEED_CONTEXT, &[tag])),
        }
    }

    /// This party's identity.
    pub fn id(&self) -> Identity {
        self.keypair.public_key()
    }

    /// Issue a grant for `agg`, sealed to this party's key.
    pub fn grant_for<B: ConfidentialArithmetic>(
        &self,
        agg: &Aggregator<B>,
        conditions: GrantConditions,
    ) -> PermissionGrant {
        PermissionGrant::issue(
            *agg.instance_id(),
            &self.keypair,
            self.sealing.public_key(),
            0,
            conditions,
        )
        .expect("grant issuance")
    }
}

/// The viewer and the writers of slots 0..3.
pub struct FiveParty {
    pub viewer: Party,
    pub writers: [Party; 4],
}

impl FiveParty {
    /// The standard fixture.
    pub fn new() -> Self {
        Self {
            viewer: Party::with_tag(0),
            writers: [
                Party::with_tag(1),
                Party::with_tag(2),
                Party::with_tag(3),
                Party::with_tag(4),
            ],
        }
    }

    /// Construction list: `[viewer, writer0, writer1, writer2, writer3]`.
    pub fn ids(&self) -> Vec<Identity> {
        let mut ids = vec![self.viewer.id()];
        ids.extend(self.writers.iter().map(Party::id));
        ids
    }

    /// The fixture configuration: fixed salt, wall clock.
    pub fn config() -> AggregatorConfig {
        AggregatorConfig::with_salt([0x17; 32])
    }

    /// A fresh instance over the shadow backend.
    pub fn aggregator(&self) -> Aggregator<ShadowBackend> {
        self.aggregator_with(Self::config())
    }

    /// A fresh instance with a custom configuration.
    pub fn aggregator_with(&self, config: AggregatorConfig) -> Aggregator<ShadowBackend> {
        Aggregator::new(&self.ids(), ShadowBackend::from_seed([0x42; 32]), config)
            .expect("fixture participants are well formed")
    }

    /// Encrypt `value` and submit it to `slot` as that slot's writer.
    pub fn write(&self, agg: &mut Aggregator<ShadowBackend>, slot: u8, value: u32) -> Result<()> {
        let ct = agg.backend().encrypt(value)?;
        agg.set_lane(&self.writers[slot as usize].id(), slot, &ct)
    }

    /// Perform a sealed read as `party` and unseal the result with its key.
    pub fn read_as(&self, agg: &mut Aggregator<ShadowBackend>, party: &Party) -> Result<u32> {
        let grant = party.grant_for(agg, GrantConditions::none());
        let sealed = agg.get_aggregate(&party.id(), &grant)?;
        Ok(unseal(&sealed, &party.sealing)?)
    }

    /// Sealed read as the viewer.
    pub fn read(&self, agg: &mut Aggregator<ShadowBackend>) -> Result<u32> {
        self.read_as(agg, &self.viewer)
    }
}

impl Default for FiveParty {
    fn default() -> Self {
        Self::new()
    }
}

/// A party that is none of the five.
pub fn stranger(tag: u8) -> Party {
    Party::with_tag(0x80 | tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parties_are_distinct() {
        let parties = FiveParty::new();
        let ids = parties.ids();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(!ids.contains(&stranger(1).id()));
    }

    #[test]
    fn test_sealing_keys_are_distinct() {
        let parties = FiveParty::new();
        let mut keys = vec![parties.viewer.sealing.public_key()];
        keys.extend(parties.writers.iter().map(|w| w.sealing.public_key()));
        keys.extend((0..8).map(|t| stranger(t).sealing.public_key()));

        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_fixture_is_deterministic() {
        let a = FiveParty::new().aggregator();
        let b = FiveParty::new().aggregator();
        assert_eq!(a.instance_id(), b.instance_id());
    }

    #[test]
    fn test_write_then_read() {
        let parties = FiveParty::new();
        let mut agg = parties.aggregator();
        parties.write(&mut agg, 1, 2).unwrap();
        assert_eq!(parties.read(&mut agg).unwrap(), 512);
    }
}
