//! Proptest generators for property-based testing.

use proptest::prelude::*;

use cipherlane_core::{CheckpointSlot, Identity, Keypair, LANE_COUNT};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a valid slot index.
pub fn slot_index() -> impl Strategy<Value = u8> {
    0u8..LANE_COUNT as u8
}

/// Generate an out-of-range slot index.
pub fn invalid_slot_index() -> impl Strategy<Value = u8> {
    LANE_COUNT as u8..=u8::MAX
}

/// Generate a candidate value, biased towards lane boundaries.
pub fn lane_value() -> impl Strategy<Value = u32> {
    prop_oneof![
        0u32..=255,
        256u32..=1024,
        Just(255u32),
        Just(256u32),
        Just(u32::MAX),
        any::<u32>(),
    ]
}

/// One write in a script: `value` submitted to `slot` by its writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedWrite {
    pub slot: u8,
    pub value: u32,
}

impl Arbitrary for ScriptedWrite {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (slot_index(), lane_value())
            .prop_map(|(slot, value)| ScriptedWrite { slot, value })
            .boxed()
    }
}

/// Generate a script of up to `max_len` writes.
pub fn write_script(max_len: usize) -> impl Strategy<Value = Vec<ScriptedWrite>> {
    prop::collection::vec(any::<ScriptedWrite>(), 0..=max_len)
}

/// Plaintext model: the aggregate after applying `script` to a zero word.
///
/// Each lane holds the low byte of the last write to its slot.
pub fn expected_aggregate(script: &[ScriptedWrite]) -> u32 {
    let mut lanes = [0u8; LANE_COUNT];
    for write in script {
        lanes[write.slot as usize] = (write.value & 0xFF) as u8;
    }
    CheckpointSlot::all()
        .iter()
        .fold(0u32, |acc, slot| acc | (lanes[slot.index() as usize] as u32) << slot.shift())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_last_write_wins() {
        let script = [
            ScriptedWrite { slot: 3, value: 17 },
            ScriptedWrite { slot: 0, value: 1 },
            ScriptedWrite { slot: 3, value: 273 },
        ];
        assert_eq!(expected_aggregate(&script), 285_212_673);
    }

    proptest! {
        #[test]
        fn model_ignores_cross_slot_order(a in any::<ScriptedWrite>(), b in any::<ScriptedWrite>()) {
            prop_assume!(a.slot != b.slot);
            prop_assert_eq!(expected_aggregate(&[a, b]), expected_aggregate(&[b, a]));
        }
    }
}
