//! Property tests: the encrypted aggregate tracks the plaintext model.

use proptest::prelude::*;

use cipherlane::AggregateState;
use cipherlane_fhe::ConfidentialArithmetic;
use cipherlane_testkit::generators::{identity, invalid_slot_index, lane_value, slot_index};
use cipherlane_testkit::{expected_aggregate, write_script, FiveParty, ScriptedWrite};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn aggregate_matches_model(script in write_script(12)) {
        let parties = FiveParty::new();
        let mut agg = parties.aggregator();
        for w in &script {
            parties.write(&mut agg, w.slot, w.value).unwrap();
        }

        prop_assert_eq!(parties.read(&mut agg).unwrap(), expected_aggregate(&script));
        prop_assert_eq!(agg.events().len(), script.len());
    }

    #[test]
    fn single_write_lands_in_its_lane(slot in slot_index(), value in lane_value()) {
        let parties = FiveParty::new();
        let mut agg = parties.aggregator();
        parties.write(&mut agg, slot, value).unwrap();

        let word = parties.read(&mut agg).unwrap();
        prop_assert_eq!(word, (value % 256) << (8 * slot as u32));
        prop_assert_eq!(agg.state(), AggregateState::PartiallyPopulated);
    }

    #[test]
    fn writes_to_distinct_slots_commute(
        a in any::<ScriptedWrite>(),
        b in any::<ScriptedWrite>(),
    ) {
        prop_assume!(a.slot != b.slot);
        let parties = FiveParty::new();

        let mut ab = parties.aggregator();
        parties.write(&mut ab, a.slot, a.value).unwrap();
        parties.write(&mut ab, b.slot, b.value).unwrap();

        let mut ba = parties.aggregator();
        parties.write(&mut ba, b.slot, b.value).unwrap();
        parties.write(&mut ba, a.slot, a.value).unwrap();

        prop_assert_eq!(parties.read(&mut ab).unwrap(), parties.read(&mut ba).unwrap());
    }

    #[test]
    fn denied_writes_leave_no_trace(
        script in write_script(6),
        slot in slot_index(),
        intruder in 0usize..4,
        value in lane_value(),
    ) {
        prop_assume!(intruder != slot as usize);
        let parties = FiveParty::new();
        let mut agg = parties.aggregator();
        for w in &script {
            parties.write(&mut agg, w.slot, w.value).unwrap();
        }
        let before = agg.aggregate().clone();
        let events = agg.events().len();

        let ct = agg.backend().encrypt(value).unwrap();
        let err = agg.set_lane(&parties.writers[intruder].id(), slot, &ct).unwrap_err();

        prop_assert!(err.is_write_denied());
        prop_assert_eq!(agg.aggregate(), &before);
        prop_assert_eq!(agg.events().len(), events);
        prop_assert_eq!(parties.read(&mut agg).unwrap(), expected_aggregate(&script));
    }

    #[test]
    fn out_of_range_slots_rejected(slot in invalid_slot_index(), value in lane_value()) {
        let parties = FiveParty::new();
        let mut agg = parties.aggregator();
        let ct = agg.backend().encrypt(value).unwrap();

        let err = agg.set_lane(&parties.writers[0].id(), slot, &ct).unwrap_err();
        prop_assert!(matches!(err, cipherlane::AggregatorError::InvalidSlot(s) if s == slot));
        prop_assert_eq!(agg.state(), AggregateState::Uninitialized);
    }

    #[test]
    fn arbitrary_identities_cannot_write(
        caller in identity(),
        slot in slot_index(),
        value in lane_value(),
    ) {
        let parties = FiveParty::new();
        let mut agg = parties.aggregator();
        prop_assume!(caller != parties.writers[slot as usize].id());
        let ct = agg.backend().encrypt(value).unwrap();

        let err = agg.set_lane(&caller, slot, &ct).unwrap_err();
        prop_assert!(err.is_write_denied());
        prop_assert!(agg.events().is_empty());
        prop_assert_eq!(parties.read(&mut agg).unwrap(), 0);
    }
}
