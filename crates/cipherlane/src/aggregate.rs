//! The encrypted four-lane aggregate.
//!
//! Replacing lane `s` with candidate `c` computes, entirely over ciphertexts:
//!
//! ```text
//! new = (old & !(0xFF << 8s)) | ((c & 0xFF) << 8s)
//! ```
//!
//! The new ciphertext is built completely before it replaces the old one, so a
//! backend failure halfway through leaves the aggregate untouched.

use cipherlane_core::{CheckpointSlot, LANE_COUNT, LANE_MASK};
use cipherlane_fhe::{BackendError, Ciphertext, ConfidentialArithmetic};

/// Population of the aggregate, derived from which slots were ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateState {
    /// No lane written; the aggregate encrypts zero.
    Uninitialized,
    /// One to three lanes written.
    PartiallyPopulated,
    /// All four lanes written.
    FullyPopulated,
}

/// One encrypted 32-bit word made of four byte-wide lanes.
#[derive(Debug, Clone)]
pub struct ConfidentialAggregate {
    value: Ciphertext,
    written: [bool; LANE_COUNT],
}

impl ConfidentialAggregate {
    /// A zero-valued aggregate.
    pub fn zero<B>(backend: &B) -> Result<Self, BackendError>
    where
        B: ConfidentialArithmetic + ?Sized,
    {
        Ok(Self {
            value: backend.trivial_encrypt(0)?,
            written: [false; LANE_COUNT],
        })
    }

    /// The current ciphertext.
    pub fn ciphertext(&self) -> &Ciphertext {
        &self.value
    }

    /// Whether `slot` has ever been written.
    pub fn is_written(&self, slot: CheckpointSlot) -> bool {
        self.written[slot.index() as usize]
    }

    /// Current population state.
    pub fn state(&self) -> AggregateState {
        match self.written.iter().filter(|w| **w).count() {
            0 => AggregateState::Uninitialized,
            LANE_COUNT => AggregateState::FullyPopulated,
            _ => AggregateState::PartiallyPopulated,
        }
    }

    /// Compute the aggregate with lane `slot` replaced by the low byte of
    /// `candidate`, without modifying `self`.
    pub fn compose_lane<B>(
        &self,
        backend: &B,
        slot: CheckpointSlot,
        candidate: &Ciphertext,
    ) -> Result<Ciphertext, BackendError>
    where
        B: ConfidentialArithmetic + ?Sized,
    {
        let low_byte = backend.trivial_encrypt(LANE_MASK)?;
        let truncated = backend.and(candidate, &low_byte)?;
        let placed = backend.shl(&truncated, slot.shift())?;

        let keep = backend.trivial_encrypt(!slot.lane_mask())?;
        let cleared = backend.and(&self.value, &keep)?;

        backend.or(&cleared, &placed)
    }

    /// Replace lane `slot` with the low byte of `candidate`.
    ///
    /// On error the aggregate is unchanged.
    pub fn replace_lane<B>(
        &mut self,
        backend: &B,
        slot: CheckpointSlot,
        candidate: &Ciphertext,
    ) -> Result<(), BackendError>
    where
        B: ConfidentialArithmetic + ?Sized,
    {
        let next = self.compose_lane(backend, slot, candidate)?;
        self.value = next;
        self.written[slot.index() as usize] = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlane_fhe::ShadowBackend;
    use proptest::prelude::*;

    fn slot(i: u8) -> CheckpointSlot {
        CheckpointSlot::new(i).unwrap()
    }

    #[test]
    fn test_zero_aggregate() {
        let backend = ShadowBackend::from_seed([1; 32]);
        let agg = ConfidentialAggregate::zero(&backend).unwrap();

        assert_eq!(backend.decrypt(agg.ciphertext()).unwrap(), 0);
        assert_eq!(agg.state(), AggregateState::Uninitialized);
    }

    #[test]
    fn test_replace_places_lane() {
        let backend = ShadowBackend::from_seed([1; 32]);
        let mut agg = ConfidentialAggregate::zero(&backend).unwrap();

        let c = backend.encrypt(17).unwrap();
        agg.replace_lane(&backend, slot(3), &c).unwrap();

        assert_eq!(backend.decrypt(agg.ciphertext()).unwrap(), 285_212_672);
        assert!(agg.is_written(slot(3)));
        assert!(!agg.is_written(slot(0)));
        assert_eq!(agg.state(), AggregateState::PartiallyPopulated);
    }

    #[test]
    fn test_candidate_truncated_to_low_byte() {
        let backend = ShadowBackend::from_seed([1; 32]);
        let mut agg = ConfidentialAggregate::zero(&backend).unwrap();

        let c = backend.encrypt(0xABCD_EF01).unwrap();
        agg.replace_lane(&backend, slot(1), &c).unwrap();

        assert_eq!(backend.decrypt(agg.ciphertext()).unwrap(), 0x0000_0100);
    }

    #[test]
    fn test_overwrite_leaves_other_lanes() {
        let backend = ShadowBackend::from_seed([1; 32]);
        let mut agg = ConfidentialAggregate::zero(&backend).unwrap();

        for (i, v) in [0x78u32, 0x56, 0x34, 0x12].iter().enumerate() {
            let c = backend.encrypt(*v).unwrap();
            agg.replace_lane(&backend, slot(i as u8), &c).unwrap();
        }
        assert_eq!(agg.state(), AggregateState::FullyPopulated);
        assert_eq!(backend.decrypt(agg.ciphertext()).unwrap(), 0x1234_5678);

        let c = backend.encrypt(0xFF).unwrap();
        agg.replace_lane(&backend, slot(2), &c).unwrap();
        assert_eq!(backend.decrypt(agg.ciphertext()).unwrap(), 0x12FF_5678);
    }

    #[test]
    fn test_failed_replace_is_atomic() {
        let backend = ShadowBackend::from_seed([1; 32]);
        let other = ShadowBackend::from_seed([2; 32]);
        let mut agg = ConfidentialAggregate::zero(&backend).unwrap();
        let c = backend.encrypt(5).unwrap();
        agg.replace_lane(&backend, slot(0), &c).unwrap();
        let before = agg.ciphertext().clone();

        let foreign = other.encrypt(9).unwrap();
        assert!(agg.replace_lane(&backend, slot(1), &foreign).is_err());

        assert_eq!(agg.ciphertext(), &before);
        assert!(!agg.is_written(slot(1)));
    }

    proptest! {
        #[test]
        fn lane_equals_value_mod_256(s in 0u8..4, v in any::<u32>(), prior in any::<u32>()) {
            let backend = ShadowBackend::from_seed([3; 32]);
            let mut agg = ConfidentialAggregate::zero(&backend).unwrap();
            let p = backend.encrypt(prior).unwrap();
            agg.replace_lane(&backend, slot(s), &p).unwrap();

            let c = backend.encrypt(v).unwrap();
            agg.replace_lane(&backend, slot(s), &c).unwrap();

            let word = backend.decrypt(agg.ciphertext()).unwrap();
            prop_assert_eq!(slot(s).lane_of(word) as u32, v % 256);
            prop_assert_eq!(word & !slot(s).lane_mask(), 0);
        }
    }
}
