//! The confidential arithmetic capability.

use std::sync::Arc;

use crate::ciphertext::Ciphertext;
use crate::crypto::SealingPublicKey;
use crate::error::Result;
use crate::seal::SealedOutput;

/// Homomorphic operations over encrypted 32-bit words.
///
/// Implementations are synchronous: a call either returns the result or an
/// error, it never suspends. All operations are pure with respect to their
/// inputs; none of them modifies an existing ciphertext.
pub trait ConfidentialArithmetic {
    /// Encrypt a caller-supplied secret word.
    fn encrypt(&self, value: u32) -> Result<Ciphertext>;

    /// Encrypt a public constant so it can take part in homomorphic ops.
    fn trivial_encrypt(&self, value: u32) -> Result<Ciphertext> {
        self.encrypt(value)
    }

    /// Bitwise AND.
    fn and(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext>;

    /// Bitwise OR.
    fn or(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext>;

    /// Logical shift left by a public amount. Bits shifted past bit 31 are
    /// dropped; shifting by 32 or more yields zero.
    fn shl(&self, value: &Ciphertext, bits: u32) -> Result<Ciphertext>;

    /// Re-encrypt `value` so only the holder of `recipient`'s secret can read it.
    fn reseal(&self, value: &Ciphertext, recipient: &SealingPublicKey) -> Result<SealedOutput>;
}

impl<T: ConfidentialArithmetic + ?Sized> ConfidentialArithmetic for Arc<T> {
    fn encrypt(&self, value: u32) -> Result<Ciphertext> {
        (**self).encrypt(value)
    }

    fn trivial_encrypt(&self, value: u32) -> Result<Ciphertext> {
        (**self).trivial_encrypt(value)
    }

    fn and(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        (**self).and(lhs, rhs)
    }

    fn or(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        (**self).or(lhs, rhs)
    }

    fn shl(&self, value: &Ciphertext, bits: u32) -> Result<Ciphertext> {
        (**self).shl(value, bits)
    }

    fn reseal(&self, value: &Ciphertext, recipient: &SealingPublicKey) -> Result<SealedOutput> {
        (**self).reseal(value, recipient)
    }
}
