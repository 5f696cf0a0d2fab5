//! Error types for the aggregator.

use cipherlane_core::CheckpointSlot;
use cipherlane_fhe::BackendError;
use cipherlane_perms::PermsError;
use thiserror::Error;

/// Why an access was refused.
///
/// The two directions report differently: slot ownership is public, so a
/// write denial names the slot, while a read denial says nothing about which
/// check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// The caller is not the writer bound to `slot`.
    #[error("given checkpoint byte {slot} can not be accessed from this identity")]
    Write { slot: CheckpointSlot },

    /// The sealed read was refused.
    #[error("read not permitted")]
    Read,
}

/// Errors returned by [`crate::Aggregator`] operations.
///
/// Every error leaves the instance exactly as it was before the call.
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// Slot index outside 0..=3.
    #[error("invalid checkpoint slot: {0}")]
    InvalidSlot(u8),

    /// Write or read refused.
    #[error("access denied: {0}")]
    AccessDenied(AccessDenied),

    /// The construction identity list was malformed.
    #[error("construction failed: {0}")]
    Construction(#[from] PermsError),

    /// The confidential arithmetic backend failed.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl AggregatorError {
    /// Whether this is a write denial.
    pub fn is_write_denied(&self) -> bool {
        matches!(self, Self::AccessDenied(AccessDenied::Write { .. }))
    }

    /// Whether this is a read denial.
    pub fn is_read_denied(&self) -> bool {
        matches!(self, Self::AccessDenied(AccessDenied::Read))
    }
}

impl From<AccessDenied> for AggregatorError {
    fn from(denied: AccessDenied) -> Self {
        Self::AccessDenied(denied)
    }
}

/// Result type for aggregator operations.
pub type Result<T> = std::result::Result<T, AggregatorError>;
