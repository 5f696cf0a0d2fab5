//! Error types for the permissions module.

use thiserror::Error;

/// Errors that can occur during registry construction or grant verification.
///
/// Grant rejection reasons are kept distinct here; callers that must not leak
/// them collapse every rejection into one generic denial.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermsError {
    /// The participant list is not exactly one viewer plus four distinct writers.
    #[error("malformed participant list: {0}")]
    MalformedParticipants(String),

    /// Grant signature does not verify against its requester.
    #[error("grant signature is invalid")]
    InvalidSignature,

    /// Grant names a different instance.
    #[error("grant was issued for another instance")]
    WrongInstance,

    /// Grant names a different requester than the one presenting it.
    #[error("grant was issued to another requester")]
    WrongRequester,

    /// The requester is not the registered viewer.
    #[error("requester is not the registered viewer")]
    NotViewer,

    /// Grant is dated after the current time.
    #[error("grant is not valid before {0}")]
    GrantNotYetValid(i64),

    /// Grant has expired.
    #[error("grant expired at {0}")]
    GrantExpired(i64),

    /// Grant has already been used for a read.
    #[error("grant has already been used")]
    GrantReplayed,

    /// Grant could not be decoded or encoded.
    #[error("invalid grant: {0}")]
    InvalidGrant(String),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] cipherlane_core::CoreError),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
