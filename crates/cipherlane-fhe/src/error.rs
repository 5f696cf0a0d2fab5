//! Error types for the confidential arithmetic layer.

use thiserror::Error;

/// Errors raised by a confidential arithmetic backend or by sealing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The ciphertext was not produced by this backend, or was tampered with.
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// Encryption failed.
    #[error("encryption error: {0}")]
    EncryptionError(String),

    /// A sealed output could not be opened with the given secret.
    #[error("unseal error: {0}")]
    UnsealError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
