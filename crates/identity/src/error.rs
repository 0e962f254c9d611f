//! Error types for identity operations.

use crev_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur in identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Wrong password (integrity-checked decryption failed)
    #[error("Wrong password for identity")]
    Authentication,

    /// Identity not found in the store
    #[error("Identity not found: {id}")]
    NotFound { id: String },

    /// No identity has been selected as current
    #[error("No current identity; create one first")]
    NoCurrentIdentity,

    /// Sealed record is internally inconsistent
    #[error("Corrupted identity: {0}")]
    Corrupted(String),

    /// Cryptographic errors other than a wrong password
    #[error("Cryptographic error: {0}")]
    Crypto(CryptoError),

    /// Core errors
    #[error("Core error: {0}")]
    Core(#[from] crev_core::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CryptoError> for IdentityError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Authentication => IdentityError::Authentication,
            other => IdentityError::Crypto(other),
        }
    }
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
