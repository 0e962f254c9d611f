//! Error types for cryptographic operations.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    /// Authenticated decryption failed: wrong password or tampered data.
    #[error("Authentication failed: wrong password or corrupted sealed key")]
    Authentication,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Unsupported password hash: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Cannot digest {}: {reason}", path.display())]
    Digest { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] crev_core::Error),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
