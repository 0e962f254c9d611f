//! Error types for trust graph operations.

use std::path::PathBuf;
use thiserror::Error;

use crev_crypto::CryptoError;
use crev_proof::ProofError;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A proof document failed to parse or verify
    #[error("Proof error: {0}")]
    Proof(#[from] ProofError),

    /// Digest computation failed
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Installed package directory is missing
    #[error("Package {name} not found at {}", path.display())]
    PackageNotFound { name: String, path: PathBuf },

    #[error("Lockfile error: {0}")]
    Lockfile(String),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
