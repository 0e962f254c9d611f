//! Error types for proof handling.

use thiserror::Error;

use crate::proof::ProofKind;

#[derive(Debug, Error)]
pub enum ProofError {
    /// Malformed envelope or unparseable content
    #[error("Malformed proof: {0}")]
    Format(String),

    /// Signature does not match the issuer's key
    #[error("Invalid signature on proof by {issuer} for {target}")]
    Signature { issuer: String, target: String },

    #[error("Expected a {expected} proof, found {found}")]
    UnexpectedKind {
        expected: ProofKind,
        found: ProofKind,
    },

    /// Attempt to sign a proof issued by a different identity
    #[error("Proof is issued by {issuer} but signing identity is {signer}")]
    IssuerMismatch { issuer: String, signer: String },

    #[error(transparent)]
    Core(#[from] crev_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

impl ProofError {
    pub fn is_signature(&self) -> bool {
        matches!(self, ProofError::Signature { .. })
    }
}

pub type ProofResult<T> = Result<T, ProofError>;
