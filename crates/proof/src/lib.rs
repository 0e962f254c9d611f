//! Signed proofs for the crev web of trust.
//!
//! A proof is an immutable, dated statement issued by an identity: either
//! trust in other identities or a review of a package's content. Proofs are
//! rendered as YAML, signed with Ed25519 over the exact content bytes and
//! wrapped in a text envelope:
//!
//! ```text
//! ----- BEGIN CREV PROOF -----
//! <content>
//! ----- SIGN CREV PROOF -----
//! <base64url signature>
//! ----- END CREV PROOF -----
//! ```
//!
//! # Verification Rules
//!
//! - A proof is verified against the key in its own `from` field
//! - One bad signature rejects the whole containing document

pub mod envelope;
pub mod error;
pub mod proof;
pub mod repo;

pub use envelope::{parse, parse_and_verify, parse_and_verify_kind, serialize, RawProof};
pub use error::{ProofError, ProofResult};
pub use proof::{
    PackageInfo, PackageRef, PackageReviewBody, Proof, ProofBody, ProofHeader, ProofKind,
    ReviewInfo, SignedProof, TrustBody, PROOF_FORMAT_VERSION,
};
pub use repo::{
    load_document, load_repo_proofs, proof_file_path, sanitize_url_for_fs, write_proof,
    PROOF_FILE_SUFFIX,
};
