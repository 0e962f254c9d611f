//! Web of trust over verified proofs.
//!
//! This crate builds the in-memory trust graph that decides which package
//! reviews a local identity credits:
//! - Identities are nodes; trust proofs are directed edges
//! - Package reviews are indexed by the recursive digest of the package
//! - A review counts iff some directed path leads from the local identity
//!   to its issuer
//!
//! The graph holds no state across runs. It is rebuilt from proof files
//! every time.

pub mod db;
pub mod dependencies;
pub mod error;
pub mod graph;
pub mod lockfile;

pub use db::{ProofDatabase, RepoFailure, Verification, VerificationStatus};
pub use dependencies::{verify_dependencies, DependencyStatus};
pub use error::{GraphError, GraphResult};
pub use graph::{TrustEdge, TrustGraph};
pub use lockfile::{Dependency, DependencyKind, Lockfile, PackageLockV2};
