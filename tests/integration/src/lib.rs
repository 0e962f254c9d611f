//! End-to-end tests across identities, proofs and the trust graph.
//!
//! Each scenario works on a temporary directory laid out like a real crev
//! installation: sealed identities under the config dir, proofs written
//! into per-identity repositories, and a cache of fetched repositories
//! loaded into a fresh proof database.

pub mod test_utils;

#[cfg(test)]
mod identity_lifecycle_tests;

#[cfg(test)]
mod web_of_trust_tests;
