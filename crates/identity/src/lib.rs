//! Identity management for the crev web of trust.
//!
//! An identity is an Ed25519 keypair bound to the url of the repository
//! where it publishes proofs. At rest the private key is sealed under a
//! password; it is only unsealed in memory for the signing operation that
//! needs it.
//!
//! # Core Concepts
//!
//! - **Sealed identity**: the on-disk record (`ids/<id>.yaml`)
//! - **Unsealed identity**: public and private key held transiently
//! - **Current identity**: a pointer in the config file, passed explicitly
//!   into the operations that need an identity context
//!
//! # Security Model
//!
//! - Wrong passwords surface as [`IdentityError::Authentication`]
//! - Switching the current identity never touches identity records

pub mod error;
pub mod id;
pub mod store;

pub use error::{IdentityError, IdentityResult};
pub use id::{SealedId, UnsealedId, ID_FORMAT_VERSION};
pub use store::IdStore;
