//! Cryptographic primitives for the crev web of trust.
//!
//! # Core Capabilities
//!
//! - **Digital Signatures**: Ed25519 keypairs and detached signatures over
//!   canonical proof content
//! - **Identity Sealing**: Argon2 password hashing and XChaCha20-Poly1305
//!   authenticated encryption of private keys at rest
//! - **Content Digests**: deterministic BLAKE2b-512 structural hash of files,
//!   symlinks and directory trees
//!
//! # Security Principles
//!
//! - Private key material is zeroized on drop and never logged
//! - Failed decryption never yields partial plaintext
//! - All signatures must be verified before a proof is trusted

pub mod digest;
pub mod error;
pub mod hash;
pub mod keys;
pub mod seal;
pub mod signing;

pub use digest::{recursive_digest, Digest, DIGEST_LEN};
pub use error::{CryptoError, CryptoResult};
pub use hash::{blake2b_256, blake2b_512};
pub use keys::{generate_keypair, PrivateKey, PublicKey, PUBLIC_KEY_LEN, SECRET_KEY_LEN};
pub use seal::{
    derive_key, seal, unseal, Argon2Variant, PasswordHashParams, SealParams, SealedKey,
    NONCE_LEN, SALT_LEN,
};
pub use signing::{sign, verify, SIGNATURE_LEN};
