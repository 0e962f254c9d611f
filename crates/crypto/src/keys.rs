//! Ed25519 key material.
//!
//! A [`PublicKey`] is the stable identifier of an identity. A [`PrivateKey`]
//! holds the 32-byte Ed25519 seed and is zeroized when dropped.

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::RngCore;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crev_core::{from_base64, to_base64};

use crate::{CryptoError, CryptoResult};

pub const PUBLIC_KEY_LEN: usize = 32;
pub const SECRET_KEY_LEN: usize = 32;

/// Ed25519 verifying key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "public key must be {} bytes, got {}",
                PUBLIC_KEY_LEN,
                bytes.len()
            ))
        })?;
        VerifyingKey::from_bytes(&array)
            .map_err(|e| CryptoError::InvalidKey(format!("not an Ed25519 point: {}", e)))?;
        Ok(Self(array))
    }

    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        Self::from_bytes(&from_base64(encoded)?)
    }

    pub fn to_base64(&self) -> String {
        to_base64(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    pub(crate) fn verifying_key(&self) -> CryptoResult<VerifyingKey> {
        VerifyingKey::from_bytes(&self.0).map_err(|e| CryptoError::InvalidKey(e.to_string()))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base64())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

/// Ed25519 secret seed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; SECRET_KEY_LEN]);

impl PrivateKey {
    /// Copy a 32-byte seed. The caller keeps ownership of (and is
    /// responsible for wiping) the source slice.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != SECRET_KEY_LEN {
            return Err(CryptoError::InvalidKey(format!(
                "Invalid key length: {} (expected {})",
                bytes.len(),
                SECRET_KEY_LEN
            )));
        }
        let mut key = [0u8; SECRET_KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key().verifying_key().to_bytes())
    }

    pub(crate) fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Generate a fresh Ed25519 keypair from the OS-seeded thread RNG.
pub fn generate_keypair() -> (PublicKey, PrivateKey) {
    let mut seed = [0u8; SECRET_KEY_LEN];
    rand::thread_rng().fill_bytes(&mut seed);
    let private_key = PrivateKey(seed);
    seed.zeroize();
    (private_key.public_key(), private_key)
}
