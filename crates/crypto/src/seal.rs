//! Password sealing of private keys.
//!
//! A password is stretched with Argon2 into a 256-bit key which encrypts the
//! Ed25519 seed with XChaCha20-Poly1305 under a random 192-bit nonce. Every
//! parameter needed to re-derive the key (variant, version, iterations,
//! memory, lanes and the random salt) is stored beside the ciphertext.
//!
//! # Security Model
//!
//! - A fresh salt and nonce are drawn for every seal; salts are never reused
//! - Unsealing is authenticated: a wrong password is reported as
//!   [`CryptoError::Authentication`] and no plaintext is returned
//! - Derived keys and decrypted seeds live in zeroizing buffers

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

use crev_core::{from_base64, to_base64};

use crate::keys::PrivateKey;
use crate::{CryptoError, CryptoResult};

/// Salt size in bytes (cargo-crev uses 32-byte salts).
pub const SALT_LEN: usize = 32;

/// XChaCha20-Poly1305 nonce size (192 bits / 24 bytes).
pub const NONCE_LEN: usize = 24;

const KEY_LEN: usize = 32;

/// Argon2 `0x13`.
const ARGON2_VERSION_13: u32 = 0x13;
const ARGON2_VERSION_10: u32 = 0x10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argon2Variant {
    Argon2d,
    Argon2i,
    Argon2id,
}

impl Argon2Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Argon2Variant::Argon2d => "argon2d",
            Argon2Variant::Argon2i => "argon2i",
            Argon2Variant::Argon2id => "argon2id",
        }
    }

    fn algorithm(&self) -> Algorithm {
        match self {
            Argon2Variant::Argon2d => Algorithm::Argon2d,
            Argon2Variant::Argon2i => Algorithm::Argon2i,
            Argon2Variant::Argon2id => Algorithm::Argon2id,
        }
    }
}

impl fmt::Display for Argon2Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Argon2Variant {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "argon2d" => Ok(Argon2Variant::Argon2d),
            "argon2i" => Ok(Argon2Variant::Argon2i),
            "argon2id" => Ok(Argon2Variant::Argon2id),
            other => Err(CryptoError::UnsupportedAlgorithm(format!(
                "unknown argon2 variant '{}'",
                other
            ))),
        }
    }
}

/// Tunable password hashing cost, without a salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealParams {
    pub variant: Argon2Variant,
    pub version: u32,
    pub iterations: u32,
    /// Memory cost in KiB.
    pub memory_size: u32,
    pub lanes: u32,
}

impl Default for SealParams {
    fn default() -> Self {
        Self {
            variant: Argon2Variant::Argon2id,
            version: ARGON2_VERSION_13,
            iterations: 3,
            memory_size: 4096,
            lanes: 4,
        }
    }
}

impl SealParams {
    /// Stored parameters with a freshly drawn salt.
    pub fn with_random_salt(&self) -> PasswordHashParams {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        PasswordHashParams {
            version: self.version,
            variant: self.variant.as_str().to_string(),
            iterations: self.iterations,
            memory_size: self.memory_size,
            lanes: Some(self.lanes),
            salt: to_base64(salt),
        }
    }
}

/// Password hash parameters as stored in a sealed identity (`pass:`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PasswordHashParams {
    pub version: u32,
    pub variant: String,
    pub iterations: u32,
    pub memory_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lanes: Option<u32>,
    /// base64url
    pub salt: String,
}

impl PasswordHashParams {
    fn hasher(&self) -> CryptoResult<Argon2<'static>> {
        let variant: Argon2Variant = self.variant.parse()?;
        let version = match self.version {
            ARGON2_VERSION_13 => Version::V0x13,
            ARGON2_VERSION_10 => Version::V0x10,
            other => {
                return Err(CryptoError::UnsupportedAlgorithm(format!(
                    "unknown argon2 version {}",
                    other
                )))
            }
        };
        let params = Params::new(
            self.memory_size,
            self.iterations,
            self.lanes.unwrap_or(Params::DEFAULT_P_COST),
            Some(KEY_LEN),
        )
        .map_err(|e| CryptoError::PasswordHash(e.to_string()))?;
        Ok(Argon2::new(variant.algorithm(), version, params))
    }
}

/// A private key encrypted under a password-derived key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedKey {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub params: PasswordHashParams,
}

/// Re-derive the sealing key for `password` from stored parameters.
pub fn derive_key(
    password: &str,
    params: &PasswordHashParams,
) -> CryptoResult<Zeroizing<[u8; KEY_LEN]>> {
    let salt = from_base64(&params.salt)?;
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    params
        .hasher()?
        .hash_password_into(password.as_bytes(), &salt, &mut key[..])
        .map_err(|e| CryptoError::PasswordHash(e.to_string()))?;
    Ok(key)
}

/// Encrypt `private_key` under `password`.
pub fn seal(
    private_key: &PrivateKey,
    password: &str,
    params: &SealParams,
) -> CryptoResult<SealedKey> {
    let stored = params.with_random_salt();
    let key = derive_key(password, &stored)?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    let cipher = XChaCha20Poly1305::new_from_slice(&key[..])
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), private_key.as_bytes().as_slice())
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    tracing::debug!(
        variant = %stored.variant,
        iterations = stored.iterations,
        memory_size = stored.memory_size,
        "sealed private key"
    );

    Ok(SealedKey {
        ciphertext,
        nonce: nonce.to_vec(),
        params: stored,
    })
}

/// Decrypt a sealed key.
///
/// Returns [`CryptoError::Authentication`] when the password is wrong or the
/// ciphertext was modified.
pub fn unseal(sealed: &SealedKey, password: &str) -> CryptoResult<PrivateKey> {
    if sealed.nonce.len() != NONCE_LEN {
        return Err(CryptoError::Encryption(format!(
            "seal nonce must be {} bytes, got {}",
            NONCE_LEN,
            sealed.nonce.len()
        )));
    }
    let key = derive_key(password, &sealed.params)?;
    let cipher = XChaCha20Poly1305::new_from_slice(&key[..])
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(XNonce::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())
            .map_err(|_| CryptoError::Authentication)?,
    );
    PrivateKey::from_bytes(&plaintext)
}
