//! Sealed and unsealed identities.

use serde::{Deserialize, Serialize};

use crev_core::{from_base64, to_base64, PublicId};
use crev_crypto::{
    generate_keypair, PasswordHashParams, PrivateKey, PublicKey, SealParams, SealedKey,
    SIGNATURE_LEN,
};

use crate::{IdentityError, IdentityResult};

/// Format version written into sealed identity files.
pub const ID_FORMAT_VERSION: i64 = -1;

/// Identity as stored on disk, private key sealed under a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SealedId {
    pub version: i64,
    pub url: String,
    /// base64url Ed25519 public key; also the identity id
    pub public_key: String,
    pub sealed_secret_key: String,
    pub seal_nonce: String,
    pub pass: PasswordHashParams,
}

impl SealedId {
    /// Seal `unsealed` under `password` with a fresh salt and nonce.
    pub fn seal(
        unsealed: &UnsealedId,
        password: &str,
        params: &SealParams,
    ) -> IdentityResult<Self> {
        let sealed = crev_crypto::seal(&unsealed.private_key, password, params)?;
        Ok(Self {
            version: ID_FORMAT_VERSION,
            url: unsealed.url.clone(),
            public_key: unsealed.public_key.to_base64(),
            sealed_secret_key: to_base64(&sealed.ciphertext),
            seal_nonce: to_base64(&sealed.nonce),
            pass: sealed.params,
        })
    }

    pub fn id(&self) -> &str {
        &self.public_key
    }

    pub fn public_key(&self) -> IdentityResult<PublicKey> {
        PublicKey::from_base64(&self.public_key)
            .map_err(|e| IdentityError::Corrupted(format!("public key: {}", e)))
    }

    pub fn to_public_id(&self) -> PublicId {
        PublicId::new(self.public_key.clone(), self.url.clone())
    }

    /// Decrypt the private key.
    ///
    /// A wrong password yields [`IdentityError::Authentication`]. A record
    /// whose sealed key does not belong to its public key is
    /// [`IdentityError::Corrupted`].
    pub fn unseal(&self, password: &str) -> IdentityResult<UnsealedId> {
        let public_key = self.public_key()?;
        let sealed = SealedKey {
            ciphertext: from_base64(&self.sealed_secret_key)?,
            nonce: from_base64(&self.seal_nonce)?,
            params: self.pass.clone(),
        };
        let private_key = crev_crypto::unseal(&sealed, password)?;
        if private_key.public_key() != public_key {
            return Err(IdentityError::Corrupted(
                "sealed secret key does not match public key".to_string(),
            ));
        }
        tracing::debug!(id = %self.public_key, "unsealed identity");
        Ok(UnsealedId {
            url: self.url.clone(),
            public_key,
            private_key,
        })
    }
}

/// Identity with its private key in memory.
///
/// Drop it as soon as the signing operation is done; the private key is
/// zeroized on drop.
#[derive(Debug, Clone)]
pub struct UnsealedId {
    url: String,
    public_key: PublicKey,
    private_key: PrivateKey,
}

impl UnsealedId {
    /// Fresh keypair bound to `url`.
    pub fn generate(url: impl Into<String>) -> Self {
        let (public_key, private_key) = generate_keypair();
        Self {
            url: url.into(),
            public_key,
            private_key,
        }
    }

    pub fn from_private_key(url: impl Into<String>, private_key: PrivateKey) -> Self {
        Self {
            url: url.into(),
            public_key: private_key.public_key(),
            private_key,
        }
    }

    /// base64url public key
    pub fn id(&self) -> String {
        self.public_key.to_base64()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn public_id(&self) -> PublicId {
        PublicId::new(self.id(), self.url.clone())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        crev_crypto::sign(message, &self.private_key)
    }
}
