//! Detached Ed25519 signatures.
//!
//! Signatures cover the exact bytes handed in; callers are responsible for
//! producing canonical bytes before signing.

use ed25519_dalek::{Signature, Signer, Verifier};

use crate::keys::{PrivateKey, PublicKey};

pub const SIGNATURE_LEN: usize = 64;

/// Sign `message` with `key`.
pub fn sign(message: &[u8], key: &PrivateKey) -> [u8; SIGNATURE_LEN] {
    key.signing_key().sign(message).to_bytes()
}

/// Check a detached signature. Malformed signatures simply fail.
pub fn verify(message: &[u8], signature: &[u8], key: &PublicKey) -> bool {
    let Ok(bytes) = <[u8; SIGNATURE_LEN]>::try_from(signature) else {
        return false;
    };
    let Ok(verifying_key) = key.verifying_key() else {
        return false;
    };
    verifying_key
        .verify(message, &Signature::from_bytes(&bytes))
        .is_ok()
}
