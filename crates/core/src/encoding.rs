//! URL-safe base64 used for keys, signatures and digests.
//!
//! Encoding uses the `-`/`_` alphabet with padding stripped. Decoding accepts
//! the same alphabet with or without trailing `=`.

use base64::alphabet;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use base64::Engine as _;

use crate::{Error, Result};

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as unpadded base64url.
pub fn to_base64(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_LENIENT.encode(data)
}

/// Decode base64url, padded or not.
pub fn from_base64(data: &str) -> Result<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(data.trim())
        .map_err(|e| Error::Format(format!("invalid base64url '{}': {}", data, e)))
}
