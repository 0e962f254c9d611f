//! Recursive content digest.
//!
//! A structural BLAKE2b-512 hash over a path:
//!
//! ```text
//! file      H("F" ++ bytes)
//! symlink   H("L" ++ utf8(target))
//! directory H("D" ++ for each entry sorted by name: H(name) ++ hash(entry))
//! ```
//!
//! Symlinks are never followed, so cyclic links cannot cause unbounded
//! recursion. Entries are sorted before folding, so the result does not
//! depend on the order in which the filesystem lists them.

use blake2::{Blake2b512, Digest as _};
use std::fmt;
use std::fs::{self, File, FileType};
use std::io;
use std::path::Path;

use crev_core::{from_base64, to_base64};

use crate::hash::blake2b_512;
use crate::{CryptoError, CryptoResult};

pub const DIGEST_LEN: usize = 64;

const FILE_PREFIX: &[u8] = b"F";
const SYMLINK_PREFIX: &[u8] = b"L";
const DIRECTORY_PREFIX: &[u8] = b"D";

/// Content digest of a file tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; DIGEST_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::Core(crev_core::Error::Format(format!(
                "digest must be {} bytes, got {}",
                DIGEST_LEN,
                bytes.len()
            )))
        })?;
        Ok(Self(array))
    }

    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        Self::from_bytes(&from_base64(encoded)?)
    }

    pub fn to_base64(&self) -> String {
        to_base64(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_base64())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

/// Digest a file, symlink or directory tree.
pub fn recursive_digest(path: impl AsRef<Path>) -> CryptoResult<Digest> {
    let path = path.as_ref();
    let file_type = fs::symlink_metadata(path)?.file_type();
    let digest = hash_entry(path, file_type)?;
    tracing::debug!(path = %path.display(), "computed recursive digest");
    Ok(Digest(digest))
}

fn hash_entry(path: &Path, file_type: FileType) -> CryptoResult<[u8; DIGEST_LEN]> {
    if file_type.is_symlink() {
        hash_symlink(path)
    } else if file_type.is_file() {
        hash_file(path)
    } else if file_type.is_dir() {
        hash_directory(path)
    } else {
        Err(CryptoError::Digest {
            path: path.to_path_buf(),
            reason: "neither a file, directory, or symlink".to_string(),
        })
    }
}

fn finalize(hasher: Blake2b512) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

fn hash_file(path: &Path) -> CryptoResult<[u8; DIGEST_LEN]> {
    let mut hasher = Blake2b512::new();
    hasher.update(FILE_PREFIX);
    let mut file = File::open(path)?;
    io::copy(&mut file, &mut hasher)?;
    Ok(finalize(hasher))
}

fn hash_symlink(path: &Path) -> CryptoResult<[u8; DIGEST_LEN]> {
    let target = fs::read_link(path)?;
    let target = target.to_str().ok_or_else(|| CryptoError::Digest {
        path: path.to_path_buf(),
        reason: "symlink target is not valid UTF-8".to_string(),
    })?;
    let mut hasher = Blake2b512::new();
    hasher.update(SYMLINK_PREFIX);
    hasher.update(target.as_bytes());
    Ok(finalize(hasher))
}

fn hash_directory(path: &Path) -> CryptoResult<[u8; DIGEST_LEN]> {
    let mut entries = fs::read_dir(path)?
        .map(|entry| -> CryptoResult<(String, FileType)> {
            let entry = entry?;
            let name = entry
                .file_name()
                .into_string()
                .map_err(|name| CryptoError::Digest {
                    path: path.join(name),
                    reason: "entry name is not valid UTF-8".to_string(),
                })?;
            Ok((name, entry.file_type()?))
        })
        .collect::<CryptoResult<Vec<_>>>()?;
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Blake2b512::new();
    hasher.update(DIRECTORY_PREFIX);
    for (name, file_type) in entries {
        hasher.update(blake2b_512(name.as_bytes()));
        hasher.update(hash_entry(&path.join(&name), file_type)?);
    }
    Ok(finalize(hasher))
}
