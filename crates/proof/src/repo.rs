//! Proof repositories on disk.
//!
//! A proof repository holds one folder per identity id, each with a
//! `reviews/` and a `trust/` folder of `*.proof.crev` files. Locally created
//! proofs live under `<proofs dir>/<sanitized url>/<id>/...`.

use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crev_core::to_base64;
use crev_crypto::blake2b_256;
use crev_identity::UnsealedId;

use crate::envelope::{parse_and_verify, parse_and_verify_kind};
use crate::proof::{Proof, ProofKind};
use crate::ProofResult;

pub const PROOF_FILE_SUFFIX: &str = ".proof.crev";

const SANITIZED_URL_LEN: usize = 48;
const URL_DIGEST_LEN: usize = 16;
const FILE_DIGEST_CHARS: usize = 5;

/// Filesystem-safe folder name for a repository url.
///
/// Compatible with cargo-crev: the protocol is stripped, unsafe characters
/// become `_`, and a hash of the full url keeps distinct urls apart after
/// truncation.
pub fn sanitize_url_for_fs(url: &str) -> String {
    let trimmed = url.trim();
    let stripped = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .unwrap_or(trimmed);

    let mut sanitized: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(SANITIZED_URL_LEN)
        .collect();
    let digest = blake2b_256(trimmed.as_bytes());
    sanitized.push('-');
    sanitized.push_str(&to_base64(&digest[..URL_DIGEST_LEN]));
    sanitized
}

/// Where a proof with canonical `content` is stored under `root`.
pub fn proof_file_path(root: &Path, proof: &Proof, content: &str) -> PathBuf {
    let issuer = proof.issuer();
    let date = proof.date().with_timezone(&Utc).format("%Y-%m-%d");
    let digest = to_base64(blake2b_256(content.as_bytes()));
    let digest: String = digest.chars().take(FILE_DIGEST_CHARS).collect();
    let file_name = match proof.kind() {
        ProofKind::Trust => format!("{}-{}{}", date, digest, PROOF_FILE_SUFFIX),
        ProofKind::PackageReview => {
            format!("{}-package-{}{}", date, digest, PROOF_FILE_SUFFIX)
        }
    };
    root.join(sanitize_url_for_fs(&issuer.url))
        .join(&issuer.id)
        .join(proof.kind().folder_name())
        .join(file_name)
}

/// Sign `proof` with `id` and write it under `root`. Returns the file path.
pub fn write_proof(root: &Path, id: &UnsealedId, proof: Proof) -> ProofResult<PathBuf> {
    let signed = proof.sign(id)?;
    let path = proof_file_path(root, &signed, &signed.raw().content);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, signed.to_envelope())?;
    tracing::info!(kind = %signed.kind(), path = %path.display(), "wrote proof");
    Ok(path)
}

/// Read, parse and verify one proof file.
pub fn load_document(path: &Path) -> ProofResult<Vec<Proof>> {
    let document = fs::read_to_string(path)?;
    parse_and_verify(&document)
}

/// Every proof of `kind` in a repository checkout.
///
/// `.git` and plain files at the top level are skipped; identities without
/// a folder for `kind` contribute nothing. Any invalid document aborts the
/// load.
pub fn load_repo_proofs(repo_dir: &Path, kind: ProofKind) -> ProofResult<Vec<Proof>> {
    let mut proofs = Vec::new();
    for id_dir in sorted_entries(repo_dir)? {
        if !id_dir.is_dir() || id_dir.file_name().is_some_and(|name| name == ".git") {
            continue;
        }
        let kind_dir = id_dir.join(kind.folder_name());
        let files = match sorted_entries(&kind_dir) {
            Ok(files) => files,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        for file in files {
            let is_proof_file = file
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(PROOF_FILE_SUFFIX));
            if !is_proof_file || !file.is_file() {
                continue;
            }
            let document = fs::read_to_string(&file)?;
            proofs.extend(parse_and_verify_kind(&document, kind)?);
        }
    }
    tracing::debug!(
        repo = %repo_dir.display(),
        kind = %kind,
        count = proofs.len(),
        "loaded proofs"
    );
    Ok(proofs)
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}
