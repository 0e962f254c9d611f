//! Proof envelope parsing and rendering.

use crev_core::from_base64;
use crev_crypto::PublicKey;
use crev_identity::UnsealedId;

use crate::proof::{Proof, ProofKind};
use crate::{ProofError, ProofResult};

pub const BEGIN_PROOF: &str = "----- BEGIN CREV PROOF -----";
pub const SIGN_PROOF: &str = "----- SIGN CREV PROOF -----";
pub const END_PROOF: &str = "----- END CREV PROOF -----";

struct Markers {
    begin: &'static str,
    sign: &'static str,
    end: &'static str,
    section: Option<ProofKind>,
}

const MARKERS: &[Markers] = &[
    Markers {
        begin: BEGIN_PROOF,
        sign: SIGN_PROOF,
        end: END_PROOF,
        section: None,
    },
    // Older per-kind envelopes.
    Markers {
        begin: "----- BEGIN CREV PACKAGE REVIEW -----",
        sign: "----- BEGIN CREV PACKAGE REVIEW SIGNATURE -----",
        end: "----- END CREV PACKAGE REVIEW -----",
        section: Some(ProofKind::PackageReview),
    },
    Markers {
        begin: "----- BEGIN CREV TRUST -----",
        sign: "----- BEGIN CREV TRUST SIGNATURE -----",
        end: "----- END CREV TRUST -----",
        section: Some(ProofKind::Trust),
    },
];

fn is_marker(line: &str) -> bool {
    line.starts_with("-----") && line.ends_with("-----")
}

/// Content and signature of one envelope, not yet verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProof {
    /// Signed bytes: the content block including its trailing newline
    pub content: String,
    /// base64url Ed25519 signature
    pub signature: String,
    section: Option<ProofKind>,
}

impl RawProof {
    pub fn new(content: String, signature: String) -> Self {
        Self {
            content,
            signature,
            section: None,
        }
    }

    /// Kind named by a legacy envelope, if any.
    pub fn section(&self) -> Option<ProofKind> {
        self.section
    }

    /// Render in the current envelope format.
    pub fn to_envelope(&self) -> String {
        let mut out = String::with_capacity(self.content.len() + self.signature.len() + 100);
        out.push_str(BEGIN_PROOF);
        out.push('\n');
        out.push_str(&self.content);
        if !self.content.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(SIGN_PROOF);
        out.push('\n');
        out.push_str(&self.signature);
        out.push('\n');
        out.push_str(END_PROOF);
        out.push('\n');
        out
    }

    /// Parse the content and check the signature against the issuer's own
    /// key.
    pub fn verify(&self) -> ProofResult<Proof> {
        let proof = Proof::from_content_str(&self.content, self.section)?;
        let signature_error = || ProofError::Signature {
            issuer: proof.issuer().id.clone(),
            target: proof.target(),
        };

        let key = PublicKey::from_base64(&proof.issuer().id).map_err(|_| signature_error())?;
        let signature = from_base64(&self.signature)
            .map_err(|e| ProofError::Format(format!("signature: {}", e)))?;
        if !crev_crypto::verify(self.content.as_bytes(), &signature, &key) {
            tracing::warn!(
                issuer = %proof.issuer().id,
                target = %proof.target(),
                "proof signature mismatch"
            );
            return Err(signature_error());
        }
        Ok(proof)
    }
}

enum State<'a> {
    Outside,
    Content {
        markers: &'static Markers,
        lines: Vec<&'a str>,
    },
    Signature {
        markers: &'static Markers,
        content: String,
        signature: Option<String>,
    },
}

fn unexpected_line(index: usize, line: &str) -> ProofError {
    ProofError::Format(format!("unexpected line {}: {:?}", index + 1, line))
}

/// Split a document into its envelopes without verifying signatures.
///
/// A document may hold any number of envelopes back to back. Text outside
/// envelopes other than blank lines is rejected.
///
/// Content bytes are kept as written, line endings included, except that
/// the line break right before the signature marker is always `\n`.
pub fn parse(document: &str) -> ProofResult<Vec<RawProof>> {
    let mut proofs = Vec::new();
    let mut state = State::Outside;

    for (index, line) in document.split_inclusive('\n').enumerate() {
        let trimmed = line.trim_end();
        state = match state {
            State::Outside => {
                if trimmed.is_empty() {
                    State::Outside
                } else if let Some(markers) = MARKERS.iter().find(|m| m.begin == trimmed) {
                    State::Content {
                        markers,
                        lines: Vec::new(),
                    }
                } else {
                    return Err(unexpected_line(index, trimmed));
                }
            }
            State::Content { markers, mut lines } => {
                if trimmed == markers.sign {
                    State::Signature {
                        markers,
                        content: content_block(&lines),
                        signature: None,
                    }
                } else if is_marker(trimmed) {
                    return Err(unexpected_line(index, trimmed));
                } else {
                    lines.push(line);
                    State::Content { markers, lines }
                }
            }
            State::Signature {
                markers,
                content,
                signature,
            } => {
                if trimmed == markers.end {
                    let signature = signature.ok_or_else(|| unexpected_line(index, trimmed))?;
                    proofs.push(RawProof {
                        content,
                        signature,
                        section: markers.section,
                    });
                    State::Outside
                } else if trimmed.is_empty() {
                    State::Signature {
                        markers,
                        content,
                        signature,
                    }
                } else if signature.is_none() && !is_marker(trimmed) {
                    State::Signature {
                        markers,
                        content,
                        signature: Some(trimmed.trim_start().to_string()),
                    }
                } else {
                    return Err(unexpected_line(index, trimmed));
                }
            }
        };
    }

    if !matches!(state, State::Outside) {
        return Err(ProofError::Format("unterminated proof envelope".to_string()));
    }
    Ok(proofs)
}

/// Join raw content lines, replacing only the final line break with `\n`.
fn content_block(lines: &[&str]) -> String {
    let mut content = lines.concat();
    let body_len = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .map_or(content.len(), str::len);
    content.truncate(body_len);
    content.push('\n');
    content
}

/// Parse and verify every proof in `document`.
///
/// All or nothing: if any proof fails, none are returned.
pub fn parse_and_verify(document: &str) -> ProofResult<Vec<Proof>> {
    parse(document)?.iter().map(RawProof::verify).collect()
}

/// Like [`parse_and_verify`], additionally requiring every proof to be of
/// `kind`.
pub fn parse_and_verify_kind(document: &str, kind: ProofKind) -> ProofResult<Vec<Proof>> {
    let proofs = parse_and_verify(document)?;
    if let Some(other) = proofs.iter().find(|proof| proof.kind() != kind) {
        return Err(ProofError::UnexpectedKind {
            expected: kind,
            found: other.kind(),
        });
    }
    Ok(proofs)
}

/// Sign `proof` with `id` and render it as an envelope.
pub fn serialize(proof: &Proof, id: &UnsealedId) -> ProofResult<String> {
    Ok(proof.clone().sign(id)?.to_envelope())
}
