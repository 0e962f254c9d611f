//! Proof model and canonical content.
//!
//! Proof content is YAML with kebab-case keys in a fixed field order. The
//! signature covers the exact content bytes, so rendering a parsed proof
//! must reproduce the content it was parsed from.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

use crev_core::{to_base64, Level, PublicId, Rating, TrustLevel};
use crev_identity::UnsealedId;

use crate::envelope::RawProof;
use crate::{ProofError, ProofResult};

/// Format version stamped on new proofs.
pub const PROOF_FORMAT_VERSION: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofKind {
    #[serde(rename = "trust")]
    Trust,
    #[serde(rename = "package review")]
    PackageReview,
}

impl ProofKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofKind::Trust => "trust",
            ProofKind::PackageReview => "package review",
        }
    }

    /// Per-identity folder holding proofs of this kind.
    pub fn folder_name(&self) -> &'static str {
        match self {
            ProofKind::Trust => "trust",
            ProofKind::PackageReview => "reviews",
        }
    }
}

impl fmt::Display for ProofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reviewed package and the digest of its content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageInfo {
    pub source: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// base64url recursive digest
    pub digest: String,
}

impl PackageInfo {
    pub fn new(
        source: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            version: version.into(),
            revision: None,
            digest: digest.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    pub source: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewInfo {
    pub thoroughness: Level,
    pub understanding: Level,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustBody {
    pub ids: Vec<PublicId>,
    pub trust: TrustLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReviewBody {
    pub package: PackageInfo,
    pub review: ReviewInfo,
    pub diff_base: Option<PackageInfo>,
    pub alternatives: Vec<PackageRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofBody {
    Trust(TrustBody),
    PackageReview(PackageReviewBody),
}

/// Fields shared by every proof kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofHeader {
    pub version: i64,
    pub date: DateTime<FixedOffset>,
    pub from: PublicId,
    pub comment: Option<String>,
}

/// A parsed proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub header: ProofHeader,
    pub body: ProofBody,
}

impl Proof {
    /// Trust proof from `from` to each of `ids`, dated now.
    pub fn trust(from: PublicId, ids: Vec<PublicId>, trust: TrustLevel) -> Self {
        Self::now(from, ProofBody::Trust(TrustBody { ids, trust }))
    }

    /// Package review by `from`, dated now.
    pub fn package_review(from: PublicId, package: PackageInfo, review: ReviewInfo) -> Self {
        Self::now(
            from,
            ProofBody::PackageReview(PackageReviewBody {
                package,
                review,
                diff_base: None,
                alternatives: Vec::new(),
            }),
        )
    }

    fn now(from: PublicId, body: ProofBody) -> Self {
        Self {
            header: ProofHeader {
                version: PROOF_FORMAT_VERSION,
                date: Utc::now().into(),
                from,
                comment: None,
            },
            body,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.header.comment = Some(comment.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.header.date = date;
        self
    }

    pub fn kind(&self) -> ProofKind {
        match self.body {
            ProofBody::Trust(_) => ProofKind::Trust,
            ProofBody::PackageReview(_) => ProofKind::PackageReview,
        }
    }

    pub fn issuer(&self) -> &PublicId {
        &self.header.from
    }

    pub fn date(&self) -> DateTime<FixedOffset> {
        self.header.date
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.header.date.timestamp_millis()
    }

    pub fn as_trust(&self) -> Option<&TrustBody> {
        match &self.body {
            ProofBody::Trust(body) => Some(body),
            ProofBody::PackageReview(_) => None,
        }
    }

    pub fn as_package_review(&self) -> Option<&PackageReviewBody> {
        match &self.body {
            ProofBody::PackageReview(body) => Some(body),
            ProofBody::Trust(_) => None,
        }
    }

    /// What the proof is about: the package name, or the trusted ids.
    pub fn target(&self) -> String {
        match &self.body {
            ProofBody::PackageReview(body) => body.package.name.clone(),
            ProofBody::Trust(body) => body
                .ids
                .iter()
                .map(|id| id.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Canonical YAML content. Always ends with a single newline.
    pub fn canonical_content(&self) -> ProofResult<String> {
        Ok(serde_yaml::to_string(&ProofContent::from(self))?)
    }

    /// Sign the canonical content with `id`, which must be the issuer.
    pub fn sign(self, id: &UnsealedId) -> ProofResult<SignedProof> {
        let signer = id.id();
        if self.header.from.id != signer {
            return Err(ProofError::IssuerMismatch {
                issuer: self.header.from.id.clone(),
                signer,
            });
        }
        let content = self.canonical_content()?;
        let signature = to_base64(id.sign(content.as_bytes()));
        tracing::debug!(kind = %self.kind(), issuer = %signer, "signed proof");
        Ok(SignedProof {
            proof: self,
            raw: RawProof::new(content, signature),
        })
    }

    /// Parse content without checking any signature.
    pub(crate) fn from_content_str(
        content: &str,
        section: Option<ProofKind>,
    ) -> ProofResult<Self> {
        let content: ProofContent = serde_yaml::from_str(content)
            .map_err(|e| ProofError::Format(format!("invalid proof content: {}", e)))?;
        Self::from_content(content, section)
    }

    fn from_content(content: ProofContent, section: Option<ProofKind>) -> ProofResult<Self> {
        let ProofContent {
            kind,
            version,
            date,
            from,
            ids,
            trust,
            package,
            review,
            package_diff_base,
            alternatives,
            comment,
        } = content;

        if let (Some(declared), Some(section)) = (kind, section) {
            if declared != section {
                return Err(ProofError::Format(format!(
                    "`kind: {}` inside a {} envelope",
                    declared, section
                )));
            }
        }
        let kind = match kind.or(section) {
            Some(kind) => kind,
            None if ids.is_some() && trust.is_some() => ProofKind::Trust,
            None if package.is_some() && review.is_some() => ProofKind::PackageReview,
            None => {
                return Err(ProofError::Format(
                    "cannot determine proof kind".to_string(),
                ))
            }
        };

        let body = match kind {
            ProofKind::Trust => {
                let ids = ids.ok_or_else(|| missing_field("ids"))?;
                if ids.is_empty() {
                    return Err(ProofError::Format("trust proof names no ids".to_string()));
                }
                ProofBody::Trust(TrustBody {
                    ids,
                    trust: trust.ok_or_else(|| missing_field("trust"))?,
                })
            }
            ProofKind::PackageReview => ProofBody::PackageReview(PackageReviewBody {
                package: package.ok_or_else(|| missing_field("package"))?,
                review: review.ok_or_else(|| missing_field("review"))?,
                diff_base: package_diff_base,
                alternatives,
            }),
        };

        Ok(Self {
            header: ProofHeader {
                version,
                date,
                from,
                comment,
            },
            body,
        })
    }
}

fn missing_field(field: &str) -> ProofError {
    ProofError::Format(format!("missing field `{}`", field))
}

/// A proof together with its signed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedProof {
    proof: Proof,
    raw: RawProof,
}

impl SignedProof {
    pub fn proof(&self) -> &Proof {
        &self.proof
    }

    pub fn raw(&self) -> &RawProof {
        &self.raw
    }

    pub fn into_proof(self) -> Proof {
        self.proof
    }

    pub fn to_envelope(&self) -> String {
        self.raw.to_envelope()
    }
}

impl Deref for SignedProof {
    type Target = Proof;

    fn deref(&self) -> &Proof {
        &self.proof
    }
}

/// Wire form of a proof. Field order here is the canonical order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ProofContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<ProofKind>,
    version: i64,
    #[serde(with = "date_format")]
    date: DateTime<FixedOffset>,
    from: PublicId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ids: Option<Vec<PublicId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trust: Option<TrustLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    package: Option<PackageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    review: Option<ReviewInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    package_diff_base: Option<PackageInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    alternatives: Vec<PackageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl From<&Proof> for ProofContent {
    fn from(proof: &Proof) -> Self {
        let mut content = ProofContent {
            kind: Some(proof.kind()),
            version: proof.header.version,
            date: proof.header.date,
            from: proof.header.from.clone(),
            ids: None,
            trust: None,
            package: None,
            review: None,
            package_diff_base: None,
            alternatives: Vec::new(),
            comment: proof.header.comment.clone(),
        };
        match &proof.body {
            ProofBody::Trust(body) => {
                content.ids = Some(body.ids.clone());
                content.trust = Some(body.trust);
            }
            ProofBody::PackageReview(body) => {
                content.package = Some(body.package.clone());
                content.review = Some(body.review);
                content.package_diff_base = body.diff_base.clone();
                content.alternatives = body.alternatives.clone();
            }
        }
        content
    }
}

/// RFC 3339 dates; `Z` for UTC, fractional seconds only when present.
mod date_format {
    use chrono::{DateTime, FixedOffset, SecondsFormat};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text).map_err(serde::de::Error::custom)
    }
}
