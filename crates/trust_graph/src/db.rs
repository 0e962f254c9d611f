//! Proof database: the trust graph plus the package review index.

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crev_core::PublicId;
use crev_proof::{load_repo_proofs, parse_and_verify, PackageInfo, Proof, ProofBody, ProofKind};

use crate::graph::{TrustEdge, TrustGraph};
use crate::{GraphError, GraphResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pass,
    Fail,
    None,
}

/// Verdict on a package digest from the point of view of one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub status: VerificationStatus,
    /// Reviews by trusted issuers only
    pub review_count: usize,
}

/// A repository that could not be loaded.
#[derive(Debug)]
pub struct RepoFailure {
    pub path: PathBuf,
    pub error: GraphError,
}

/// Proofs of one repository, verified but not yet ingested.
#[derive(Debug)]
struct RepoProofs {
    reviews: Vec<Proof>,
    trust: Vec<Proof>,
}

impl RepoProofs {
    fn read(repo_dir: &Path) -> GraphResult<Self> {
        Ok(Self {
            reviews: load_repo_proofs(repo_dir, ProofKind::PackageReview)?,
            trust: load_repo_proofs(repo_dir, ProofKind::Trust)?,
        })
    }

    fn len(&self) -> usize {
        self.reviews.len() + self.trust.len()
    }
}

/// In-memory web of trust, rebuilt from proof files on every run.
#[derive(Debug, Default)]
pub struct ProofDatabase {
    graph: TrustGraph,
    /// digest -> first package seen with that digest
    packages: HashMap<String, PackageInfo>,
    /// digest -> reviews of that digest
    reviews: HashMap<String, Vec<Arc<Proof>>>,
}

impl ProofDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a proof that has already been verified.
    pub fn add_proof(&mut self, proof: Proof) {
        let proof = Arc::new(proof);
        self.graph.add_node(proof.issuer());
        match &proof.body {
            ProofBody::PackageReview(body) => {
                let digest = &body.package.digest;
                self.packages
                    .entry(digest.clone())
                    .or_insert_with(|| body.package.clone());
                self.reviews
                    .entry(digest.clone())
                    .or_default()
                    .push(Arc::clone(&proof));
            }
            ProofBody::Trust(body) => {
                for target in &body.ids {
                    self.graph.add_node(target);
                    self.graph.add_edge(
                        &proof.issuer().id,
                        &target.id,
                        TrustEdge {
                            level: body.trust,
                            date: proof.date(),
                            proof: Arc::clone(&proof),
                        },
                    );
                }
            }
        }
    }

    pub fn add_proofs(&mut self, proofs: impl IntoIterator<Item = Proof>) {
        for proof in proofs {
            self.add_proof(proof);
        }
    }

    /// Parse, verify and ingest one document.
    ///
    /// Nothing is ingested if any proof in the document fails; the caller
    /// decides whether to skip the source or abort. Returns the number of
    /// proofs added.
    pub fn load_document(&mut self, document: &str) -> GraphResult<usize> {
        let proofs = parse_and_verify(document)?;
        let count = proofs.len();
        self.add_proofs(proofs);
        Ok(count)
    }

    /// Load every proof in one repository checkout.
    pub fn load_repo(&mut self, repo_dir: &Path) -> GraphResult<usize> {
        let proofs = RepoProofs::read(repo_dir)?;
        let count = proofs.len();
        self.ingest(proofs);
        tracing::info!(repo = %repo_dir.display(), proofs = count, "loaded proof repository");
        Ok(count)
    }

    /// Load every repository under `cache_dir` (one per subfolder).
    ///
    /// Repositories that fail to load are skipped and reported.
    pub fn load_cache(&mut self, cache_dir: &Path) -> GraphResult<Vec<RepoFailure>> {
        let mut failures = Vec::new();
        for repo_dir in repo_dirs(cache_dir)? {
            if let Err(error) = self.load_repo(&repo_dir) {
                tracing::warn!(repo = %repo_dir.display(), error = %error, "skipping proof repository");
                failures.push(RepoFailure {
                    path: repo_dir,
                    error,
                });
            }
        }
        Ok(failures)
    }

    /// Parse and verify repositories in parallel on the blocking pool, then
    /// ingest them one at a time in the order given.
    ///
    /// Ingestion is serial so the latest-date rule for trust edges sees the
    /// same sequence of proofs as a sequential load.
    pub async fn load_repos_concurrently(&mut self, repo_dirs: Vec<PathBuf>) -> Vec<RepoFailure> {
        let tasks: Vec<_> = repo_dirs
            .into_iter()
            .map(|dir| {
                let task_dir = dir.clone();
                (dir, tokio::task::spawn_blocking(move || RepoProofs::read(&task_dir)))
            })
            .collect();

        let mut failures = Vec::new();
        for (dir, task) in tasks {
            let result = match task.await {
                Ok(result) => result,
                Err(join_error) => Err(join_error.into()),
            };
            match result {
                Ok(proofs) => {
                    tracing::debug!(repo = %dir.display(), proofs = proofs.len(), "ingesting repository");
                    self.ingest(proofs);
                }
                Err(error) => {
                    tracing::warn!(repo = %dir.display(), error = %error, "skipping proof repository");
                    failures.push(RepoFailure { path: dir, error });
                }
            }
        }
        failures
    }

    fn ingest(&mut self, proofs: RepoProofs) {
        self.add_proofs(proofs.reviews);
        self.add_proofs(proofs.trust);
    }

    /// Verdict on `digest` for `self_id`.
    ///
    /// Only reviews whose issuer is reachable from `self_id` count; an
    /// identity always trusts itself. Any trusted negative or dangerous
    /// review fails the package, otherwise any trusted positive or strong
    /// review passes it.
    pub fn verify(&self, self_id: &str, digest: &str) -> Verification {
        let Some(reviews) = self.reviews.get(digest) else {
            return Verification {
                status: VerificationStatus::None,
                review_count: 0,
            };
        };

        let trusted_ids = self.graph.reachable_from(self_id);
        let ratings: Vec<_> = reviews
            .iter()
            .filter(|proof| trusted_ids.contains(&proof.issuer().id))
            .filter_map(|proof| proof.as_package_review())
            .map(|body| body.review.rating)
            .collect();

        let status = if ratings.iter().any(|rating| rating.is_failing()) {
            VerificationStatus::Fail
        } else if ratings.iter().any(|rating| rating.is_passing()) {
            VerificationStatus::Pass
        } else {
            VerificationStatus::None
        };
        tracing::debug!(
            digest,
            reviews = reviews.len(),
            trusted = ratings.len(),
            ?status,
            "verified package"
        );

        Verification {
            status,
            review_count: ratings.len(),
        }
    }

    /// Every known identity, ordered by id.
    pub fn list_identities(&self) -> Vec<&PublicId> {
        let mut ids: Vec<_> = self.graph.nodes().collect();
        ids.sort_by(|a, b| a.id.cmp(&b.id));
        ids
    }

    pub fn identity(&self, id: &str) -> Option<&PublicId> {
        self.graph.node(id)
    }

    pub fn package(&self, digest: &str) -> Option<&PackageInfo> {
        self.packages.get(digest)
    }

    pub fn reviews(&self, digest: &str) -> &[Arc<Proof>] {
        self.reviews.get(digest).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&TrustEdge> {
        self.graph.edge(source, target)
    }

    pub fn graph(&self) -> &TrustGraph {
        &self.graph
    }
}

fn repo_dirs(cache_dir: &Path) -> GraphResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(cache_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
