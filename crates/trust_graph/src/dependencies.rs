//! Verification of a project's installed dependencies.

use std::path::Path;

use crev_crypto::{recursive_digest, Digest};

use crate::db::{ProofDatabase, Verification};
use crate::lockfile::{Dependency, DependencyKind};
use crate::{GraphError, GraphResult};

/// Verdict for one installed dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyStatus {
    pub name: String,
    pub version: String,
    pub kind: DependencyKind,
    pub digest: Digest,
    pub verification: Verification,
}

/// Digest each dependency under `modules_dir/<name>` and verify it for
/// `self_id`.
///
/// A dependency that is not installed yields
/// [`GraphError::PackageNotFound`].
pub fn verify_dependencies(
    db: &ProofDatabase,
    self_id: &str,
    dependencies: &[Dependency],
    modules_dir: &Path,
) -> GraphResult<Vec<DependencyStatus>> {
    dependencies
        .iter()
        .map(|dependency| {
            let path = modules_dir.join(&dependency.name);
            if !path.is_dir() {
                return Err(GraphError::PackageNotFound {
                    name: dependency.name.clone(),
                    path,
                });
            }
            let digest = recursive_digest(&path)?;
            let verification = db.verify(self_id, &digest.to_base64());
            tracing::debug!(
                name = %dependency.name,
                digest = %digest,
                status = ?verification.status,
                "verified dependency"
            );
            Ok(DependencyStatus {
                name: dependency.name.clone(),
                version: dependency.version.clone(),
                kind: dependency.kind,
                digest,
                verification,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::VerificationStatus;
    use crev_core::{Level, Rating, TrustLevel};
    use crev_identity::UnsealedId;
    use crev_proof::{PackageInfo, Proof, ReviewInfo};
    use std::fs;

    fn install(modules: &Path, name: &str, source: &str) {
        let dir = modules.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.js"), source).unwrap();
        fs::write(dir.join("package.json"), format!("{{\"name\":\"{}\"}}", name)).unwrap();
    }

    fn dependency(name: &str) -> Dependency {
        Dependency {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            kind: DependencyKind::Normal,
        }
    }

    #[test]
    fn test_verify_installed_dependencies() {
        let modules = tempfile::tempdir().unwrap();
        install(modules.path(), "left-pad", "module.exports = pad;");
        install(modules.path(), "@scope/util", "module.exports = {};");

        let me = UnsealedId::generate("https://example.com/me");
        let reviewer = UnsealedId::generate("https://example.com/reviewer");
        let digest = recursive_digest(modules.path().join("left-pad")).unwrap();

        let mut db = ProofDatabase::new();
        db.add_proof(Proof::trust(
            me.public_id(),
            vec![reviewer.public_id()],
            TrustLevel::Medium,
        ));
        db.add_proof(Proof::package_review(
            reviewer.public_id(),
            PackageInfo::new("https://npmjs.org", "left-pad", "1.0.0", digest.to_base64()),
            ReviewInfo {
                thoroughness: Level::Low,
                understanding: Level::Low,
                rating: Rating::Positive,
            },
        ));

        let statuses = verify_dependencies(
            &db,
            &me.id(),
            &[dependency("left-pad"), dependency("@scope/util")],
            modules.path(),
        )
        .unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].digest, digest);
        assert_eq!(statuses[0].verification.status, VerificationStatus::Pass);
        assert_eq!(statuses[0].verification.review_count, 1);
        assert_eq!(statuses[1].verification.status, VerificationStatus::None);
    }

    #[test]
    fn test_missing_package_directory() {
        let modules = tempfile::tempdir().unwrap();
        let db = ProofDatabase::new();
        let err = verify_dependencies(&db, "me", &[dependency("absent")], modules.path())
            .unwrap_err();
        assert!(matches!(err, GraphError::PackageNotFound { name, .. } if name == "absent"));
    }
}
