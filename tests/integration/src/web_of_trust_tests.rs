//! Web-of-trust scenarios from identity creation to dependency verdicts.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crev_core::{Rating, TrustLevel};
use crev_trust_graph::{
    verify_dependencies, DependencyKind, Lockfile, PackageLockV2, ProofDatabase,
    VerificationStatus,
};

use crate::test_utils::{march, write_package, TestUser};

struct Workspace {
    _dir: TempDir,
    home: PathBuf,
    remotes: PathBuf,
    modules: PathBuf,
}

impl Workspace {
    fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let home = dir.path().join("home");
        let remotes = dir.path().join("remotes");
        let modules = dir.path().join("node_modules");
        fs::create_dir_all(&remotes)?;
        fs::create_dir_all(&modules)?;
        Ok(Self {
            _dir: dir,
            home,
            remotes,
            modules,
        })
    }

    fn user(&self, name: &str) -> Result<TestUser> {
        TestUser::create(name, &self.home, &self.remotes)
    }
}

#[tokio::test]
async fn test_review_reaches_through_trust_chain() -> Result<()> {
    crev_core::logging::try_init();
    let ws = Workspace::new()?;

    tracing::info!("Step 1: Create identities");
    let alice = ws.user("alice")?;
    let bob = ws.user("bob")?;
    let carol = ws.user("carol")?;
    let dave = ws.user("dave")?;

    tracing::info!("Step 2: Publish trust chain alice -> bob -> carol");
    alice.trust(&[&bob], TrustLevel::High, march(1))?;
    bob.trust(&[&carol], TrustLevel::Medium, march(2))?;

    tracing::info!("Step 3: Carol reviews an installed package");
    let (package, digest) = write_package(&ws.modules, "left-pad", "module.exports = pad;")?;
    carol.review(&package, "left-pad", Rating::Positive)?;

    tracing::info!("Step 4: Load every fetched repository");
    let mut db = ProofDatabase::new();
    let failures = db.load_cache(&ws.remotes)?;
    assert!(failures.is_empty());

    let digest = digest.to_base64();
    for user in [&alice, &bob, &carol] {
        let verdict = db.verify(&user.id(), &digest);
        assert_eq!(verdict.status, VerificationStatus::Pass);
        assert_eq!(verdict.review_count, 1);
    }

    tracing::info!("Step 5: An unconnected identity sees no trusted reviews");
    let verdict = db.verify(&dave.id(), &digest);
    assert_eq!(verdict.status, VerificationStatus::None);
    assert_eq!(verdict.review_count, 0);

    let known: Vec<String> = db.list_identities().iter().map(|id| id.id.clone()).collect();
    let mut expected = vec![alice.id(), bob.id(), carol.id()];
    expected.sort();
    assert_eq!(known, expected);
    assert_eq!(db.package(&digest).map(|p| p.name.as_str()), Some("left-pad"));

    Ok(())
}

#[tokio::test]
async fn test_negative_review_fails_package() -> Result<()> {
    crev_core::logging::try_init();
    let ws = Workspace::new()?;

    let alice = ws.user("alice")?;
    let bob = ws.user("bob")?;
    let carol = ws.user("carol")?;
    alice.trust(&[&bob, &carol], TrustLevel::High, march(1))?;

    let (package, digest) = write_package(&ws.modules, "event-stream", "steal(wallets);")?;
    bob.review(&package, "event-stream", Rating::Positive)?;
    carol.review(&package, "event-stream", Rating::Dangerous)?;

    let mut db = ProofDatabase::new();
    assert!(db.load_cache(&ws.remotes)?.is_empty());

    let verdict = db.verify(&alice.id(), &digest.to_base64());
    assert_eq!(verdict.status, VerificationStatus::Fail);
    assert_eq!(verdict.review_count, 2);
    Ok(())
}

#[tokio::test]
async fn test_later_distrust_replaces_trust_edge() -> Result<()> {
    crev_core::logging::try_init();
    let ws = Workspace::new()?;

    let bob = ws.user("bob")?;
    let eve = ws.user("eve")?;
    bob.trust(&[&eve], TrustLevel::High, march(1))?;
    bob.trust(&[&eve], TrustLevel::Distrust, march(9))?;

    let (package, digest) = write_package(&ws.modules, "pad-left", "module.exports = 1;")?;
    eve.review(&package, "pad-left", Rating::Strong)?;

    let mut db = ProofDatabase::new();
    assert!(db.load_cache(&ws.remotes)?.is_empty());

    let edge = db.edge(&bob.id(), &eve.id()).expect("edge from bob to eve");
    assert_eq!(edge.level, TrustLevel::Distrust);
    assert_eq!(edge.date, march(9));

    // Distrust edges are still followed when collecting trusted issuers.
    let verdict = db.verify(&bob.id(), &digest.to_base64());
    assert_eq!(verdict.status, VerificationStatus::Pass);
    assert_eq!(verdict.review_count, 1);
    Ok(())
}

#[tokio::test]
async fn test_tampered_repository_is_skipped() -> Result<()> {
    crev_core::logging::try_init();
    let ws = Workspace::new()?;

    let alice = ws.user("alice")?;
    let mallory = ws.user("mallory")?;
    alice.trust(&[&mallory], TrustLevel::Low, march(1))?;

    let (package, digest) = write_package(&ws.modules, "is-odd", "module.exports = n => n % 2;")?;
    let review = mallory.review(&package, "is-odd", Rating::Negative)?;

    tracing::info!("Step 1: Rewrite the rating after signing");
    let document = fs::read_to_string(&review)?;
    fs::write(&review, document.replace("negative", "positive"))?;

    let mut db = ProofDatabase::new();
    let failures = db.load_cache(&ws.remotes)?;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, mallory.repo_dir());

    // Alice's own repository still loaded.
    assert!(db.edge(&alice.id(), &mallory.id()).is_some());
    let verdict = db.verify(&alice.id(), &digest.to_base64());
    assert_eq!(verdict.status, VerificationStatus::None);
    assert!(db.reviews(&digest.to_base64()).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_concurrent_load_matches_sequential() -> Result<()> {
    crev_core::logging::try_init();
    let ws = Workspace::new()?;

    let users = ["alice", "bob", "carol", "dave"]
        .iter()
        .map(|name| ws.user(name))
        .collect::<Result<Vec<_>>>()?;
    for pair in users.windows(2) {
        pair[0].trust(&[&pair[1]], TrustLevel::Medium, march(3))?;
    }
    let (package, digest) = write_package(&ws.modules, "chalk", "module.exports = {};")?;
    users[3].review(&package, "chalk", Rating::Positive)?;

    let mut sequential = ProofDatabase::new();
    assert!(sequential.load_cache(&ws.remotes)?.is_empty());

    let repos = users.iter().map(TestUser::repo_dir).collect();
    let mut concurrent = ProofDatabase::new();
    assert!(concurrent.load_repos_concurrently(repos).await.is_empty());

    let digest = digest.to_base64();
    assert_eq!(
        concurrent.verify(&users[0].id(), &digest),
        sequential.verify(&users[0].id(), &digest)
    );
    assert_eq!(
        concurrent.graph().edge_count(),
        sequential.graph().edge_count()
    );
    assert!(concurrent.graph().has_path(&users[0].id(), &users[3].id()));
    Ok(())
}

#[tokio::test]
async fn test_verify_lockfile_dependencies() -> Result<()> {
    crev_core::logging::try_init();
    let ws = Workspace::new()?;

    let me = ws.user("me")?;
    let reviewer = ws.user("reviewer")?;
    me.trust(&[&reviewer], TrustLevel::High, march(1))?;

    let (lodash, _) = write_package(&ws.modules, "lodash", "module.exports = _;")?;
    write_package(&ws.modules, "mocha", "module.exports = describe;")?;
    reviewer.review(&lodash, "lodash", Rating::Positive)?;

    let lockfile = PackageLockV2::new(
        r#"{
  "name": "app",
  "lockfileVersion": 2,
  "packages": {
    "": {
      "name": "app",
      "dependencies": { "lodash": "^4.17.21" },
      "devDependencies": { "mocha": "^9.0.0" }
    }
  },
  "dependencies": {
    "lodash": { "version": "4.17.21" },
    "mocha": { "version": "9.2.2", "dev": true }
  }
}"#,
    );
    assert!(lockfile.check());
    let dependencies = lockfile.dependencies()?;

    let mut db = ProofDatabase::new();
    assert!(db.load_cache(&ws.remotes)?.is_empty());

    let statuses = verify_dependencies(&db, &me.id(), &dependencies, &ws.modules)?;
    assert_eq!(statuses.len(), 2);

    let lodash = &statuses[0];
    assert_eq!(lodash.name, "lodash");
    assert_eq!(lodash.version, "4.17.21");
    assert_eq!(lodash.kind, DependencyKind::Normal);
    assert_eq!(lodash.verification.status, VerificationStatus::Pass);

    let mocha = &statuses[1];
    assert_eq!(mocha.name, "mocha");
    assert_eq!(mocha.kind, DependencyKind::Dev);
    assert_eq!(mocha.verification.status, VerificationStatus::None);

    fs::remove_dir_all(ws.modules.join("mocha"))?;
    assert!(verify_dependencies(&db, &me.id(), &dependencies, &ws.modules).is_err());
    Ok(())
}
