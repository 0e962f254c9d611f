//! Fixtures shared by the integration tests.

use anyhow::Result;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crev_core::{CrevPaths, Level, PublicId, Rating, TrustLevel};
use crev_crypto::{recursive_digest, Digest, SealParams};
use crev_identity::{IdStore, UnsealedId};
use crev_proof::{sanitize_url_for_fs, write_proof, PackageInfo, Proof, ReviewInfo};

pub const PASSWORD: &str = "correct horse battery staple";

/// Cheap Argon2 settings so tests stay fast.
pub fn fast_params() -> SealParams {
    SealParams {
        iterations: 1,
        memory_size: 64,
        lanes: 1,
        ..SealParams::default()
    }
}

/// Noon UTC on the given day of March 2021.
pub fn march(day: u32) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2021, 3, day, 12, 0, 0)
        .single()
        .expect("valid March date")
        .into()
}

/// A user with their own crev home, publishing proofs into a shared
/// directory of repositories.
pub struct TestUser {
    pub store: IdStore,
    pub id: UnsealedId,
    remotes: PathBuf,
}

impl TestUser {
    pub fn create(name: &str, home: &Path, remotes: &Path) -> Result<Self> {
        let store = IdStore::new(CrevPaths::with_root(home.join(name)));
        let url = format!("https://github.com/{}/crev-proofs", name);
        let id = store.create(&url, PASSWORD, &fast_params())?;
        Ok(Self {
            store,
            id,
            remotes: remotes.to_path_buf(),
        })
    }

    pub fn public_id(&self) -> PublicId {
        self.id.public_id()
    }

    pub fn id(&self) -> String {
        self.id.id()
    }

    /// Directory of this user's proof repository.
    pub fn repo_dir(&self) -> PathBuf {
        self.remotes.join(sanitize_url_for_fs(self.id.url()))
    }

    pub fn trust(
        &self,
        others: &[&TestUser],
        level: TrustLevel,
        date: DateTime<FixedOffset>,
    ) -> Result<PathBuf> {
        let ids = others.iter().map(|other| other.public_id()).collect();
        let proof = Proof::trust(self.public_id(), ids, level).with_date(date);
        self.publish(proof)
    }

    pub fn review(&self, package: &Path, name: &str, rating: Rating) -> Result<PathBuf> {
        let digest = recursive_digest(package)?;
        let proof = Proof::package_review(
            self.public_id(),
            PackageInfo::new("https://registry.npmjs.com", name, "1.0.0", digest.to_base64()),
            ReviewInfo {
                thoroughness: Level::Medium,
                understanding: Level::High,
                rating,
            },
        )
        .with_comment(format!("reviewed {}", name));
        self.publish(proof)
    }

    fn publish(&self, proof: Proof) -> Result<PathBuf> {
        // Unseal per signing operation; the key is dropped right after.
        let unsealed = self.store.unseal(&self.id(), PASSWORD)?;
        Ok(write_proof(&self.remotes, &unsealed, proof)?)
    }
}

/// Write a small npm-like package and return its directory and digest.
pub fn write_package(root: &Path, name: &str, source: &str) -> Result<(PathBuf, Digest)> {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("lib"))?;
    fs::write(
        dir.join("package.json"),
        format!("{{\"name\":\"{}\",\"version\":\"1.0.0\"}}", name),
    )?;
    fs::write(dir.join("lib").join("index.js"), source)?;
    let digest = recursive_digest(&dir)?;
    Ok((dir, digest))
}
