//! Project lockfiles as a source of dependencies to verify.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::{GraphError, GraphResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Normal,
    Dev,
}

/// A direct dependency of the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    pub kind: DependencyKind,
}

/// A lockfile format.
pub trait Lockfile {
    /// Whether the contents are actually in this format.
    fn check(&self) -> bool;

    /// Direct dependencies of the project.
    fn dependencies(&self) -> GraphResult<Vec<Dependency>>;
}

/// npm `package-lock.json` with `lockfileVersion: 2`.
#[derive(Debug, Clone)]
pub struct PackageLockV2 {
    contents: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageLockFile {
    lockfile_version: Option<u32>,
    #[serde(default)]
    packages: HashMap<String, PackageEntry>,
    #[serde(default)]
    dependencies: HashMap<String, LockedDependency>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageEntry {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct LockedDependency {
    version: String,
    #[serde(default)]
    dev: bool,
}

impl PackageLockV2 {
    const VERSION: u32 = 2;

    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }

    pub fn open(path: &Path) -> GraphResult<Self> {
        Ok(Self::new(fs::read_to_string(path)?))
    }

    fn parse(&self) -> GraphResult<PackageLockFile> {
        Ok(serde_json::from_str(&self.contents)?)
    }
}

impl Lockfile for PackageLockV2 {
    fn check(&self) -> bool {
        self.parse()
            .map(|lockfile| lockfile.lockfile_version == Some(Self::VERSION))
            .unwrap_or(false)
    }

    /// Dependencies and dev dependencies of the root package (`packages[""]`),
    /// with versions and dev flags from the top-level `dependencies` map.
    fn dependencies(&self) -> GraphResult<Vec<Dependency>> {
        let lockfile = self.parse()?;
        let root = lockfile
            .packages
            .get("")
            .ok_or_else(|| GraphError::Lockfile("no root package entry".to_string()))?;

        let mut names: Vec<&String> = root.dependencies.keys().collect();
        names.extend(
            root.dev_dependencies
                .keys()
                .filter(|name| !root.dependencies.contains_key(*name)),
        );

        names
            .into_iter()
            .map(|name| {
                let locked = lockfile.dependencies.get(name).ok_or_else(|| {
                    GraphError::Lockfile(format!("{} is not in the dependencies map", name))
                })?;
                Ok(Dependency {
                    name: name.clone(),
                    version: locked.version.clone(),
                    kind: if locked.dev {
                        DependencyKind::Dev
                    } else {
                        DependencyKind::Normal
                    },
                })
            })
            .collect()
    }
}
