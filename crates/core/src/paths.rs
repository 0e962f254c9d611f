//! On-disk layout of crev state.
//!
//! ```text
//! <config>/config.yaml          current identity pointer
//! <config>/ids/<id>.yaml        sealed identities
//! <config>/proofs/              proofs created locally, one repo per url
//! <cache>/remotes/              fetched proof repositories
//! ```

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

const APPLICATION: &str = "crev";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrevPaths {
    config_dir: PathBuf,
    cache_dir: PathBuf,
}

impl CrevPaths {
    /// Platform default locations (e.g. `~/.config/crev` on Linux).
    pub fn from_project_dirs() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", APPLICATION).ok_or_else(|| {
            Error::Config("could not determine a home directory for crev".to_string())
        })?;
        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            cache_dir: dirs.cache_dir().to_path_buf(),
        })
    }

    /// Everything under one root directory.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.join("config"),
            cache_dir: root.join("cache"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.yaml")
    }

    pub fn ids_dir(&self) -> PathBuf {
        self.config_dir.join("ids")
    }

    pub fn id_file(&self, id: &str) -> PathBuf {
        self.ids_dir().join(format!("{}.yaml", id))
    }

    /// Where locally created proofs are written.
    pub fn proofs_dir(&self) -> PathBuf {
        self.config_dir.join("proofs")
    }

    /// Where fetched proof repositories live.
    pub fn remotes_dir(&self) -> PathBuf {
        self.cache_dir.join("remotes")
    }
}
