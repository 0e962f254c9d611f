//! Configuration management for crev.
//!
//! The config file only records which identity is current. Identities are
//! stored separately, so switching the current identity rewrites this file
//! and nothing else.

use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::encoding::to_base64;
use crate::types::IdType;
use crate::{Error, Result};

pub const CONFIG_FORMAT_VERSION: i64 = -1;

const HOST_SALT_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrevConfig {
    pub version: i64,
    pub current_id: CurrentId,
    pub host_salt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CurrentId {
    #[serde(default)]
    pub id_type: IdType,
    pub id: String,
}

impl CrevConfig {
    /// Fresh config pointing at `id`, with a random host salt.
    pub fn new(id: impl Into<String>) -> Self {
        let mut salt = [0u8; HOST_SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self {
            version: CONFIG_FORMAT_VERSION,
            current_id: CurrentId {
                id_type: IdType::Crev,
                id: id.into(),
            },
            host_salt: to_base64(salt),
        }
    }

    /// Load the config file. A missing file yields [`Error::NotFound`].
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = read_yaml_file(path)?;
        debug!(path = %path.display(), current_id = %config.current_id.id, "loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_yaml_file(path, self)?;
        debug!(path = %path.display(), current_id = %self.current_id.id, "saved config");
        Ok(())
    }

    /// Same config with a different current identity.
    pub fn with_current_id(mut self, id: impl Into<String>) -> Self {
        self.current_id.id = id.into();
        self
    }
}

/// Read and deserialize a YAML file.
pub fn read_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::from_io(e, path))?;
    debug!(path = %path.display(), bytes = content.len(), "read yaml file");
    serde_yaml::from_str(&content)
        .map_err(|e| Error::Format(format!("{}: {}", path.display(), e)))
}

/// Serialize to YAML and write, creating parent directories.
pub fn write_yaml_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_yaml::to_string(value)?;
    fs::write(path, &content)?;
    debug!(path = %path.display(), bytes = content.len(), "wrote yaml file");
    Ok(())
}
