//! On-disk identity store.
//!
//! Sealed identities live in `<config>/ids/<id>.yaml`; the config file
//! points at the current one.

use std::fs;
use std::io;

use crev_core::config::{read_yaml_file, write_yaml_file};
use crev_core::{CrevConfig, CrevPaths, PublicId};
use crev_crypto::SealParams;

use crate::id::{SealedId, UnsealedId};
use crate::{IdentityError, IdentityResult};

const ID_FILE_EXTENSION: &str = "yaml";

/// Identity store rooted at a set of [`CrevPaths`].
#[derive(Debug, Clone)]
pub struct IdStore {
    paths: CrevPaths,
}

impl IdStore {
    pub fn new(paths: CrevPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &CrevPaths {
        &self.paths
    }

    /// Generate, seal and persist a new identity, then make it current.
    pub fn create(
        &self,
        url: &str,
        password: &str,
        params: &SealParams,
    ) -> IdentityResult<UnsealedId> {
        let unsealed = UnsealedId::generate(url);
        let sealed = SealedId::seal(&unsealed, password, params)?;
        self.save(&sealed)?;
        self.write_current(sealed.id())?;
        tracing::info!(id = %sealed.id(), url = %url, "created identity");
        Ok(unsealed)
    }

    pub fn save(&self, sealed: &SealedId) -> IdentityResult<()> {
        write_yaml_file(&self.paths.id_file(sealed.id()), sealed)?;
        Ok(())
    }

    /// Read a sealed identity. Unknown ids yield [`IdentityError::NotFound`].
    pub fn load(&self, id: &str) -> IdentityResult<SealedId> {
        read_yaml_file(&self.paths.id_file(id)).map_err(|e| {
            if e.is_not_found() {
                IdentityError::NotFound { id: id.to_string() }
            } else {
                e.into()
            }
        })
    }

    pub fn unseal(&self, id: &str, password: &str) -> IdentityResult<UnsealedId> {
        self.load(id)?.unseal(password)
    }

    /// The current identity.
    ///
    /// `Ok(None)` when no config exists yet; [`IdentityError::NotFound`]
    /// when the config points at a missing identity file.
    pub fn current(&self) -> IdentityResult<Option<PublicId>> {
        let config = match CrevConfig::load(&self.paths.config_file()) {
            Ok(config) => config,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let sealed = self.load(&config.current_id.id)?;
        Ok(Some(sealed.to_public_id()))
    }

    pub fn require_current(&self) -> IdentityResult<PublicId> {
        self.current()?.ok_or(IdentityError::NoCurrentIdentity)
    }

    /// Point the config at `id`. Identity files are left untouched.
    pub fn set_current(&self, id: &str) -> IdentityResult<()> {
        self.load(id)?;
        self.write_current(id)?;
        tracing::info!(id = %id, "switched current identity");
        Ok(())
    }

    /// Every sealed identity in the store, ordered by id.
    pub fn list(&self) -> IdentityResult<Vec<PublicId>> {
        let entries = match fs::read_dir(self.paths.ids_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(ID_FILE_EXTENSION)
            {
                continue;
            }
            let sealed: SealedId = read_yaml_file(&path)?;
            ids.push(sealed.to_public_id());
        }
        ids.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(ids)
    }

    fn write_current(&self, id: &str) -> IdentityResult<()> {
        let path = self.paths.config_file();
        let config = match CrevConfig::load(&path) {
            Ok(config) => config.with_current_id(id),
            Err(e) if e.is_not_found() => CrevConfig::new(id),
            Err(e) => return Err(e.into()),
        };
        config.save(&path)?;
        Ok(())
    }
}
