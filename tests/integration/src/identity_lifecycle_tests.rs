//! Identity store behaviour as seen by a user switching between ids.

use anyhow::Result;
use tempfile::TempDir;

use crev_core::{CrevConfig, CrevPaths, TrustLevel};
use crev_identity::{IdStore, IdentityError};
use crev_proof::{load_document, write_proof, Proof};

use crate::test_utils::{fast_params, PASSWORD};

#[tokio::test]
async fn test_create_switch_and_sign() -> Result<()> {
    crev_core::logging::try_init();
    let dir = TempDir::new()?;
    let store = IdStore::new(CrevPaths::with_root(dir.path()));

    tracing::info!("Step 1: No identity yet");
    assert!(store.current()?.is_none());
    assert!(matches!(
        store.require_current(),
        Err(IdentityError::NoCurrentIdentity)
    ));

    tracing::info!("Step 2: Each new identity becomes current");
    let work = store.create("https://github.com/me/work-proofs", PASSWORD, &fast_params())?;
    let home = store.create("https://github.com/me/home-proofs", PASSWORD, &fast_params())?;
    assert_eq!(store.require_current()?.id, home.id());
    assert_eq!(store.list()?.len(), 2);

    tracing::info!("Step 3: Switch back and sign with the unsealed key");
    store.set_current(&work.id())?;
    let config = CrevConfig::load(&store.paths().config_file())?;
    assert_eq!(config.current_id.id, work.id());

    let current = store.require_current()?;
    let unsealed = store.unseal(&current.id, PASSWORD)?;
    let proof = Proof::trust(unsealed.public_id(), vec![home.public_id()], TrustLevel::High);
    let path = write_proof(&store.paths().proofs_dir(), &unsealed, proof)?;

    let loaded = load_document(&path)?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].issuer().id, work.id());
    Ok(())
}

#[tokio::test]
async fn test_wrong_password_is_rejected() -> Result<()> {
    crev_core::logging::try_init();
    let dir = TempDir::new()?;
    let store = IdStore::new(CrevPaths::with_root(dir.path()));
    let id = store.create("https://github.com/me/crev-proofs", PASSWORD, &fast_params())?;

    let err = store.unseal(&id.id(), "hunter2").unwrap_err();
    assert!(matches!(err, IdentityError::Authentication));

    let unsealed = store.unseal(&id.id(), PASSWORD)?;
    assert_eq!(unsealed.public_id(), id.public_id());
    Ok(())
}

#[tokio::test]
async fn test_unknown_identity() -> Result<()> {
    let dir = TempDir::new()?;
    let store = IdStore::new(CrevPaths::with_root(dir.path()));
    assert!(matches!(
        store.set_current("no-such-id"),
        Err(IdentityError::NotFound { .. })
    ));
    assert!(matches!(
        store.unseal("no-such-id", PASSWORD),
        Err(IdentityError::NotFound { .. })
    ));
    Ok(())
}
