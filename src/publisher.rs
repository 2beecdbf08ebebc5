//! Canonical collector publishing (runs on the authority).
//!
//! Materializes every bundled collector into the collector directory with
//! executable permission, hashes the on-disk copies into a manifest, and
//! starts the pull endpoint so agents can fetch them. Materialization is
//! deterministic, so re-running it reproduces the manifest and overwrites
//! any tampered or stale copy on disk.

use std::path::Path;

use tokio::fs;
use tracing::{debug, info};

use crate::assets;
use crate::config::FactsConfig;
use crate::digest;
use crate::error::FactsError;
use crate::inventory::CollectorManifest;
use crate::server::CollectorServer;

/// Materialize the canonical collector set and start serving it.
///
/// Returns the authority's manifest and a handle to the running pull
/// endpoint. The endpoint task does not block the caller; the directory is
/// fully materialized before serving starts, so the two never race.
pub async fn publish(
    config: &FactsConfig,
) -> Result<(CollectorManifest, CollectorServer), FactsError> {
    let manifest = materialize(&config.collector_dir).await?;

    let server = CollectorServer::start(config.collector_dir.clone(), config.port).await?;

    info!(
        collectors = manifest.len(),
        addr = %server.local_addr(),
        "Published canonical collector set"
    );

    Ok((manifest, server))
}

/// Write every bundled collector into `dir` and return name → digest.
///
/// Idempotent: same bundled bytes under the same names, every time. Existing
/// files are overwritten, which is the integrity-repair path for agents (and
/// authorities) holding drifted copies.
pub async fn materialize(dir: &Path) -> Result<CollectorManifest, FactsError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| FactsError::DirCreate {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut manifest = CollectorManifest::new();

    for name in assets::collector_names() {
        let bytes = assets::collector_asset(name)?;
        let path = dir.join(name);

        fs::write(&path, bytes)
            .await
            .map_err(|source| FactsError::CollectorWrite {
                path: path.clone(),
                source,
            })?;
        set_executable(&path).await?;

        // Hash what actually landed on disk, not the bundled bytes.
        let hash = digest::file_sha256(&path).await?;
        debug!(collector = name, digest = %hash, "Materialized collector");
        manifest.insert(name.to_string(), hash);
    }

    Ok(manifest)
}

#[cfg(unix)]
async fn set_executable(path: &Path) -> Result<(), FactsError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(0o744))
        .await
        .map_err(|source| FactsError::CollectorWrite {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
async fn set_executable(_path: &Path) -> Result<(), FactsError> {
    Ok(())
}
