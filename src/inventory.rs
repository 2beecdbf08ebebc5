//! Collector inventory: what does this node currently hold?
//!
//! Scans the collector directory and maps each collector name to the digest
//! of the bytes currently on disk. The manifest is built fresh on every call
//! and never persisted; reconciliation against the authority's manifest is
//! the registry's job, not ours.

use std::collections::HashMap;
use std::path::Path;

use tokio::fs;
use tracing::{debug, warn};

use crate::digest;
use crate::error::FactsError;

/// Point-in-time mapping from collector name to content digest.
pub type CollectorManifest = HashMap<String, String>;

/// Build a manifest of the collectors in `dir`, creating the directory if it
/// does not exist yet.
///
/// Subdirectories are skipped; only leaf files count as collectors, keyed
/// by their base name. Traversal order is not part of the contract. An
/// individual unreadable file is skipped with a warning so one bad entry
/// does not block the whole pass; directory-level failures are returned to
/// the caller.
pub async fn build(dir: &Path) -> Result<CollectorManifest, FactsError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| FactsError::DirCreate {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut manifest = CollectorManifest::new();

    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|source| FactsError::DirRead {
            path: dir.to_path_buf(),
            source,
        })?;

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => {
                return Err(FactsError::DirRead {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };

        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .map_err(|source| FactsError::DirRead {
                path: dir.to_path_buf(),
                source,
            })?;
        if file_type.is_dir() {
            debug!(path = %path.display(), "Skipping subdirectory in collector dir");
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();

        match digest::file_sha256(&path).await {
            Ok(hash) => {
                manifest.insert(name, hash);
            }
            Err(e) => {
                // One unreadable file must not block the inventory pass.
                warn!(collector = %name, error = %e, "Skipping unreadable collector");
            }
        }
    }

    Ok(manifest)
}
