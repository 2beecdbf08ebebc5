//! Pull client: install collectors from an authority's pull endpoint.
//!
//! The agent half of collector distribution. Given a collector name, fetch
//! its raw bytes over HTTP and install them into the local collector
//! directory with executable permission. The install is atomic (temp file in
//! the target directory, then rename) so a concurrent inventory or fact pass
//! never sees a half-written collector.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::digest;
use crate::error::FactsError;

/// HTTP client for an authority's pull endpoint.
pub struct PullClient {
    base_url: String,
    client: reqwest::Client,
}

impl PullClient {
    /// Create a client for an authority at `base_url`
    /// (e.g. `http://authority:8090`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch collector `name` and install it into `dir`, returning the
    /// digest of the installed file so the caller can verify it against the
    /// authority's manifest.
    pub async fn fetch(&self, name: &str, dir: &Path) -> Result<String, FactsError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), name);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FactsError::Fetch {
                name: name.to_string(),
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FactsError::FetchStatus {
                name: name.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FactsError::Fetch {
                name: name.to_string(),
                url,
                source,
            })?;

        let path = dir.join(name);
        install(&bytes, dir, &path)?;

        let hash = digest::file_sha256(&path).await?;
        info!(collector = name, digest = %hash, "Installed collector");
        Ok(hash)
    }
}

/// Write bytes to a temp file in `dir`, mark executable, rename into place.
fn install(bytes: &[u8], dir: &Path, path: &Path) -> Result<(), FactsError> {
    let write_err = |source: std::io::Error| FactsError::CollectorWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o744))
            .map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
