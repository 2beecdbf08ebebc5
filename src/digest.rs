//! Content hashing for collector files.
//!
//! Manifests compare collectors by content digest, so an unreadable file is
//! an error here, never an empty digest. A silently wrong digest would
//! corrupt every manifest comparison built on top of it.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs;

use crate::error::FactsError;

/// Compute the SHA-256 digest of a file's full contents, as lowercase hex.
pub async fn file_sha256(path: &Path) -> Result<String, FactsError> {
    let bytes = fs::read(path).await.map_err(|source| FactsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(bytes_sha256(&bytes))
}

/// SHA-256 of a byte slice, as lowercase hex.
pub fn bytes_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
