//! Error taxonomy for collector distribution and fact gathering.
//!
//! Configuration-class errors (missing bundled asset, uncreatable collector
//! directory) and IO-class errors (unreadable/unwritable files) are surfaced
//! as typed variants so a hosting service can catch and keep running.
//! Per-collector execution and parse problems are absorbed inside the
//! aggregator and never appear here.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the collector/fact core.
#[derive(Debug, Error)]
pub enum FactsError {
    #[error("collector '{name}' not found in the embedded bundle")]
    AssetMissing { name: String },

    #[error("failed to create collector directory {path}: {source}")]
    DirCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read collector directory {path}: {source}")]
    DirRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write collector {path}: {source}")]
    CollectorWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to bind pull endpoint on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("failed to fetch collector '{name}' from {url}: {source}")]
    Fetch {
        name: String,
        url: String,
        source: reqwest::Error,
    },

    #[error("authority returned {status} for collector '{name}'")]
    FetchStatus { name: String, status: u16 },
}

impl FactsError {
    /// Whether this error is a configuration/packaging problem (as opposed
    /// to a runtime IO failure). Configuration errors are not expected at
    /// steady state and usually mean the deployment is broken.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FactsError::AssetMissing { .. } | FactsError::DirCreate { .. }
        )
    }
}
