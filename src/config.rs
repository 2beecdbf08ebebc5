//! Configuration for factd paths and the pull endpoint.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (FACTD_COLLECTOR_DIR, FACTD_PORT,
//!    FACTD_COLLECTOR_TIMEOUT)
//! 2. Config file (YAML, passed explicitly)
//! 3. Defaults (~/.factd/collectors, port 8090, 30s per collector)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Directory holding one file per collector
    pub collector_dir: Option<PathBuf>,
    /// Port the authority serves collectors on
    pub port: Option<u16>,
    /// Per-collector execution deadline in seconds
    pub collector_timeout_seconds: Option<u64>,
}

/// Resolved configuration used by every operation in this crate.
#[derive(Debug, Clone)]
pub struct FactsConfig {
    /// Directory holding one file per collector
    pub collector_dir: PathBuf,
    /// Port the authority serves collectors on
    pub port: u16,
    /// Per-collector execution deadline
    pub collector_timeout: Duration,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            collector_dir: default_collector_dir(),
            port: 8090,
            collector_timeout: Duration::from_secs(30),
        }
    }
}

fn default_collector_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".factd")
        .join("collectors")
}

impl FactsConfig {
    /// Resolve configuration from an optional YAML file plus environment
    /// overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_yaml::from_str::<ConfigFile>(&content)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => ConfigFile::default(),
        };

        let defaults = FactsConfig::default();

        let collector_dir = std::env::var("FACTD_COLLECTOR_DIR")
            .map(PathBuf::from)
            .ok()
            .or(file.collector_dir)
            .unwrap_or(defaults.collector_dir);

        let port = match std::env::var("FACTD_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid FACTD_PORT value: {}", raw))?,
            Err(_) => file.port.unwrap_or(defaults.port),
        };

        let timeout_seconds = match std::env::var("FACTD_COLLECTOR_TIMEOUT") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("Invalid FACTD_COLLECTOR_TIMEOUT value: {}", raw))?,
            Err(_) => file
                .collector_timeout_seconds
                .unwrap_or(defaults.collector_timeout.as_secs()),
        };

        Ok(Self {
            collector_dir,
            port,
            collector_timeout: Duration::from_secs(timeout_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = FactsConfig::default();
        assert_eq!(config.port, 8090);
        assert_eq!(config.collector_timeout, Duration::from_secs(30));
        assert!(config.collector_dir.ends_with(".factd/collectors"));
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("factd.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
collector_dir: /var/lib/factd/collectors
port: 9999
collector_timeout_seconds: 5
"#
        )
        .unwrap();

        let config = FactsConfig::load(Some(&config_path)).unwrap();
        assert_eq!(
            config.collector_dir,
            PathBuf::from("/var/lib/factd/collectors")
        );
        assert_eq!(config.port, 9999);
        assert_eq!(config.collector_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_partial_config_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("factd.yaml");
        std::fs::write(&config_path, "port: 7070\n").unwrap();

        let config = FactsConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config.port, 7070);
        assert_eq!(config.collector_timeout, Duration::from_secs(30));
    }
}
