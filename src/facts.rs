//! Fact gathering: execute every installed collector and aggregate output.
//!
//! Each collector is an independently executable program invoked with no
//! arguments. Its stdout is expected to be a JSON object with exactly one
//! top-level key (the fact name). Anything else (parse failure, wrong key
//! count, non-zero exit, spawn failure, timeout) yields no fact for that
//! collector and never fails the run. A bad collector must not corrupt the
//! aggregate.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::fs;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::FactsConfig;
use crate::error::FactsError;

/// Everything known about this node's environment, keyed by fact name.
pub type FactSet = HashMap<String, Value>;

/// Run every collector in the configured directory sequentially and fold
/// their single-key records into one fact set.
///
/// Duplicate fact names across collectors resolve last-writer-wins in
/// traversal order, which is not guaranteed stable; the overwrite is logged
/// so operators can spot the collision.
pub async fn gather(config: &FactsConfig) -> Result<FactSet, FactsError> {
    let dir = &config.collector_dir;

    fs::create_dir_all(dir)
        .await
        .map_err(|source| FactsError::DirCreate {
            path: dir.clone(),
            source,
        })?;

    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|source| FactsError::DirRead {
            path: dir.clone(),
            source,
        })?;

    let mut facts = FactSet::new();

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => {
                return Err(FactsError::DirRead {
                    path: dir.clone(),
                    source,
                })
            }
        };

        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .map_err(|source| FactsError::DirRead {
                path: dir.clone(),
                source,
            })?;
        if file_type.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();

        if let Some((fact_name, value)) =
            run_collector(&name, &path, config.collector_timeout).await
        {
            if let Some(previous) = facts.insert(fact_name.clone(), value) {
                warn!(
                    fact = %fact_name,
                    collector = %name,
                    ?previous,
                    "Fact name collision, keeping the later value"
                );
            }
        }
    }

    Ok(facts)
}

/// Execute one collector and extract its single-key record.
///
/// Returns `None` for every unusable outcome; the distinction between
/// "collector broken" (spawn failure, non-zero exit, timeout, logged at warn)
/// and "collector produced nothing usable" (malformed output, logged at
/// debug) lives in
/// the log levels.
async fn run_collector(
    name: &str,
    path: &Path,
    deadline: Duration,
) -> Option<(String, Value)> {
    let child = match Command::new(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            warn!(collector = name, error = %e, "Failed to spawn collector");
            return None;
        }
    };

    let output = match timeout(deadline, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            warn!(collector = name, error = %e, "Failed to wait for collector");
            return None;
        }
        Err(_) => {
            // kill_on_drop reaps the stalled process when the future drops.
            warn!(collector = name, ?deadline, "Collector timed out, output discarded");
            return None;
        }
    };

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            collector = name,
            exit_code = code,
            stderr = %stderr.trim(),
            "Collector exited non-zero, output discarded"
        );
        return None;
    }

    parse_record(name, &output.stdout)
}

/// Parse collector stdout as a single-key JSON object.
fn parse_record(name: &str, stdout: &[u8]) -> Option<(String, Value)> {
    let record: serde_json::Map<String, Value> = match serde_json::from_slice(stdout) {
        Ok(record) => record,
        Err(e) => {
            debug!(collector = name, error = %e, "Collector output is not a JSON object");
            return None;
        }
    };

    if record.len() != 1 {
        debug!(
            collector = name,
            keys = record.len(),
            "Collector record must contain exactly one key, discarding"
        );
        return None;
    }

    record.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_key_record_is_accepted() {
        let record = parse_record("get_hostname", br#"{"hostname": "node1"}"#);
        assert_eq!(
            record,
            Some(("hostname".to_string(), Value::String("node1".to_string())))
        );
    }

    #[test]
    fn test_empty_record_is_discarded() {
        assert_eq!(parse_record("c", b"{}"), None);
    }

    #[test]
    fn test_multi_key_record_is_discarded() {
        assert_eq!(parse_record("c", br#"{"a": 1, "b": 2}"#), None);
    }

    #[test]
    fn test_non_object_output_is_discarded() {
        assert_eq!(parse_record("c", b"not json"), None);
        assert_eq!(parse_record("c", b"[1, 2]"), None);
        assert_eq!(parse_record("c", b""), None);
    }

    #[test]
    fn test_structured_value_survives_intact() {
        let record = parse_record("get_interfaces", br#"{"interfaces": ["eth0", "lo"]}"#);
        let (name, value) = record.unwrap();
        assert_eq!(name, "interfaces");
        assert_eq!(value, serde_json::json!(["eth0", "lo"]));
    }
}
