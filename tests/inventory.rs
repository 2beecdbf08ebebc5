//! Inventory Integration Tests
//!
//! Tests for manifest construction over a collector directory.

use factd::digest;
use factd::inventory;
use tempfile::TempDir;

#[tokio::test]
async fn test_inventory_twice_on_unchanged_directory_is_identical() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("get_hostname"), b"#!/bin/sh\nhostname\n").unwrap();
    std::fs::write(temp.path().join("get_uptime"), b"#!/bin/sh\nuptime\n").unwrap();

    let first = inventory::build(temp.path()).await.unwrap();
    let second = inventory::build(temp.path()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_subdirectory_has_no_manifest_entry() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("get_hostname"), b"#!/bin/sh\n").unwrap();
    std::fs::create_dir(temp.path().join("tmp")).unwrap();
    std::fs::write(temp.path().join("tmp").join("nested"), b"not a collector").unwrap();

    let manifest = inventory::build(temp.path()).await.unwrap();

    assert_eq!(manifest.len(), 1);
    assert!(!manifest.contains_key("tmp"));
    assert!(!manifest.contains_key("nested"));
}

#[tokio::test]
async fn test_manifest_reflects_current_bytes_not_history() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("get_hostname");

    std::fs::write(&path, b"version one").unwrap();
    let before = inventory::build(temp.path()).await.unwrap();

    std::fs::write(&path, b"version two").unwrap();
    let after = inventory::build(temp.path()).await.unwrap();

    assert_ne!(before.get("get_hostname"), after.get("get_hostname"));
    assert_eq!(
        after.get("get_hostname").unwrap(),
        &digest::file_sha256(&path).await.unwrap()
    );
}

#[tokio::test]
async fn test_empty_directory_yields_empty_manifest() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("collectors");

    let manifest = inventory::build(&dir).await.unwrap();

    assert!(manifest.is_empty());
    assert!(dir.is_dir(), "directory should have been created");
}
