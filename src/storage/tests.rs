//! Tests for storage module

use super::*;
use crate::error::Error;
use bytes::Bytes;
use object_store::path::Path as ObjectPath;
use tempfile::tempdir;

// ============================================================================
// StorageAccount Tests
// ============================================================================

#[test]
fn test_parse_azure_account() {
    let account = StorageAccount::parse("az://mydatalake").unwrap();
    match account {
        StorageAccount::Azure { account } => assert_eq!(account.as_deref(), Some("mydatalake")),
        other => panic!("Expected Azure account, got {other:?}"),
    }
}

#[test]
fn test_parse_cloud_schemes() {
    assert_eq!(StorageAccount::parse("s3://").unwrap().scheme(), "s3");
    assert_eq!(StorageAccount::parse("gs://").unwrap().scheme(), "gs");
    assert!(StorageAccount::parse("s3://").unwrap().is_cloud());
}

#[test]
fn test_parse_local_path() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().to_str().unwrap();
    let account = StorageAccount::parse(path).unwrap();
    assert_eq!(account.scheme(), "file");
    assert!(!account.is_cloud());
}

#[test]
fn test_parse_memory() {
    let account = StorageAccount::parse("memory://").unwrap();
    assert_eq!(account.scheme(), "memory");
    assert!(!account.is_cloud());
}

#[test]
fn test_parse_unsupported_scheme() {
    let err = StorageAccount::parse("ftp://host/path").unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

// ============================================================================
// ContainerStore Tests
// ============================================================================

#[test]
fn test_nested_object_path() {
    let store = StorageAccount::memory().container_store("c").unwrap();
    assert_eq!(
        store.object_path("c/a/year=2022/file.csv").unwrap(),
        ObjectPath::from("c/a/year=2022/file.csv")
    );
    assert_eq!(store.object_path("c/").unwrap(), ObjectPath::from("c"));
    assert_eq!(
        store.full_path(&ObjectPath::from("c/a/file.csv")),
        "c/a/file.csv"
    );
}

#[test]
fn test_object_path_keeps_escaped_segments() {
    let path = "c/t/ts=2022-01-01 00%3A00/f.csv";
    let store = StorageAccount::memory().container_store("c").unwrap();

    let location = store.object_path(path).unwrap();
    assert_eq!(location.as_ref(), path);
    assert_eq!(store.full_path(&location), path);

    let store = ContainerStore::new(store.store().clone(), "c", false);
    let location = store.object_path(path).unwrap();
    assert_eq!(location.as_ref(), "t/ts=2022-01-01 00%3A00/f.csv");
    assert_eq!(store.full_path(&location), path);
}

#[test]
fn test_object_path_rejects_other_container() {
    let store = StorageAccount::memory().container_store("c").unwrap();
    let err = store.object_path("other/a/file.csv").unwrap_err();
    assert!(matches!(err, Error::InvalidPath { .. }));
}

#[tokio::test]
async fn test_memory_put_get() {
    let store = StorageAccount::memory().container_store("c").unwrap();
    store
        .put("c/a/file.csv", Bytes::from_static(b"id\n1\n"))
        .await
        .unwrap();

    let data = store.get("c/a/file.csv").await.unwrap();
    assert_eq!(data.as_ref(), b"id\n1\n");
}

#[tokio::test]
async fn test_get_missing_is_file_not_found() {
    let store = StorageAccount::memory().container_store("c").unwrap();
    let err = store.get("c/missing.csv").await.unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_local_put_get() {
    let temp_dir = tempdir().unwrap();
    let account = StorageAccount::local(temp_dir.path());
    let store = account.container_store("contenedor").unwrap();

    store
        .put("contenedor/ruta/year=2022/data.json", Bytes::from_static(b"[]"))
        .await
        .unwrap();

    assert!(temp_dir
        .path()
        .join("contenedor/ruta/year=2022/data.json")
        .exists());
    assert_eq!(
        store
            .get("contenedor/ruta/year=2022/data.json")
            .await
            .unwrap()
            .as_ref(),
        b"[]"
    );
}

#[tokio::test]
async fn test_local_put_keeps_escaped_file_name() {
    let temp_dir = tempdir().unwrap();
    let store = StorageAccount::local(temp_dir.path())
        .container_store("c")
        .unwrap();

    store
        .put("c/t/ts=2022-01-01 00%3A00/f.csv", Bytes::from_static(b"v\n1\n"))
        .await
        .unwrap();

    assert!(temp_dir
        .path()
        .join("c/t/ts=2022-01-01 00%3A00/f.csv")
        .exists());
}
