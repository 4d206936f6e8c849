use std::time::SystemTime;

use turnstile::store::{DiskStore, FileStore, StoreError};

#[tokio::test]
async fn test_disk_store_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"<html>hello</html>").unwrap();

    let store = DiskStore::new(dir.path());
    let resource = store.read("index.html").await.unwrap();

    assert_eq!(resource.bytes, b"<html>hello</html>".to_vec());
    assert!(resource.last_modified > SystemTime::UNIX_EPOCH);
}

#[tokio::test]
async fn test_disk_store_reads_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"").unwrap();

    let resource = DiskStore::new(dir.path()).read("index.html").await.unwrap();
    assert!(resource.bytes.is_empty());
}

#[tokio::test]
async fn test_disk_store_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::new(dir.path());

    let err = store.read("index.html").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref p) if p == "index.html"));
}

#[tokio::test]
async fn test_disk_store_directory_is_not_a_resource() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();

    let err = DiskStore::new(dir.path()).read("sub").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_disk_store_refuses_escaping_paths() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::new(dir.path());

    assert!(matches!(store.read("../index.html").await, Err(StoreError::Forbidden(_))));
    assert!(matches!(store.read("/etc/hosts").await, Err(StoreError::Forbidden(_))));
}

#[test]
fn test_store_error_messages() {
    assert_eq!(
        StoreError::NotFound("index.html".to_string()).to_string(),
        "resource not found: index.html"
    );
}
