//! Filesystem box storage behaviour.

use assert_matches::assert_matches;
use soteria_core::{BoxStorageEffects, KeyId, StorageError};
use soteria_effects::FilesystemBoxStorage;

fn key(id: &str) -> KeyId {
    KeyId::new(id).unwrap()
}

#[tokio::test]
async fn create_then_read_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FilesystemBoxStorage::new(dir.path().join("keys"));
    let k = key("room42");

    assert!(!storage.box_exists(&k).await.unwrap());
    storage.create_box(&k, &[1, 2, 3, 4]).await.unwrap();

    assert!(storage.box_exists(&k).await.unwrap());
    assert_eq!(storage.get_box(&k).await.unwrap(), Some(vec![1, 2, 3, 4]));
    assert_eq!(storage.read_box(&k, 1, 2).await.unwrap(), vec![2, 3]);
}

#[tokio::test]
async fn create_never_clobbers() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FilesystemBoxStorage::new(dir.path());
    let k = key("dup");

    storage.create_box(&k, &[1; 8]).await.unwrap();
    let err = storage.create_box(&k, &[2; 8]).await.unwrap_err();

    assert_matches!(err, StorageError::AlreadyExists { .. });
    assert_eq!(storage.get_box(&k).await.unwrap(), Some(vec![1; 8]));
}

#[tokio::test]
async fn replace_patches_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FilesystemBoxStorage::new(dir.path());
    let k = key("patch");

    storage.create_box(&k, &[1; 8]).await.unwrap();
    storage.replace_box(&k, 6, &[0]).await.unwrap();

    assert_eq!(
        storage.get_box(&k).await.unwrap(),
        Some(vec![1, 1, 1, 1, 1, 1, 0, 1])
    );
}

#[tokio::test]
async fn replace_outside_allocation_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FilesystemBoxStorage::new(dir.path());
    let k = key("bounds");
    storage.create_box(&k, &[0; 4]).await.unwrap();

    let err = storage.replace_box(&k, 4, &[1]).await.unwrap_err();
    assert_matches!(err, StorageError::OutOfBounds { size: 4, .. });
    assert_eq!(storage.get_box(&k).await.unwrap(), Some(vec![0; 4]));
}

#[tokio::test]
async fn missing_box_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FilesystemBoxStorage::new(dir.path());
    let k = key("ghost");

    assert_eq!(storage.get_box(&k).await.unwrap(), None);
    assert_matches!(
        storage.read_box(&k, 0, 1).await,
        Err(StorageError::NotFound { .. })
    );
    assert_matches!(
        storage.replace_box(&k, 0, &[0]).await,
        Err(StorageError::NotFound { .. })
    );
}

#[tokio::test]
async fn key_bytes_do_not_escape_base_directory() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FilesystemBoxStorage::new(dir.path());
    let k = key("../../etc/passwd");

    storage.create_box(&k, &[9]).await.unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(".box"));
    assert!(!names[0].contains('/'));
}

#[tokio::test]
async fn contents_survive_a_new_handler() {
    let dir = tempfile::tempdir().unwrap();
    let k = key("persist");
    FilesystemBoxStorage::new(dir.path())
        .create_box(&k, &[5; 64])
        .await
        .unwrap();

    let reopened = FilesystemBoxStorage::new(dir.path());
    assert_eq!(reopened.get_box(&k).await.unwrap(), Some(vec![5; 64]));
}

#[tokio::test]
async fn refused_and_replaced_writes_leave_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FilesystemBoxStorage::new(dir.path());
    let k = key("tidy");

    storage.create_box(&k, &[1; 8]).await.unwrap();
    assert!(storage.create_box(&k, &[2; 8]).await.is_err());
    storage.replace_box(&k, 0, &[3]).await.unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![format!("{}.box", hex::encode("tidy"))]);
}
