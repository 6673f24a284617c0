//! In-memory box storage for testing.
//!
//! All boxes live behind one `RwLock`, so every create and replace is atomic
//! with respect to readers.

use async_lock::RwLock;
use async_trait::async_trait;
use soteria_core::{BoxStorageEffects, KeyId, StorageError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Memory box storage handler for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryBoxStorage {
    boxes: Arc<RwLock<HashMap<KeyId, Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryBoxStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-existing boxes, e.g. records written by another deployment.
    pub fn with_boxes(boxes: HashMap<KeyId, Vec<u8>>) -> Self {
        Self {
            boxes: Arc::new(RwLock::new(boxes)),
            ..Self::default()
        }
    }

    /// Number of allocated boxes.
    pub async fn len(&self) -> usize {
        self.boxes.read().await.len()
    }

    /// Whether no boxes are allocated.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Raw contents of a box.
    pub async fn raw(&self, key: &KeyId) -> Option<Vec<u8>> {
        self.boxes.read().await.get(key).cloned()
    }

    /// Overwrite a box directly, bypassing all checks.
    pub async fn insert_raw(&self, key: KeyId, contents: Vec<u8>) {
        self.boxes.write().await.insert(key, contents);
    }

    /// Number of successful `create_box` and `replace_box` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail with `WriteFailed`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("injected write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BoxStorageEffects for MemoryBoxStorage {
    async fn box_exists(&self, key: &KeyId) -> Result<bool, StorageError> {
        Ok(self.boxes.read().await.contains_key(key))
    }

    async fn create_box(&self, key: &KeyId, contents: &[u8]) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut boxes = self.boxes.write().await;
        if boxes.contains_key(key) {
            return Err(StorageError::AlreadyExists {
                key: key.to_string(),
            });
        }
        boxes.insert(key.clone(), contents.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_box(&self, key: &KeyId) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.boxes.read().await.get(key).cloned())
    }

    async fn read_box(
        &self,
        key: &KeyId,
        offset: usize,
        len: usize,
    ) -> Result<Vec<u8>, StorageError> {
        let boxes = self.boxes.read().await;
        let data = boxes.get(key).ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })?;
        let end = StorageError::check_range(key, offset, len, data.len())?;
        Ok(data[offset..end].to_vec())
    }

    async fn replace_box(
        &self,
        key: &KeyId,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut boxes = self.boxes.write().await;
        let data = boxes.get_mut(key).ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })?;
        let end = StorageError::check_range(key, offset, bytes.len(), data.len())?;
        data[offset..end].copy_from_slice(bytes);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_refuses_to_overwrite() {
        let storage = MemoryBoxStorage::new();
        let key = KeyId::new("a").unwrap();
        storage.create_box(&key, &[1, 2, 3]).await.unwrap();

        let err = storage.create_box(&key, &[9, 9, 9]).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
        assert_eq!(storage.raw(&key).await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn ranged_access_stays_inside_allocation() {
        let storage = MemoryBoxStorage::new();
        let key = KeyId::new("a").unwrap();
        storage.create_box(&key, &[0; 4]).await.unwrap();

        storage.replace_box(&key, 2, &[7, 8]).await.unwrap();
        assert_eq!(storage.read_box(&key, 1, 3).await.unwrap(), vec![0, 7, 8]);

        let err = storage.replace_box(&key, 3, &[1, 1]).await.unwrap_err();
        assert!(matches!(err, StorageError::OutOfBounds { end: 5, size: 4, .. }));
    }
}
