//! Layer 3: Box Storage Handler - Production Only
//!
//! Each box is one file named after the hex encoding of its key id. Writes go
//! to a temporary sibling first and are then published in a single
//! filesystem operation, so readers see either the old or the new contents:
//!
//! - `create_box` hard-links the finished temp file into place, which fails
//!   if the target already exists instead of clobbering it
//! - `replace_box` renames the patched temp file over the target

use async_trait::async_trait;
use soteria_core::{BoxStorageEffects, KeyId, StorageError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

const BOX_EXTENSION: &str = "box";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Filesystem-based box storage handler for production use
#[derive(Debug, Clone)]
pub struct FilesystemBoxStorage {
    /// Base directory for box files
    base_path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Arc<Mutex<()>>,
}

impl FilesystemBoxStorage {
    /// Create a handler rooted at `base_path`. The directory is created lazily.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn box_path(&self, key: &KeyId) -> PathBuf {
        self.base_path
            .join(format!("{}.{BOX_EXTENSION}", hex::encode(key.as_bytes())))
    }

    /// Unique per process and per call, so handlers sharing `base_path`
    /// never publish each other's temp files.
    fn temp_path(&self, key: &KeyId) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let pid = std::process::id();
        self.base_path
            .join(format!(".{}.{pid}.{n}.tmp", hex::encode(key.as_bytes())))
    }

    async fn discard_temp(temp: &Path, key: &KeyId) {
        if let Err(e) = fs::remove_file(temp).await {
            tracing::warn!(key = %key, error = %e, "Failed to remove temp box file");
        }
    }

    async fn ensure_base(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create directory: {e}"))
        })
    }

    async fn read_existing(&self, key: &KeyId) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.box_path(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!(
                "Failed to read box {key}: {e}"
            ))),
        }
    }

    async fn write_temp(&self, key: &KeyId, contents: &[u8]) -> Result<PathBuf, StorageError> {
        let temp = self.temp_path(key);
        fs::write(&temp, contents).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write temp file for {key}: {e}"))
        })?;
        Ok(temp)
    }
}

#[async_trait]
impl BoxStorageEffects for FilesystemBoxStorage {
    async fn box_exists(&self, key: &KeyId) -> Result<bool, StorageError> {
        fs::try_exists(self.box_path(key))
            .await
            .map_err(|e| StorageError::ReadFailed(format!("Failed to stat box {key}: {e}")))
    }

    async fn create_box(&self, key: &KeyId, contents: &[u8]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.ensure_base().await?;

        let temp = self.write_temp(key, contents).await?;
        let published = fs::hard_link(&temp, self.box_path(key)).await;
        Self::discard_temp(&temp, key).await;

        match published {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StorageError::AlreadyExists {
                key: key.to_string(),
            }),
            Err(e) => Err(StorageError::WriteFailed(format!(
                "Failed to publish box {key}: {e}"
            ))),
        }
    }

    async fn get_box(&self, key: &KeyId) -> Result<Option<Vec<u8>>, StorageError> {
        self.read_existing(key).await
    }

    async fn read_box(
        &self,
        key: &KeyId,
        offset: usize,
        len: usize,
    ) -> Result<Vec<u8>, StorageError> {
        let data = self
            .read_existing(key)
            .await?
            .ok_or_else(|| StorageError::NotFound {
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
        let _guard = self.write_lock.lock().await;

        let mut data = self
            .read_existing(key)
            .await?
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })?;
        let end = StorageError::check_range(key, offset, bytes.len(), data.len())?;
        data[offset..end].copy_from_slice(bytes);

        let temp = self.write_temp(key, &data).await?;
        if let Err(e) = fs::rename(&temp, self.box_path(key)).await {
            Self::discard_temp(&temp, key).await;
            return Err(StorageError::WriteFailed(format!(
                "Failed to publish box {key}: {e}"
            )));
        }
        Ok(())
    }
}
