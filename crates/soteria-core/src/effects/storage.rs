//! Keyed, fixed-size box storage.
//!
//! A box is a byte allocation named by a [`KeyId`]. Its size is fixed when it
//! is created; afterwards only ranged overwrites inside that size are
//! possible. Boxes are never resized and this interface never deletes them.

use crate::identifiers::KeyId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for box storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum StorageError {
    /// `create_box` on a name that is already allocated.
    #[error("Box already exists: {key}")]
    AlreadyExists { key: String },

    /// Ranged read or write against a missing box.
    #[error("Box not found: {key}")]
    NotFound { key: String },

    /// Range falls outside the box allocation.
    #[error("Range {offset}..{end} outside box of {size} bytes: {key}")]
    OutOfBounds {
        key: String,
        offset: usize,
        end: usize,
        size: usize,
    },

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),
}

impl StorageError {
    /// Validate a ranged access against a box of `size` bytes, returning the
    /// exclusive end offset.
    pub fn check_range(
        key: &KeyId,
        offset: usize,
        len: usize,
        size: usize,
    ) -> Result<usize, StorageError> {
        match offset.checked_add(len) {
            Some(end) if end <= size => Ok(end),
            _ => Err(StorageError::OutOfBounds {
                key: key.to_string(),
                offset,
                end: offset.saturating_add(len),
                size,
            }),
        }
    }
}

/// Keyed byte-addressable storage for access key records.
///
/// Handlers must make `create_box` and `replace_box` atomic: a concurrent
/// reader observes either the whole write or none of it.
#[async_trait]
pub trait BoxStorageEffects: Send + Sync {
    /// Whether a box exists under `key`.
    async fn box_exists(&self, key: &KeyId) -> Result<bool, StorageError>;

    /// Allocate a box sized to `contents` and fill it in one commit.
    ///
    /// Fails with [`StorageError::AlreadyExists`] instead of overwriting.
    async fn create_box(&self, key: &KeyId, contents: &[u8]) -> Result<(), StorageError>;

    /// Full contents of the box, or `None` if it does not exist.
    async fn get_box(&self, key: &KeyId) -> Result<Option<Vec<u8>>, StorageError>;

    /// Read `len` bytes at `offset`.
    async fn read_box(&self, key: &KeyId, offset: usize, len: usize)
        -> Result<Vec<u8>, StorageError>;

    /// Overwrite `bytes.len()` bytes starting at `offset`.
    async fn replace_box(
        &self,
        key: &KeyId,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), StorageError>;
}

/// Blanket implementation for Arc<T> where T: BoxStorageEffects
#[async_trait]
impl<T: BoxStorageEffects + ?Sized> BoxStorageEffects for std::sync::Arc<T> {
    async fn box_exists(&self, key: &KeyId) -> Result<bool, StorageError> {
        (**self).box_exists(key).await
    }

    async fn create_box(&self, key: &KeyId, contents: &[u8]) -> Result<(), StorageError> {
        (**self).create_box(key, contents).await
    }

    async fn get_box(&self, key: &KeyId) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get_box(key).await
    }

    async fn read_box(
        &self,
        key: &KeyId,
        offset: usize,
        len: usize,
    ) -> Result<Vec<u8>, StorageError> {
        (**self).read_box(key, offset, len).await
    }

    async fn replace_box(
        &self,
        key: &KeyId,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        (**self).replace_box(key, offset, bytes).await
    }
}
