//! Durable copy of the audit journal.
//!
//! The file holds the JSON export of the whole journal. Every save writes a
//! temporary sibling and renames it over the target, so a crash leaves
//! either the previous or the new journal on disk, never a torn one.

use crate::errors::GateError;
use soteria_journal::AuditJournal;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Journal file handle
#[derive(Debug, Clone)]
pub struct JournalFile {
    path: PathBuf,
}

impl JournalFile {
    /// Journal stored at `path`. Nothing is touched until `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and verify the stored journal, or start an empty one when the
    /// file does not exist yet.
    pub async fn load(&self, app_id: u64) -> Result<AuditJournal, GateError> {
        match fs::read_to_string(&self.path).await {
            Ok(json) => Ok(AuditJournal::from_json(app_id, &json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(AuditJournal::new(app_id)),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Replace the stored journal with `journal`.
    pub async fn save(&self, journal: &AuditJournal) -> Result<(), GateError> {
        let json = journal.to_json()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, json.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;

        if let Err(e) = fs::rename(&temp, &self.path).await {
            if let Err(cleanup) = fs::remove_file(&temp).await {
                tracing::warn!(error = %cleanup, "Failed to remove temp journal file");
            }
            return Err(self.io_error(e));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let n = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let pid = std::process::id();
        self.path.with_file_name(format!(".{name}.{pid}.{n}.tmp"))
    }

    fn io_error(&self, e: std::io::Error) -> GateError {
        GateError::JournalIo {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soteria_core::{KeyId, Timestamp};
    use soteria_journal::{AuditEvent, JournalError};

    fn revoked(id: &str) -> AuditEvent {
        AuditEvent::KeyRevoked {
            key_id: KeyId::new(id).unwrap(),
        }
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = JournalFile::new(dir.path().join("audit.json"));

        let journal = file.load(42).await.unwrap();
        assert!(journal.is_empty());
        assert_eq!(journal.app_id(), 42);
    }

    #[tokio::test]
    async fn save_then_load_keeps_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        let file = JournalFile::new(dir.path().join("logs").join("audit.json"));

        let mut journal = AuditJournal::new(42);
        journal.append(revoked("a"), Timestamp::from_secs(10)).unwrap();
        journal.append(revoked("b"), Timestamp::from_secs(11)).unwrap();
        file.save(&journal).await.unwrap();

        assert_eq!(file.load(42).await.unwrap(), journal);
        let leftovers = std::fs::read_dir(dir.path().join("logs")).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn tampered_file_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let file = JournalFile::new(dir.path().join("audit.json"));

        let mut journal = AuditJournal::new(42);
        journal.append(revoked("a"), Timestamp::from_secs(10)).unwrap();
        file.save(&journal).await.unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        std::fs::write(file.path(), text.replace("\"timestamp\": 10", "\"timestamp\": 99"))
            .unwrap();

        assert!(matches!(
            file.load(42).await,
            Err(GateError::Journal(JournalError::HashMismatch { sequence: 0 }))
        ));
    }
}
