//! Append-only audit journal.

use crate::entry::{AuditEntry, EntryHash};
use crate::errors::JournalError;
use crate::event::AuditEvent;
use soteria_core::{KeyId, Timestamp};

/// Hash-chained sequence of audit entries for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditJournal {
    app_id: u64,
    entries: Vec<AuditEntry>,
}

impl AuditJournal {
    /// Empty journal for `app_id`.
    pub fn new(app_id: u64) -> Self {
        Self {
            app_id,
            entries: Vec::new(),
        }
    }

    /// Rebuild a journal from persisted entries, verifying the chain first.
    pub fn from_entries(app_id: u64, entries: Vec<AuditEntry>) -> Result<Self, JournalError> {
        let journal = Self { app_id, entries };
        journal.verify_integrity()?;
        Ok(journal)
    }

    /// Load from the JSON form produced by [`AuditJournal::to_json`].
    pub fn from_json(app_id: u64, json: &str) -> Result<Self, JournalError> {
        let entries: Vec<AuditEntry> =
            serde_json::from_str(json).map_err(JournalError::serialization)?;
        Self::from_entries(app_id, entries)
    }

    /// Export all entries as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, JournalError> {
        serde_json::to_string_pretty(&self.entries).map_err(JournalError::serialization)
    }

    /// Deployment this journal belongs to.
    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// Append `event` observed at `timestamp`.
    pub fn append(
        &mut self,
        event: AuditEvent,
        timestamp: Timestamp,
    ) -> Result<&AuditEntry, JournalError> {
        let sequence = self.entries.len() as u64;
        let entry = AuditEntry::seal(sequence, timestamp, self.app_id, event, self.head_hash())?;

        tracing::debug!(
            sequence,
            action = entry.event.action(),
            key_id = %entry.event.key_id(),
            hash = %entry.hash_hex(),
            "Audit entry appended"
        );

        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// All entries in append order.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Entries concerning one key, in append order.
    pub fn entries_for<'a>(&'a self, key_id: &'a KeyId) -> impl Iterator<Item = &'a AuditEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.event.key_id() == key_id)
    }

    /// Hash of the latest entry.
    pub fn head_hash(&self) -> Option<EntryHash> {
        self.entries.last().map(|entry| entry.hash)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check sequence numbers, app ids, parent links and entry hashes.
    pub fn verify_integrity(&self) -> Result<(), JournalError> {
        let mut parent: Option<EntryHash> = None;

        for (expected, entry) in (0u64..).zip(self.entries.iter()) {
            if entry.sequence != expected {
                return Err(JournalError::SequenceGap {
                    expected,
                    found: entry.sequence,
                });
            }
            if entry.app_id != self.app_id {
                return Err(JournalError::AppMismatch {
                    sequence: entry.sequence,
                    expected: self.app_id,
                    found: entry.app_id,
                });
            }
            if entry.parent_hash != parent {
                tracing::warn!(sequence = entry.sequence, "Audit chain link broken");
                return Err(JournalError::BrokenChain {
                    sequence: entry.sequence,
                });
            }
            if !entry.is_sealed()? {
                tracing::warn!(sequence = entry.sequence, "Audit entry hash mismatch");
                return Err(JournalError::HashMismatch {
                    sequence: entry.sequence,
                });
            }
            parent = Some(entry.hash);
        }

        Ok(())
    }
}
