//! Journal entries.

use crate::errors::JournalError;
use crate::event::AuditEvent;
use serde::{Deserialize, Serialize};
use soteria_core::Timestamp;

/// BLAKE3 digest linking entries together.
pub type EntryHash = [u8; 32];

/// One appended event plus its chain metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the journal, starting at 0
    pub sequence: u64,
    /// Clock reading when the entry was appended
    pub timestamp: Timestamp,
    /// Deployment the entry belongs to
    pub app_id: u64,
    /// What happened
    pub event: AuditEvent,
    /// Hash of the previous entry (None for the first)
    pub parent_hash: Option<EntryHash>,
    /// Hash of this entry, excluding this field
    pub hash: EntryHash,
}

impl AuditEntry {
    /// Build an entry and seal it with its hash.
    pub fn seal(
        sequence: u64,
        timestamp: Timestamp,
        app_id: u64,
        event: AuditEvent,
        parent_hash: Option<EntryHash>,
    ) -> Result<Self, JournalError> {
        let hash = content_hash(sequence, timestamp, app_id, &event, parent_hash)?;
        Ok(Self {
            sequence,
            timestamp,
            app_id,
            event,
            parent_hash,
            hash,
        })
    }

    /// Recompute the hash from the entry contents.
    pub fn compute_hash(&self) -> Result<EntryHash, JournalError> {
        content_hash(
            self.sequence,
            self.timestamp,
            self.app_id,
            &self.event,
            self.parent_hash,
        )
    }

    /// Whether the stored hash matches the contents.
    pub fn is_sealed(&self) -> Result<bool, JournalError> {
        Ok(self.compute_hash()? == self.hash)
    }

    /// Hex form of the entry hash.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

fn content_hash(
    sequence: u64,
    timestamp: Timestamp,
    app_id: u64,
    event: &AuditEvent,
    parent_hash: Option<EntryHash>,
) -> Result<EntryHash, JournalError> {
    #[derive(Serialize)]
    struct Hashable<'a> {
        sequence: u64,
        timestamp: Timestamp,
        app_id: u64,
        event: &'a AuditEvent,
        parent_hash: Option<EntryHash>,
    }

    let hashable = Hashable {
        sequence,
        timestamp,
        app_id,
        event,
        parent_hash,
    };
    let serialized = serde_cbor::to_vec(&hashable).map_err(JournalError::serialization)?;
    Ok(*blake3::hash(&serialized).as_bytes())
}
