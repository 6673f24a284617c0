//! Typed failures of the ledger operations.
//!
//! Business rejections (`Unauthorized`, `AlreadyExists`, ...) are terminal and
//! leave the store untouched. The `Storage`, `Clock` and `CorruptRecord`
//! variants only wrap effect-handler or codec failures.

use soteria_core::{Address, KeyId, RecordError, StorageError, TimeError, Timestamp};

/// Failure of [`crate::AccessKeyLedger::create_key`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateKeyError {
    /// Caller is not the ledger owner.
    #[error("Unauthorized: {caller} is not the ledger owner")]
    Unauthorized {
        /// Rejected caller
        caller: Address,
    },

    /// A record already exists for the key id.
    #[error("Key already exists: {key_id}")]
    AlreadyExists {
        /// Duplicate key id
        key_id: KeyId,
    },

    /// `valid_from` is not strictly before `valid_until`.
    #[error("Invalid time range: {valid_from} is not before {valid_until}")]
    InvalidTimeRange {
        /// Requested start
        valid_from: Timestamp,
        /// Requested end
        valid_until: Timestamp,
    },

    /// `valid_until` is not in the future.
    #[error("Key would be born expired: valid_until {valid_until} <= now {now}")]
    AlreadyExpired {
        /// Requested end
        valid_until: Timestamp,
        /// Clock reading at issuance
        now: Timestamp,
    },

    /// Storage handler failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Clock handler failed.
    #[error(transparent)]
    Clock(#[from] TimeError),
}

/// Failure of [`crate::AccessKeyLedger::revoke_key`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RevokeKeyError {
    /// Caller is not the ledger owner.
    #[error("Unauthorized: {caller} is not the ledger owner")]
    Unauthorized {
        /// Rejected caller
        caller: Address,
    },

    /// No record exists for the key id.
    #[error("Key not found: {key_id}")]
    NotFound {
        /// Missing key id
        key_id: KeyId,
    },

    /// Stored status byte is not a valid flag.
    #[error("Corrupt record: {0}")]
    CorruptRecord(#[from] RecordError),

    /// Storage handler failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure of [`crate::AccessKeyLedger::verify_access`].
///
/// Denials are not errors; they are [`crate::Verdict`] values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// No record exists for the key id.
    #[error("Key not found: {key_id}")]
    NotFound {
        /// Missing key id
        key_id: KeyId,
    },

    /// Stored record does not decode.
    #[error("Corrupt record: {0}")]
    CorruptRecord(#[from] RecordError),

    /// Storage handler failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Clock handler failed.
    #[error(transparent)]
    Clock(#[from] TimeError),
}

impl VerifyError {
    /// Whether the key simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
