//! Journal error types.

/// Errors appending to, loading, or verifying a journal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JournalError {
    /// Entry could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Underlying codec message
        message: String,
    },

    /// Stored hash does not match the entry contents.
    #[error("Hash mismatch at entry {sequence}")]
    HashMismatch {
        /// Offending entry
        sequence: u64,
    },

    /// `parent_hash` does not name the previous entry.
    #[error("Broken chain at entry {sequence}")]
    BrokenChain {
        /// Offending entry
        sequence: u64,
    },

    /// Sequence numbers are not contiguous from zero.
    #[error("Sequence gap: expected {expected}, found {found}")]
    SequenceGap {
        /// Next expected sequence number
        expected: u64,
        /// Sequence number found
        found: u64,
    },

    /// Entry was written by a different deployment.
    #[error("App id mismatch at entry {sequence}: expected {expected}, found {found}")]
    AppMismatch {
        /// Offending entry
        sequence: u64,
        /// Journal's app id
        expected: u64,
        /// Entry's app id
        found: u64,
    },
}

impl JournalError {
    pub(crate) fn serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
