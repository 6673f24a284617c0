//! Unified gate error
//!
//! Everything the gate cannot turn into a denied decision. Requests that
//! are merely refused come back as a [`GateDecision`](crate::GateDecision).

use crate::config::ConfigError;
use soteria_core::{LockError, TimeError};
use soteria_journal::JournalError;
use soteria_ledger::{CreateKeyError, RevokeKeyError, VerifyError};
use std::path::PathBuf;
use thiserror::Error;

/// Gate service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Configuration was rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Key issuance failed
    #[error("Key issuance failed: {0}")]
    Create(#[from] CreateKeyError),

    /// Key revocation failed
    #[error("Key revocation failed: {0}")]
    Revoke(#[from] RevokeKeyError),

    /// Verification could not complete
    #[error("Verification failed: {0}")]
    Verify(#[from] VerifyError),

    /// The audit journal could not be written or loaded
    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    /// The journal file could not be read or written
    #[error("Journal file {}: {message}", path.display())]
    JournalIo {
        /// Journal file
        path: PathBuf,
        /// Underlying error
        message: String,
    },

    /// The actuator did not respond
    #[error("Lock error: {0}")]
    Lock(#[from] LockError),

    /// The clock could not be read
    #[error("Clock error: {0}")]
    Clock(#[from] TimeError),
}
