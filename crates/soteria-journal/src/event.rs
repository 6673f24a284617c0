//! Audit event payloads.

use serde::{Deserialize, Serialize};
use soteria_core::{Address, KeyId, Timestamp};
use std::fmt;

/// Something that happened to the ledger or at the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Owner issued a new key.
    KeyIssued {
        /// Issued key
        key_id: KeyId,
        /// Principal the key was issued to
        recipient: Address,
        /// Start of the window
        valid_from: Timestamp,
        /// End of the window
        valid_until: Timestamp,
    },

    /// Owner revoked a key.
    KeyRevoked {
        /// Revoked key
        key_id: KeyId,
    },

    /// The gate opened for a guest.
    #[serde(rename = "guest_access")]
    AccessGranted {
        /// Key presented
        key_id: KeyId,
        /// Guest name from the access request
        guest: String,
    },

    /// The gate refused a guest.
    #[serde(rename = "guest_access_denied")]
    AccessDenied {
        /// Key presented
        key_id: KeyId,
        /// Guest name from the access request
        guest: String,
        /// Denial token, e.g. `DENIED_EXPIRED` or `NOT_FOUND`
        reason: String,
    },
}

impl AuditEvent {
    /// Key the event concerns.
    pub fn key_id(&self) -> &KeyId {
        match self {
            Self::KeyIssued { key_id, .. }
            | Self::KeyRevoked { key_id }
            | Self::AccessGranted { key_id, .. }
            | Self::AccessDenied { key_id, .. } => key_id,
        }
    }

    /// Short action name used in logs.
    pub fn action(&self) -> &'static str {
        match self {
            Self::KeyIssued { .. } => "key_issued",
            Self::KeyRevoked { .. } => "key_revoked",
            Self::AccessGranted { .. } => "guest_access",
            Self::AccessDenied { .. } => "guest_access_denied",
        }
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessDenied { key_id, reason, .. } => {
                write!(f, "{} {key_id} ({reason})", self.action())
            }
            _ => write!(f, "{} {}", self.action(), self.key_id()),
        }
    }
}
