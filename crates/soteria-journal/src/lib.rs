//! # Soteria Journal - Layer 2: Domain
//!
//! **Purpose**: The append-only audit trail for the access key ledger.
//!
//! Every key issuance, revocation and gate decision is appended as an
//! [`AuditEntry`]. Each entry commits to its predecessor through
//! `parent_hash`, and its own `hash` is a BLAKE3 digest of the canonical CBOR
//! encoding of everything else in the entry. Editing, dropping or reordering
//! any entry breaks [`AuditJournal::verify_integrity`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Journal entries and their hashing
pub mod entry;

/// Journal error types
pub mod errors;

/// Audit event payloads
pub mod event;

/// The journal itself
pub mod journal;

pub use entry::{AuditEntry, EntryHash};
pub use errors::JournalError;
pub use event::AuditEvent;
pub use journal::AuditJournal;
