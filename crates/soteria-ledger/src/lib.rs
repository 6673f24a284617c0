//! # Soteria Ledger - Layer 2: Domain
//!
//! **Purpose**: The access key ledger. A keyed store of fixed-layout records
//! and the three operations that act on it:
//!
//! - [`AccessKeyLedger::create_key`]: owner-only issuance of a time-bounded key
//! - [`AccessKeyLedger::revoke_key`]: owner-only, one-way revocation
//! - [`AccessKeyLedger::verify_access`]: authorization-free time-lock check
//!
//! A record moves `NONEXISTENT -> ACTIVE -> REVOKED`; `REVOKED` is terminal
//! and verification never transitions a record.
//!
//! # Architecture Constraints
//!
//! - YES Ownership checks, time-window checks, record writes
//! - YES Pure verdict evaluation ([`evaluate`])
//! - NO direct clock or filesystem access; everything goes through
//!   `PhysicalTimeEffects` and `BoxStorageEffects`
//! - NO audit trail (that's `soteria-journal`) or gate I/O (`soteria-gate`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Operation error types
pub mod errors;

/// The ledger and its operations
pub mod ledger;

/// Verification outcomes and the time-lock algorithm
pub mod verdict;

pub use errors::{CreateKeyError, RevokeKeyError, VerifyError};
pub use ledger::AccessKeyLedger;
pub use verdict::{evaluate, UnknownVerdict, Verdict};
