//! # Soteria Core - Layer 1: Foundation
//!
//! **Purpose**: Define the access-key identifiers, the persisted record layout,
//! and the effect traits through which the ledger reaches its environment.
//!
//! # Architecture Constraints
//!
//! - YES Strongly typed identifiers and timestamps
//! - YES The 64-byte `AccessKeyRecord` codec (a compatibility contract)
//! - YES Effect trait definitions (time, box storage, lock actuation)
//! - NO effect handler implementations (those live in `soteria-effects`)
//! - NO ledger operations (that's `soteria-ledger`)
//!
//! Everything in this crate is pure and synchronous apart from the effect
//! trait signatures themselves.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Effect traits and their error types
pub mod effects;

/// Key and principal identifiers
pub mod identifiers;

/// Fixed-layout access key record codec
pub mod record;

/// Timestamps in seconds since the Unix epoch
pub mod time;

pub use effects::{
    BoxStorageEffects, LockEffects, LockError, PhysicalTimeEffects, StorageError, TimeError,
};
pub use identifiers::{Address, IdentifierError, KeyId};
pub use record::{AccessKeyRecord, KeyStatus, RecordError, RECORD_SIZE};
pub use time::Timestamp;
