//! Effect trait definitions.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effects
//! - **Implementation**: `soteria-effects` (production), `soteria-testkit` (tests)
//! - **Usage**: the ledger and the gate service reach time, storage and the
//!   physical lock only through these traits
//!
//! Each trait carries its own error type so callers can tell an
//! infrastructure failure apart from a business-rule rejection.

mod lock;
mod storage;
mod time;

pub use lock::{LockEffects, LockError};
pub use storage::{BoxStorageEffects, StorageError};
pub use time::{PhysicalTimeEffects, TimeError};
