//! # Soteria Testkit - Layer 8: Testing
//!
//! Deterministic effect handlers and shared fixtures. The handlers here are
//! stateful and controllable; production handlers live in `soteria-effects`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

/// Shared identities and key ids
pub mod fixtures;
/// Lock handler that records actuation
pub mod lock;
/// In-memory box storage
pub mod storage;
/// Controllable clock
pub mod time;

pub use fixtures::{key_id, owner, recipient, stranger};
pub use lock::{LockAction, RecordingLock};
pub use storage::MemoryBoxStorage;
pub use time::ControllableClock;
