//! # Soteria Effects - Layer 3: Production Handlers
//!
//! Implementations of the `soteria-core` effect traits backed by the
//! operating system.
//!
//! **Layer Constraint**: NO mock handlers - those belong in `soteria-testkit`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Simulated door lock actuator
pub mod lock;

/// Filesystem box storage
pub mod storage;

/// System clock
pub mod time;

pub use lock::SimulatedLockHandler;
pub use storage::FilesystemBoxStorage;
pub use time::RealTimeHandler;
