//! # Soteria Gate - Layer 5: Gate Service
//!
//! The deployment-facing surface of the access key ledger:
//!
//! - [`GateConfig`]: file and environment configuration
//! - [`AccessRequest`]: scanned QR payloads
//! - [`Gatekeeper`]: key issuance, revocation and guest admission, each
//!   recorded in the audit journal
//!
//! ```ignore
//! let config = GateConfig::load(Path::new("gate.toml"))?;
//! let gate = ProductionGatekeeper::from_config(config).await?;
//! let decision = gate.admit(r#"{"keyId":"room42","appId":42}"#).await?;
//! println!("{decision}");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Configuration loading and validation
pub mod config;

/// Unified gate error
pub mod errors;

/// Ledger, journal and lock orchestration
pub mod gatekeeper;

/// Durable audit journal storage
pub mod journal_file;

/// QR payload parsing
pub mod request;

/// Tracing subscriber setup
pub mod telemetry;

pub use config::{ConfigError, GateConfig, MAX_GRANT_DURATION_SECS};
pub use errors::GateError;
pub use gatekeeper::{GateDecision, Gatekeeper, ProductionGatekeeper, INVALID_REQUEST, NOT_FOUND};
pub use journal_file::JournalFile;
pub use request::{AccessRequest, RequestError};
pub use telemetry::init_tracing;
