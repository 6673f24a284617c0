//! Trusted wall-clock time.

use crate::time::Timestamp;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for time operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    #[error("Time service unavailable")]
    ServiceUnavailable,
    #[error("Clock read failed: {reason}")]
    ReadFailed { reason: String },
}

/// Wall-clock source for time-lock checks, issuance checks and lock holds.
///
/// Readings must be monotonically non-decreasing across calls on one
/// handler.
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current time in whole seconds since the Unix epoch.
    async fn physical_time(&self) -> Result<Timestamp, TimeError>;

    /// Suspend for `ms` milliseconds.
    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError>;
}

/// Blanket implementation for Arc<T> where T: PhysicalTimeEffects
#[async_trait]
impl<T: PhysicalTimeEffects + ?Sized> PhysicalTimeEffects for std::sync::Arc<T> {
    async fn physical_time(&self) -> Result<Timestamp, TimeError> {
        (**self).physical_time().await
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        (**self).sleep_ms(ms).await
    }
}
