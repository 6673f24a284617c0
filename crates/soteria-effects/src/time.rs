//! Layer 3: Time Effect Handler - Production Only
//!
//! Delegates to the system clock and never returns a reading lower than one
//! it has already returned, so a backwards step of the system clock cannot
//! reopen an expired window.

use async_trait::async_trait;
use soteria_core::{PhysicalTimeEffects, TimeError, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Real time handler for production use
#[derive(Debug, Clone, Default)]
pub struct RealTimeHandler {
    high_water: Arc<AtomicU64>,
}

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::disallowed_methods)]
    fn system_secs() -> Result<u64, TimeError> {
        // SystemTime::now() is allowed in production handlers that implement effect traits.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| TimeError::ReadFailed {
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    async fn physical_time(&self) -> Result<Timestamp, TimeError> {
        let observed = Self::system_secs()?;
        let previous = self.high_water.fetch_max(observed, Ordering::SeqCst);
        if observed < previous {
            tracing::warn!(observed, previous, "System clock stepped backwards");
        }
        Ok(Timestamp::from_secs(observed.max(previous)))
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn readings_never_go_backwards() {
        let clock = RealTimeHandler::new();
        let first = clock.physical_time().await.unwrap();

        // Pretend an earlier call saw a time far in the future
        clock
            .high_water
            .store(first.as_secs() + 3600, Ordering::SeqCst);

        let second = clock.physical_time().await.unwrap();
        assert_eq!(second.as_secs(), first.as_secs() + 3600);
    }

    #[tokio::test]
    async fn reading_is_after_2020() {
        let now = RealTimeHandler::new().physical_time().await.unwrap();
        assert!(now.as_secs() > 1_577_836_800);
    }
}
