//! Controllable clock for deterministic time-lock tests.

use async_trait::async_trait;
use soteria_core::{PhysicalTimeEffects, TimeError, Timestamp};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Clock whose reading only changes when a test says so.
///
/// Clones share the same reading, so a test can keep a handle while the
/// ledger owns another.
#[derive(Debug, Clone)]
pub struct ControllableClock {
    current: Arc<AtomicU64>,
    auto_advance_on_sleep: Arc<AtomicBool>,
    reads: Arc<AtomicU64>,
    unavailable: Arc<AtomicBool>,
    reads_left: Arc<AtomicU64>,
}

impl ControllableClock {
    /// Clock starting at `secs` since the epoch.
    pub fn new(secs: u64) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(secs)),
            auto_advance_on_sleep: Arc::new(AtomicBool::new(true)),
            reads: Arc::new(AtomicU64::new(0)),
            unavailable: Arc::new(AtomicBool::new(false)),
            reads_left: Arc::new(AtomicU64::new(u64::MAX)),
        }
    }

    /// Set the absolute reading.
    pub fn set_time(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }

    /// Advance the reading.
    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    /// Current reading without counting it as a read.
    pub fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.current.load(Ordering::SeqCst))
    }

    /// Number of `physical_time` calls served so far.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Freeze the reading across `sleep_ms` calls.
    pub fn freeze(&self) {
        self.auto_advance_on_sleep.store(false, Ordering::SeqCst);
    }

    /// Make every subsequent read fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Serve `reads` more successful reads, then fail every one after.
    pub fn fail_after(&self, reads: u64) {
        self.reads_left.store(reads, Ordering::SeqCst);
    }
}

impl Default for ControllableClock {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl PhysicalTimeEffects for ControllableClock {
    async fn physical_time(&self) -> Result<Timestamp, TimeError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TimeError::ServiceUnavailable);
        }
        let exhausted = self
            .reads_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_err();
        if exhausted {
            return Err(TimeError::ServiceUnavailable);
        }
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.now())
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        // Never actually sleeps; whole seconds are added unless frozen
        if self.auto_advance_on_sleep.load(Ordering::SeqCst) {
            self.advance(ms / 1000);
        }
        Ok(())
    }
}
