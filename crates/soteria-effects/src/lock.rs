//! Simulated door lock.
//!
//! Stands in for a GPIO-driven actuator: it logs the signal it would send on
//! the configured pin and tracks the resulting state.

use async_trait::async_trait;
use soteria_core::{LockEffects, LockError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lock actuator that only logs pin signals
#[derive(Debug, Clone)]
pub struct SimulatedLockHandler {
    gpio_pin: u8,
    locked: Arc<AtomicBool>,
}

impl SimulatedLockHandler {
    /// A locked door on `gpio_pin`.
    pub fn new(gpio_pin: u8) -> Self {
        tracing::info!(gpio_pin, "Lock controller initialized");
        Self {
            gpio_pin,
            locked: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Pin this actuator drives.
    pub fn gpio_pin(&self) -> u8 {
        self.gpio_pin
    }
}

#[async_trait]
impl LockEffects for SimulatedLockHandler {
    async fn unlock(&self) -> Result<(), LockError> {
        if self.locked.swap(false, Ordering::SeqCst) {
            tracing::info!(gpio_pin = self.gpio_pin, "Sending UNLOCK signal");
        } else {
            tracing::debug!(gpio_pin = self.gpio_pin, "Lock is already unlocked");
        }
        Ok(())
    }

    async fn lock(&self) -> Result<(), LockError> {
        if !self.locked.swap(true, Ordering::SeqCst) {
            tracing::info!(gpio_pin = self.gpio_pin, "Sending LOCK signal");
        } else {
            tracing::debug!(gpio_pin = self.gpio_pin, "Lock is already locked");
        }
        Ok(())
    }

    async fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_locked_and_toggles() {
        let lock = SimulatedLockHandler::new(4);
        assert!(lock.is_locked().await);

        lock.unlock().await.unwrap();
        lock.unlock().await.unwrap();
        assert!(!lock.is_locked().await);

        lock.lock().await.unwrap();
        assert!(lock.is_locked().await);
    }
}
