//! Physical lock actuation at the gate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for lock actuation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum LockError {
    #[error("Actuator failed: {reason}")]
    ActuatorFailed { reason: String },
}

/// Door lock driven by the gate after a verification decision.
#[async_trait]
pub trait LockEffects: Send + Sync {
    /// Release the lock. Unlocking an unlocked door is a no-op.
    async fn unlock(&self) -> Result<(), LockError>;

    /// Engage the lock. Locking a locked door is a no-op.
    async fn lock(&self) -> Result<(), LockError>;

    /// Current state of the lock.
    async fn is_locked(&self) -> bool;
}

/// Blanket implementation for Arc<T> where T: LockEffects
#[async_trait]
impl<T: LockEffects + ?Sized> LockEffects for std::sync::Arc<T> {
    async fn unlock(&self) -> Result<(), LockError> {
        (**self).unlock().await
    }

    async fn lock(&self) -> Result<(), LockError> {
        (**self).lock().await
    }

    async fn is_locked(&self) -> bool {
        (**self).is_locked().await
    }
}
