//! Lock handler that records every actuation.

use async_lock::Mutex;
use async_trait::async_trait;
use soteria_core::{LockEffects, LockError};
use std::sync::Arc;

/// One call made against a [`RecordingLock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockAction {
    /// `unlock` was called
    Unlock,
    /// `lock` was called
    Lock,
}

#[derive(Debug)]
struct LockState {
    locked: bool,
    actions: Vec<LockAction>,
    fail: bool,
}

/// Lock that starts locked and remembers what it was asked to do.
#[derive(Debug, Clone)]
pub struct RecordingLock {
    state: Arc<Mutex<LockState>>,
}

impl Default for RecordingLock {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingLock {
    /// A locked lock with an empty history.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LockState {
                locked: true,
                actions: Vec::new(),
                fail: false,
            })),
        }
    }

    /// Calls made so far, in order.
    pub async fn actions(&self) -> Vec<LockAction> {
        self.state.lock().await.actions.clone()
    }

    /// Make every subsequent actuation fail.
    pub async fn set_failing(&self, fail: bool) {
        self.state.lock().await.fail = fail;
    }
}

#[async_trait]
impl LockEffects for RecordingLock {
    async fn unlock(&self) -> Result<(), LockError> {
        let mut state = self.state.lock().await;
        if state.fail {
            return Err(LockError::ActuatorFailed {
                reason: "injected actuator failure".to_string(),
            });
        }
        state.actions.push(LockAction::Unlock);
        state.locked = false;
        Ok(())
    }

    async fn lock(&self) -> Result<(), LockError> {
        let mut state = self.state.lock().await;
        if state.fail {
            return Err(LockError::ActuatorFailed {
                reason: "injected actuator failure".to_string(),
            });
        }
        state.actions.push(LockAction::Lock);
        state.locked = true;
        Ok(())
    }

    async fn is_locked(&self) -> bool {
        self.state.lock().await.locked
    }
}
