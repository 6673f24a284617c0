//! The access key ledger.

use crate::errors::{CreateKeyError, RevokeKeyError, VerifyError};
use crate::verdict::{evaluate, Verdict};
use soteria_core::record::STATUS_OFFSET;
use soteria_core::{
    AccessKeyRecord, Address, BoxStorageEffects, KeyId, KeyStatus, PhysicalTimeEffects,
    StorageError, Timestamp,
};
use tokio::sync::Mutex;

/// Single-owner store of access key records.
///
/// The owner is fixed at construction. Mutations are serialized by an internal
/// write gate held across each check-then-write sequence; verification takes
/// no gate and may run concurrently with anything.
#[derive(Debug)]
pub struct AccessKeyLedger<S, T> {
    owner: Address,
    storage: S,
    clock: T,
    write_gate: Mutex<()>,
}

impl<S, T> AccessKeyLedger<S, T>
where
    S: BoxStorageEffects,
    T: PhysicalTimeEffects,
{
    /// Create a ledger owned by `owner` over the given handlers.
    pub fn new(owner: Address, storage: S, clock: T) -> Self {
        Self {
            owner,
            storage,
            clock,
            write_gate: Mutex::new(()),
        }
    }

    /// The single authority allowed to create and revoke keys.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Storage handler backing the ledger.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Clock handler used for time-lock checks.
    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Issue a new ACTIVE key for `recipient` valid over `[valid_from, valid_until]`.
    ///
    /// Checks run in order and the first failure aborts without writing:
    /// owner, uniqueness, window ordering, not already expired.
    ///
    /// Returns the clock reading the expiry check was made against.
    #[tracing::instrument(
        skip_all,
        fields(key_id = %key_id, caller = %caller, recipient = %recipient)
    )]
    pub async fn create_key(
        &self,
        caller: &Address,
        key_id: &KeyId,
        recipient: Address,
        valid_from: Timestamp,
        valid_until: Timestamp,
    ) -> Result<Timestamp, CreateKeyError> {
        if *caller != self.owner {
            tracing::warn!("Rejected key creation from non-owner");
            return Err(CreateKeyError::Unauthorized { caller: *caller });
        }

        let _gate = self.write_gate.lock().await;

        if self.storage.box_exists(key_id).await? {
            return Err(CreateKeyError::AlreadyExists {
                key_id: key_id.clone(),
            });
        }

        if valid_from >= valid_until {
            return Err(CreateKeyError::InvalidTimeRange {
                valid_from,
                valid_until,
            });
        }

        let now = self.clock.physical_time().await?;
        if valid_until <= now {
            return Err(CreateKeyError::AlreadyExpired { valid_until, now });
        }

        let record = AccessKeyRecord::active(recipient, valid_from, valid_until);
        match self.storage.create_box(key_id, &record.encode()).await {
            Ok(()) => {}
            Err(StorageError::AlreadyExists { .. }) => {
                return Err(CreateKeyError::AlreadyExists {
                    key_id: key_id.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            valid_from = valid_from.as_secs(),
            valid_until = valid_until.as_secs(),
            "Access key issued"
        );
        Ok(now)
    }

    /// Revoke a key. Revocation is one-way.
    ///
    /// Revoking an already revoked key succeeds without writing.
    #[tracing::instrument(skip_all, fields(key_id = %key_id, caller = %caller))]
    pub async fn revoke_key(
        &self,
        caller: &Address,
        key_id: &KeyId,
    ) -> Result<(), RevokeKeyError> {
        if *caller != self.owner {
            tracing::warn!("Rejected key revocation from non-owner");
            return Err(RevokeKeyError::Unauthorized { caller: *caller });
        }

        let _gate = self.write_gate.lock().await;

        if !self.storage.box_exists(key_id).await? {
            return Err(RevokeKeyError::NotFound {
                key_id: key_id.clone(),
            });
        }

        let status = self.storage.read_box(key_id, STATUS_OFFSET, 1).await?;
        let current = status
            .first()
            .copied()
            .ok_or_else(|| StorageError::ReadFailed(format!("empty status read for {key_id}")))?;

        if KeyStatus::from_byte(current)? == KeyStatus::Revoked {
            tracing::debug!("Key already revoked");
            return Ok(());
        }

        self.storage
            .replace_box(key_id, STATUS_OFFSET, &[KeyStatus::Revoked.to_byte()])
            .await?;

        tracing::info!("Access key revoked");
        Ok(())
    }

    /// Check whether `key_id` grants access right now.
    ///
    /// Any caller may verify. The clock is read once and that single reading
    /// is used for both window bounds.
    #[tracing::instrument(skip_all, fields(key_id = %key_id))]
    pub async fn verify_access(&self, key_id: &KeyId) -> Result<Verdict, VerifyError> {
        let (verdict, _now) = self.verify_access_timed(key_id).await?;
        Ok(verdict)
    }

    /// [`verify_access`](Self::verify_access), also returning the clock
    /// reading the verdict was evaluated against.
    pub async fn verify_access_timed(
        &self,
        key_id: &KeyId,
    ) -> Result<(Verdict, Timestamp), VerifyError> {
        let record = self
            .read_record(key_id)
            .await?
            .ok_or_else(|| VerifyError::NotFound {
                key_id: key_id.clone(),
            })?;

        let now = self.clock.physical_time().await?;
        let verdict = evaluate(&record, now);

        tracing::debug!(verdict = %verdict, now = now.as_secs(), "Access verified");
        Ok((verdict, now))
    }

    /// Decoded record for `key_id`, if one exists.
    pub async fn read_record(
        &self,
        key_id: &KeyId,
    ) -> Result<Option<AccessKeyRecord>, VerifyError> {
        match self.storage.get_box(key_id).await? {
            Some(bytes) => Ok(Some(AccessKeyRecord::decode(&bytes)?)),
            None => Ok(None),
        }
    }
}
