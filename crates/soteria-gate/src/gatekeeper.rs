//! Layer 5: Gate Service
//!
//! Ties the ledger to the door. Owner mutations and guest admissions pass
//! through here so that each one leaves an entry in the audit journal.

use crate::config::GateConfig;
use crate::errors::GateError;
use crate::journal_file::JournalFile;
use crate::request::AccessRequest;
use serde::Serialize;
use soteria_core::{Address, BoxStorageEffects, KeyId, LockEffects, PhysicalTimeEffects, Timestamp};
use soteria_effects::{FilesystemBoxStorage, RealTimeHandler, SimulatedLockHandler};
use soteria_journal::{AuditEntry, AuditEvent, AuditJournal};
use soteria_ledger::{AccessKeyLedger, VerifyError};
use std::fmt;
use tokio::sync::Mutex;

/// Denial reason for payloads that could not be parsed or belong elsewhere.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

/// Denial reason for keys the ledger has never issued.
pub const NOT_FOUND: &str = "NOT_FOUND";

/// Result of one admission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateDecision {
    /// Whether the door was opened
    pub granted: bool,
    /// Verdict token or denial reason
    pub reason: String,
    /// Key named by the payload, if it got that far
    pub key_id: Option<KeyId>,
    /// Guest named by the payload, if it got that far
    pub guest: Option<String>,
    /// When the decision was made
    pub timestamp: Timestamp,
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.granted {
            write!(f, "ACCESS GRANTED: {}", self.reason)
        } else {
            write!(f, "ACCESS DENIED: {}", self.reason)
        }
    }
}

/// Gate over the operating system handlers
pub type ProductionGatekeeper =
    Gatekeeper<FilesystemBoxStorage, RealTimeHandler, SimulatedLockHandler>;

/// Front door of one deployment.
#[derive(Debug)]
pub struct Gatekeeper<S, T, L> {
    config: GateConfig,
    ledger: AccessKeyLedger<S, T>,
    journal: Mutex<AuditJournal>,
    journal_file: Option<JournalFile>,
    lock: L,
}

impl ProductionGatekeeper {
    /// Build a gate on filesystem storage, the system clock and the
    /// simulated actuator named by `config`, resuming the journal stored at
    /// `config.journal_path`.
    pub async fn from_config(config: GateConfig) -> Result<Self, GateError> {
        let storage = FilesystemBoxStorage::new(config.storage_path.clone());
        let lock = SimulatedLockHandler::new(config.lock_gpio_pin);
        let journal_file = JournalFile::new(config.journal_path.clone());
        Self::new(config, storage, RealTimeHandler::new(), lock)?
            .with_journal_file(journal_file)
            .await
    }
}

impl<S, T, L> Gatekeeper<S, T, L>
where
    S: BoxStorageEffects,
    T: PhysicalTimeEffects,
    L: LockEffects,
{
    /// Validate `config` and assemble a gate with an empty, in-memory journal.
    pub fn new(config: GateConfig, storage: S, clock: T, lock: L) -> Result<Self, GateError> {
        config.validate()?;
        let owner = config.owner_address()?;

        tracing::info!(
            app_id = config.app_id,
            owner = %owner,
            grant_secs = config.access_grant_duration_secs,
            "Gate initialized"
        );

        Ok(Self {
            journal: Mutex::new(AuditJournal::new(config.app_id)),
            journal_file: None,
            ledger: AccessKeyLedger::new(owner, storage, clock),
            config,
            lock,
        })
    }

    /// Keep the journal in `file`: the stored journal is loaded and verified
    /// now, and every later entry is saved before the operation returns.
    pub async fn with_journal_file(self, file: JournalFile) -> Result<Self, GateError> {
        let journal = file.load(self.config.app_id).await?;
        tracing::info!(
            path = %file.path().display(),
            entries = journal.len(),
            "Audit journal opened"
        );
        Ok(Self {
            journal: Mutex::new(journal),
            journal_file: Some(file),
            ..self
        })
    }

    /// Replace the journal with a previously exported one after verifying it.
    pub async fn restore_journal(&self, json: &str) -> Result<(), GateError> {
        let restored = AuditJournal::from_json(self.config.app_id, json)?;
        tracing::info!(entries = restored.len(), "Audit journal restored");
        let mut journal = self.journal.lock().await;
        if let Some(file) = &self.journal_file {
            file.save(&restored).await?;
        }
        *journal = restored;
        Ok(())
    }

    /// Active configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Underlying ledger.
    pub fn ledger(&self) -> &AccessKeyLedger<S, T> {
        &self.ledger
    }

    /// Lock actuator.
    pub fn lock(&self) -> &L {
        &self.lock
    }

    /// Issue a key and journal it.
    ///
    /// The entry is stamped with the reading the ledger checked expiry
    /// against, so nothing that can fail sits between the commit and the
    /// journal append.
    #[tracing::instrument(skip_all, fields(key_id = %key_id))]
    pub async fn issue_key(
        &self,
        caller: &Address,
        key_id: &KeyId,
        recipient: Address,
        valid_from: Timestamp,
        valid_until: Timestamp,
    ) -> Result<(), GateError> {
        let now = self
            .ledger
            .create_key(caller, key_id, recipient, valid_from, valid_until)
            .await?;

        self.record(
            AuditEvent::KeyIssued {
                key_id: key_id.clone(),
                recipient,
                valid_from,
                valid_until,
            },
            now,
        )
        .await
    }

    /// Revoke a key and journal it.
    ///
    /// The clock is read before the ledger call; a failed read leaves the key
    /// untouched.
    #[tracing::instrument(skip_all, fields(key_id = %key_id))]
    pub async fn revoke_key(&self, caller: &Address, key_id: &KeyId) -> Result<(), GateError> {
        let now = self.ledger.clock().physical_time().await?;
        self.ledger.revoke_key(caller, key_id).await?;

        self.record(
            AuditEvent::KeyRevoked {
                key_id: key_id.clone(),
            },
            now,
        )
        .await
    }

    /// Decide whether the holder of `payload` may enter.
    ///
    /// On a grant the lock is opened for the configured duration and closed
    /// again before this returns. The lock is re-engaged even when the wait
    /// fails.
    #[tracing::instrument(skip_all)]
    pub async fn admit(&self, payload: &str) -> Result<GateDecision, GateError> {
        let request = match AccessRequest::parse(payload, &self.config) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Access request rejected");
                let now = self.ledger.clock().physical_time().await?;
                let subject = e
                    .subject()
                    .map(|(key_id, guest)| (key_id.clone(), guest.to_string()));

                if let Some((key_id, guest)) = &subject {
                    self.record(
                        AuditEvent::AccessDenied {
                            key_id: key_id.clone(),
                            guest: guest.clone(),
                            reason: INVALID_REQUEST.to_string(),
                        },
                        now,
                    )
                    .await?;
                }

                let (key_id, guest) = subject.unzip();
                return Ok(GateDecision {
                    granted: false,
                    reason: INVALID_REQUEST.to_string(),
                    key_id,
                    guest,
                    timestamp: now,
                });
            }
        };

        let verification = self.ledger.verify_access_timed(&request.key_id).await;
        let (granted, reason, now) = match verification {
            Ok((verdict, now)) => (verdict.is_granted(), verdict.as_str(), now),
            Err(VerifyError::NotFound { .. }) => {
                (false, NOT_FOUND, self.ledger.clock().physical_time().await?)
            }
            Err(e) => return Err(e.into()),
        };

        let event = if granted {
            tracing::info!(key_id = %request.key_id, guest = %request.guest, "Access granted");
            AuditEvent::AccessGranted {
                key_id: request.key_id.clone(),
                guest: request.guest.clone(),
            }
        } else {
            tracing::warn!(
                key_id = %request.key_id,
                guest = %request.guest,
                reason,
                "Access denied"
            );
            AuditEvent::AccessDenied {
                key_id: request.key_id.clone(),
                guest: request.guest.clone(),
                reason: reason.to_string(),
            }
        };
        self.record(event, now).await?;

        if granted {
            self.hold_open().await?;
        }

        Ok(GateDecision {
            granted,
            reason: reason.to_string(),
            key_id: Some(request.key_id),
            guest: Some(request.guest),
            timestamp: now,
        })
    }

    /// Copy of every journal entry.
    pub async fn journal_snapshot(&self) -> Vec<AuditEntry> {
        self.journal.lock().await.entries().to_vec()
    }

    /// Journal as pretty JSON.
    pub async fn export_journal(&self) -> Result<String, GateError> {
        Ok(self.journal.lock().await.to_json()?)
    }

    /// Re-check the journal hash chain.
    pub async fn verify_journal(&self) -> Result<(), GateError> {
        Ok(self.journal.lock().await.verify_integrity()?)
    }

    /// Append and, when a journal file is attached, save. A failed save keeps
    /// the entry in memory; the next successful save writes it out.
    async fn record(&self, event: AuditEvent, now: Timestamp) -> Result<(), GateError> {
        let mut journal = self.journal.lock().await;
        journal.append(event, now)?;
        if let Some(file) = &self.journal_file {
            if let Err(e) = file.save(&journal).await {
                tracing::warn!(error = %e, "Audit journal not saved");
                return Err(e);
            }
        }
        Ok(())
    }

    async fn hold_open(&self) -> Result<(), GateError> {
        self.lock.unlock().await?;
        let held = self
            .ledger
            .clock()
            .sleep_ms(self.config.access_grant_duration_ms())
            .await;
        self.lock.lock().await?;
        held?;
        Ok(())
    }
}
