//! Record lifecycle management.
//!
//! This module owns every mutation of a stored [`BenefitRecord`] after
//! calculation: approval, disbursement, observation, re-entry into
//! calculation and confirmed deletion. Transitions are serialized per record
//! code and guarded by an optimistic version check, so two concurrent actors
//! can never both mutate the same record: the second one receives
//! [`EngineError::StaleState`] and must reload.
//!
//! Every successful transition appends an [`AuditEntry`] through the
//! persistence gateway. If the audit write fails after the record was saved,
//! the previous record state is restored and the failure is surfaced.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::gateway::{PersistenceGateway, RecordFilter};
use crate::models::{AuditEntry, BenefitRecord, RecordState, terminal_state_for};

/// The literal confirmation token required to delete a record.
pub const DELETE_CONFIRMATION: &str = "ELIMINAR";

/// Manages lifecycle transitions of stored benefit records.
///
/// The manager holds one lock per record code so that transitions on the
/// same record run one at a time, while transitions on different records
/// proceed concurrently.
pub struct LifecycleManager<G: PersistenceGateway + ?Sized> {
    gateway: Arc<G>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<G: PersistenceGateway + ?Sized> LifecycleManager<G> {
    /// Creates a manager over the given gateway.
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, code: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        Arc::clone(locks.entry(code.to_string()).or_default())
    }

    fn release_lock(&self, code: &str) {
        self.locks.lock().expect("lock map poisoned").remove(code);
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.lock().expect("lock map poisoned").len()
    }

    fn load_stored(&self, code: &str) -> EngineResult<BenefitRecord> {
        self.gateway
            .load_by_filter(&RecordFilter::by_code(code))?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::PersistenceFailure {
                message: format!("record '{code}' not found"),
            })
    }

    /// Loads the stored copy of the record and checks the caller's version
    /// against it.
    fn load_checked(&self, record: &BenefitRecord) -> EngineResult<BenefitRecord> {
        let stored = self.load_stored(&record.code)?;
        if stored.version != record.version {
            return Err(EngineError::StaleState {
                record_code: record.code.clone(),
                caller_version: record.version,
                stored_version: stored.version,
            });
        }
        Ok(stored)
    }

    /// Saves the transitioned record and appends the audit entry, restoring
    /// the previous stored state when the audit write fails.
    fn commit(
        &self,
        previous: &BenefitRecord,
        next: BenefitRecord,
        actor: &str,
    ) -> EngineResult<BenefitRecord> {
        let saved = self.gateway.save(&next)?;
        let entry = AuditEntry {
            record_code: saved.code.clone(),
            actor: actor.to_string(),
            at: Utc::now(),
            from_state: previous.state,
            to_state: saved.state,
        };
        if let Err(audit_err) = self.gateway.record_audit(&entry) {
            warn!(
                record_code = %saved.code,
                "audit write failed, restoring previous record state"
            );
            if let Err(rollback_err) = self.gateway.save(previous) {
                warn!(
                    record_code = %saved.code,
                    error = %rollback_err,
                    "rollback save failed, stored record may be ahead of the audit log"
                );
            }
            return Err(audit_err);
        }
        info!(
            record_code = %saved.code,
            from = %previous.state,
            to = %saved.state,
            actor,
            "record transitioned"
        );
        Ok(saved)
    }

    /// Approves a calculated record for disbursement.
    ///
    /// Re-approving an already approved record by the same approver is
    /// idempotent and returns the stored record unchanged. A different
    /// approver cannot silently take over an approval.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the record is not in `Calculated`
    /// (except the idempotent case above) or the approver is empty, and
    /// `StaleState` when the caller's copy is outdated.
    pub fn approve(&self, record: &BenefitRecord, approver: &str) -> EngineResult<BenefitRecord> {
        let lock = self.lock_for(&record.code);
        let _guard = lock.lock().expect("record lock poisoned");

        let stored = self.load_checked(record)?;
        if approver.trim().is_empty() {
            return Err(EngineError::InvalidTransition {
                record_code: stored.code.clone(),
                from: stored.state,
                to: RecordState::Approved,
                message: "an approver identity is required".to_string(),
            });
        }
        match stored.state {
            RecordState::Calculated => {}
            RecordState::Approved => {
                if stored.approved_by.as_deref() == Some(approver) {
                    return Ok(stored);
                }
                return Err(EngineError::InvalidTransition {
                    record_code: stored.code.clone(),
                    from: stored.state,
                    to: RecordState::Approved,
                    message: format!(
                        "already approved by '{}'",
                        stored.approved_by.as_deref().unwrap_or("")
                    ),
                });
            }
            other => {
                return Err(EngineError::InvalidTransition {
                    record_code: stored.code.clone(),
                    from: other,
                    to: RecordState::Approved,
                    message: "only calculated records can be approved".to_string(),
                });
            }
        }

        let mut next = stored.clone();
        next.state = RecordState::Approved;
        next.approved_by = Some(approver.to_string());
        next.approved_at = Some(Utc::now());
        next.version += 1;
        self.commit(&stored, next, approver)
    }

    /// Disburses an approved record into its terminal state.
    ///
    /// CTS records become `Deposited`; every other benefit becomes `Paid`.
    /// A receipt reference is obtained from the gateway and attached before
    /// the terminal save, after which the monetary fields are frozen.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the record is not in `Approved` and
    /// `StaleState` when the caller's copy is outdated.
    pub fn disburse(&self, record: &BenefitRecord, payer: &str) -> EngineResult<BenefitRecord> {
        let lock = self.lock_for(&record.code);
        let _guard = lock.lock().expect("record lock poisoned");

        let stored = self.load_checked(record)?;
        let terminal = terminal_state_for(stored.benefit_type);
        if stored.state != RecordState::Approved {
            let message = if stored.state.is_terminal() {
                "the record has already been disbursed".to_string()
            } else {
                "approval is required before disbursement".to_string()
            };
            return Err(EngineError::InvalidTransition {
                record_code: stored.code.clone(),
                from: stored.state,
                to: terminal,
                message,
            });
        }

        let receipt = self.gateway.issue_receipt(&stored)?;
        let mut next = stored.clone();
        next.state = terminal;
        next.paid_by = Some(payer.to_string());
        next.paid_at = Some(Utc::now());
        next.receipt_number = Some(receipt);
        next.version += 1;
        self.commit(&stored, next, payer)
    }

    /// Flags a record for correction with an observation note.
    ///
    /// Observation is reachable from `Calculated` and from `Approved`; an
    /// approved record that is observed loses its approval and must be
    /// re-approved after recalculation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the record is terminal or still a
    /// draft, or when the note is empty.
    pub fn observe(
        &self,
        record: &BenefitRecord,
        actor: &str,
        note: &str,
    ) -> EngineResult<BenefitRecord> {
        let lock = self.lock_for(&record.code);
        let _guard = lock.lock().expect("record lock poisoned");

        let stored = self.load_checked(record)?;
        if !matches!(stored.state, RecordState::Calculated | RecordState::Approved) {
            return Err(EngineError::InvalidTransition {
                record_code: stored.code.clone(),
                from: stored.state,
                to: RecordState::Observed,
                message: "only calculated or approved records can be observed".to_string(),
            });
        }
        if note.trim().is_empty() {
            return Err(EngineError::InvalidTransition {
                record_code: stored.code.clone(),
                from: stored.state,
                to: RecordState::Observed,
                message: "an observation note is required".to_string(),
            });
        }

        let mut next = stored.clone();
        next.state = RecordState::Observed;
        next.observation = Some(note.to_string());
        next.approved_by = None;
        next.approved_at = None;
        next.version += 1;
        self.commit(&stored, next, actor)
    }

    /// Returns an observed record to `Calculated` after its correction.
    ///
    /// The observation note is cleared; the record then follows the normal
    /// approval path again.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the record is not in `Observed`.
    pub fn reenter_calculation(
        &self,
        record: &BenefitRecord,
        actor: &str,
    ) -> EngineResult<BenefitRecord> {
        let lock = self.lock_for(&record.code);
        let _guard = lock.lock().expect("record lock poisoned");

        let stored = self.load_checked(record)?;
        if stored.state != RecordState::Observed {
            return Err(EngineError::InvalidTransition {
                record_code: stored.code.clone(),
                from: stored.state,
                to: RecordState::Calculated,
                message: "only observed records re-enter calculation".to_string(),
            });
        }

        let mut next = stored.clone();
        next.state = RecordState::Calculated;
        next.observation = None;
        next.calculated_by = actor.to_string();
        next.calculated_at = Utc::now();
        next.version += 1;
        self.commit(&stored, next, actor)
    }

    /// Replaces an observed record with its freshly calculated contents.
    ///
    /// Batch recalculation funnels through here so that the observed
    /// record's return to `Calculated` carries the same per-record lock,
    /// version check and audit entry as every other transition. The stored
    /// version is re-checked under the lock, so a transition that ran after
    /// the caller read the record is never silently overwritten.
    ///
    /// # Errors
    ///
    /// Returns `StaleState` when the stored record moved past
    /// `expected_version` and `InvalidTransition` when it is no longer in
    /// `Observed`.
    pub fn replace_calculation(
        &self,
        expected_version: u64,
        mut next: BenefitRecord,
    ) -> EngineResult<BenefitRecord> {
        let lock = self.lock_for(&next.code);
        let _guard = lock.lock().expect("record lock poisoned");

        let stored = self.load_stored(&next.code)?;
        if stored.version != expected_version {
            return Err(EngineError::StaleState {
                record_code: stored.code.clone(),
                caller_version: expected_version,
                stored_version: stored.version,
            });
        }
        if stored.state != RecordState::Observed {
            return Err(EngineError::InvalidTransition {
                record_code: stored.code.clone(),
                from: stored.state,
                to: RecordState::Calculated,
                message: "only observed records are replaced by recalculation".to_string(),
            });
        }

        next.state = RecordState::Calculated;
        next.observation = None;
        next.version = stored.version + 1;
        let actor = next.calculated_by.clone();
        self.commit(&stored, next, &actor)
    }

    /// Deletes a record that has not yet been approved.
    ///
    /// Deletion is irreversible and therefore requires the literal
    /// confirmation token [`DELETE_CONFIRMATION`]. The deletion itself is
    /// audited as a same-state entry under the deleting actor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the confirmation token does not
    /// match, `RecordLocked` when the record has advanced past `Calculated`,
    /// and `StaleState` when the caller's copy is outdated.
    pub fn delete(
        &self,
        record: &BenefitRecord,
        actor: &str,
        confirmation: &str,
    ) -> EngineResult<()> {
        let lock = self.lock_for(&record.code);
        let _guard = lock.lock().expect("record lock poisoned");

        let stored = self.load_checked(record)?;
        if confirmation != DELETE_CONFIRMATION {
            return Err(EngineError::InvalidTransition {
                record_code: stored.code.clone(),
                from: stored.state,
                to: stored.state,
                message: format!("deletion requires the confirmation token '{DELETE_CONFIRMATION}'"),
            });
        }
        if !stored.state.is_deletable() {
            return Err(EngineError::RecordLocked {
                record_code: stored.code.clone(),
                state: stored.state,
            });
        }

        self.gateway.delete(&stored.code)?;
        let entry = AuditEntry {
            record_code: stored.code.clone(),
            actor: actor.to_string(),
            at: Utc::now(),
            from_state: stored.state,
            to_state: stored.state,
        };
        if let Err(audit_err) = self.gateway.record_audit(&entry) {
            warn!(
                record_code = %stored.code,
                "audit write failed, restoring deleted record"
            );
            if let Err(rollback_err) = self.gateway.save(&stored) {
                warn!(
                    record_code = %stored.code,
                    error = %rollback_err,
                    "rollback save failed, record deleted without an audit entry"
                );
            }
            return Err(audit_err);
        }
        // The record is gone, so its lock entry can go too.
        self.release_lock(&stored.code);
        info!(record_code = %stored.code, actor, "record deleted");
        Ok(())
    }
}
