//! In-memory collaborator implementations.
//!
//! These back the integration tests and serve as the reference behavior for
//! gateway implementations: atomic per-record saves, append-only audit log,
//! sequential receipt numbers. The failure toggles let tests exercise the
//! engine's rollback path.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditEntry, BenefitPeriod, BenefitRecord, BenefitType, WorkerSnapshot};

use super::{PersistenceGateway, RecordFilter, WorkerDirectory};

/// An in-memory persistence gateway.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    records: Mutex<HashMap<String, BenefitRecord>>,
    audits: Mutex<Vec<AuditEntry>>,
    receipt_seq: AtomicU64,
    fail_saves: AtomicBool,
    fail_audits: AtomicBool,
}

impl InMemoryGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `save` fail, for rollback tests.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `record_audit` fail, for rollback tests.
    pub fn set_fail_audits(&self, fail: bool) {
        self.fail_audits.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the audit log.
    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.audits.lock().expect("audit lock poisoned").clone()
    }

    /// Returns the number of stored records.
    pub fn record_count(&self) -> usize {
        self.records.lock().expect("record lock poisoned").len()
    }
}

impl PersistenceGateway for InMemoryGateway {
    fn save(&self, record: &BenefitRecord) -> EngineResult<BenefitRecord> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(EngineError::PersistenceFailure {
                message: "storage unavailable".to_string(),
            });
        }
        let mut records = self.records.lock().expect("record lock poisoned");
        records.insert(record.code.clone(), record.clone());
        Ok(record.clone())
    }

    fn load_by_filter(&self, filter: &RecordFilter) -> EngineResult<Vec<BenefitRecord>> {
        let records = self.records.lock().expect("record lock poisoned");
        let mut matched: Vec<BenefitRecord> = records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(matched)
    }

    fn delete(&self, code: &str) -> EngineResult<()> {
        let mut records = self.records.lock().expect("record lock poisoned");
        records.remove(code);
        Ok(())
    }

    fn record_audit(&self, entry: &AuditEntry) -> EngineResult<()> {
        if self.fail_audits.load(Ordering::SeqCst) {
            return Err(EngineError::PersistenceFailure {
                message: "audit log unavailable".to_string(),
            });
        }
        let mut audits = self.audits.lock().expect("audit lock poisoned");
        audits.push(entry.clone());
        Ok(())
    }

    fn issue_receipt(&self, record: &BenefitRecord) -> EngineResult<String> {
        let seq = self.receipt_seq.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("REC-{}-{:05}", record.year, seq))
    }
}

/// An in-memory worker directory over a fixed worker list.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    workers: Vec<WorkerSnapshot>,
}

impl InMemoryDirectory {
    /// Creates a directory over the given workers.
    pub fn new(workers: Vec<WorkerSnapshot>) -> Self {
        Self { workers }
    }
}

impl WorkerDirectory for InMemoryDirectory {
    fn list_eligible_workers(
        &self,
        _benefit_type: BenefitType,
        _period: &BenefitPeriod,
        predicate: &dyn Fn(&WorkerSnapshot) -> bool,
    ) -> EngineResult<Vec<WorkerSnapshot>> {
        Ok(self
            .workers
            .iter()
            .filter(|w| predicate(w))
            .cloned()
            .collect())
    }
}

/// A remuneration history returning fixed averaged figures for every worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRemunerationHistory {
    /// The averaged variable component returned for every query.
    pub averaged_variable: Decimal,
    /// The statutory bonus returned for every query.
    pub statutory_bonus: Decimal,
}

impl crate::calculation::RemunerationHistory for StaticRemunerationHistory {
    fn averaged_variable(
        &self,
        _worker_id: &str,
        _window: (NaiveDate, NaiveDate),
    ) -> EngineResult<Decimal> {
        Ok(self.averaged_variable)
    }

    fn last_statutory_bonus(
        &self,
        _worker_id: &str,
        _window: (NaiveDate, NaiveDate),
    ) -> EngineResult<Decimal> {
        Ok(self.statutory_bonus)
    }
}
