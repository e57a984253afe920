//! External collaborator contracts.
//!
//! The engine talks to two named collaborators: the Worker Directory, a
//! read-only list of eligible workers, and the Persistence/Notification
//! Gateway, which stores computed records, audit entries and issues payment
//! receipts. No wire format is prescribed; any implementation preserving the
//! data model is conformant. Persistence retries belong to gateway
//! implementations, not to the engine.

mod memory;

use crate::error::EngineResult;
use crate::models::{
    AuditEntry, BenefitPeriod, BenefitRecord, BenefitType, PeriodTag, RecordState, WorkerSnapshot,
};

pub use memory::{InMemoryDirectory, InMemoryGateway, StaticRemunerationHistory};

/// Criteria for loading stored benefit records. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Match a single record code.
    pub code: Option<String>,
    /// Match records of one worker.
    pub worker_id: Option<String>,
    /// Match records of one benefit type.
    pub benefit_type: Option<BenefitType>,
    /// Match records of one campaign tag.
    pub period_tag: Option<PeriodTag>,
    /// Match records of one year.
    pub year: Option<i32>,
    /// Match records in one state.
    pub state: Option<RecordState>,
}

impl RecordFilter {
    /// Builds a filter matching a single record by code.
    pub fn by_code(code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            ..Self::default()
        }
    }

    /// Builds the duplicate-detection filter: one worker, period and benefit.
    pub fn by_worker_period(
        worker_id: &str,
        benefit_type: BenefitType,
        period_tag: PeriodTag,
        year: i32,
    ) -> Self {
        Self {
            worker_id: Some(worker_id.to_string()),
            benefit_type: Some(benefit_type),
            period_tag: Some(period_tag),
            year: Some(year),
            ..Self::default()
        }
    }

    /// Returns true when the record matches every set criterion.
    pub fn matches(&self, record: &BenefitRecord) -> bool {
        self.code.as_deref().is_none_or(|c| c == record.code)
            && self
                .worker_id
                .as_deref()
                .is_none_or(|w| w == record.worker_id)
            && self.benefit_type.is_none_or(|b| b == record.benefit_type)
            && self.period_tag.is_none_or(|t| t == record.period_tag)
            && self.year.is_none_or(|y| y == record.year)
            && self.state.is_none_or(|s| s == record.state)
    }
}

/// Read-only directory of workers eligible for a benefit.
pub trait WorkerDirectory: Send + Sync {
    /// Lists the workers eligible for the benefit in the period. The
    /// predicate encodes benefit-specific eligibility (e.g., only the
    /// private labor regime for the severance reserve).
    fn list_eligible_workers(
        &self,
        benefit_type: BenefitType,
        period: &BenefitPeriod,
        predicate: &dyn Fn(&WorkerSnapshot) -> bool,
    ) -> EngineResult<Vec<WorkerSnapshot>>;
}

/// Persistence and notification collaborator.
///
/// Implementations own durability and retries; the engine treats any error
/// from these methods as final for the current operation and rolls back its
/// in-memory transition.
pub trait PersistenceGateway: Send + Sync {
    /// Stores a record, overwriting any record with the same code, and
    /// returns the stored state.
    fn save(&self, record: &BenefitRecord) -> EngineResult<BenefitRecord>;

    /// Loads the records matching the filter.
    fn load_by_filter(&self, filter: &RecordFilter) -> EngineResult<Vec<BenefitRecord>>;

    /// Removes a record by code.
    fn delete(&self, code: &str) -> EngineResult<()>;

    /// Appends a lifecycle audit entry.
    fn record_audit(&self, entry: &AuditEntry) -> EngineResult<()>;

    /// Issues a payment receipt reference for a record about to be disbursed.
    fn issue_receipt(&self, record: &BenefitRecord) -> EngineResult<String>;
}
