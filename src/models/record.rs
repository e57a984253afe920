//! Benefit record model.
//!
//! This module contains the [`BenefitRecord`] type produced by the
//! calculation pipeline, its [`RecordState`] workflow enum, the
//! [`RemunerationBreakdown`] carried on each record and the [`AuditEntry`]
//! emitted on every lifecycle transition.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BankingDetails, BenefitType, DeductionLine, PeriodTag, ServiceMetrics};

/// The workflow state of a benefit record.
///
/// Records move `Draft → Calculated → Approved → Deposited/Paid`, with
/// `Observed` reachable from `Calculated` or `Approved` as a correction
/// branch that re-enters `Calculated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    /// Created but not yet calculated.
    Draft,
    /// Amounts computed, awaiting approval.
    Calculated,
    /// Approved for disbursement.
    Approved,
    /// Flagged for correction; re-enters `Calculated` after recalculation.
    Observed,
    /// Deposited in the worker's CTS account (terminal, CTS only).
    Deposited,
    /// Paid out (terminal, all other benefits).
    Paid,
}

impl RecordState {
    /// Returns true for the terminal payment states.
    ///
    /// Once terminal, a record's monetary fields are frozen; only the
    /// receipt number may still be attached.
    pub fn is_terminal(self) -> bool {
        matches!(self, RecordState::Deposited | RecordState::Paid)
    }

    /// Returns true while the record may still be deleted.
    pub fn is_deletable(self) -> bool {
        matches!(self, RecordState::Draft | RecordState::Calculated)
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordState::Draft => "draft",
            RecordState::Calculated => "calculated",
            RecordState::Approved => "approved",
            RecordState::Observed => "observed",
            RecordState::Deposited => "deposited",
            RecordState::Paid => "paid",
        };
        write!(f, "{}", name)
    }
}

/// Returns the terminal state the given benefit disburses into.
pub fn terminal_state_for(benefit_type: BenefitType) -> RecordState {
    match benefit_type {
        BenefitType::Cts => RecordState::Deposited,
        _ => RecordState::Paid,
    }
}

/// The remuneration components a benefit was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemunerationBreakdown {
    /// Monthly basic remuneration.
    pub basic: Decimal,
    /// Monthly family allowance.
    pub family_allowance: Decimal,
    /// Arithmetic mean of variable components over the look-back window.
    pub averaged_variable: Decimal,
    /// Statutory bonus paid inside the look-back window (CTS base input).
    pub statutory_bonus: Decimal,
    /// One sixth of the statutory bonus (CTS base component).
    pub bonus_sixth: Decimal,
    /// The computable total the calculator applied its formula to.
    pub computable_total: Decimal,
}

/// An audit entry emitted to the Persistence Gateway on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The record the transition applied to.
    pub record_code: String,
    /// Who performed the transition.
    pub actor: String,
    /// When the transition happened.
    pub at: DateTime<Utc>,
    /// The state before the transition.
    pub from_state: RecordState,
    /// The state after the transition.
    pub to_state: RecordState,
}

/// One computed benefit for one worker in one period.
///
/// Records are created only by the calculation pipeline, mutated only through
/// the lifecycle manager's transitions, and deleted only pre-approval through
/// the explicit confirmed deletion operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitRecord {
    /// Generated record code (e.g., "CTS-2025-a1b2c3d4").
    pub code: String,
    /// The worker the record belongs to.
    pub worker_id: String,
    /// The worker's full name at calculation time.
    pub worker_name: String,
    /// The worker's area at calculation time.
    pub area: String,
    /// The benefit this record was computed for.
    pub benefit_type: BenefitType,
    /// The campaign tag within the year.
    pub period_tag: PeriodTag,
    /// The campaign year.
    pub year: i32,
    /// First day of the service window.
    pub period_start: NaiveDate,
    /// Last day of the service window.
    pub period_end: NaiveDate,
    /// Service accrued inside the window.
    pub service: ServiceMetrics,
    /// The remuneration components the amounts derive from.
    pub remuneration: RemunerationBreakdown,
    /// Accrued leave days, for the paid-leave benefit only.
    pub days_generated: Option<Decimal>,
    /// Extraordinary bonus tracked separately from the gross (gratificación).
    pub extraordinary_bonus: Option<Decimal>,
    /// Gross benefit amount, rounded to 2 decimals.
    pub gross_amount: Decimal,
    /// Itemized deductions.
    pub deductions: Vec<DeductionLine>,
    /// Sum of deduction amounts.
    pub total_deductions: Decimal,
    /// Net payable amount (`gross_amount - total_deductions`).
    pub net_amount: Decimal,
    /// Banking details copied from the worker snapshot at calculation time.
    pub banking: BankingDetails,
    /// The workflow state.
    pub state: RecordState,
    /// The correction note attached when the record was observed.
    pub observation: Option<String>,
    /// When the record was calculated.
    pub calculated_at: DateTime<Utc>,
    /// When the record was approved, if it has been.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the record was deposited or paid, if it has been.
    pub paid_at: Option<DateTime<Utc>>,
    /// Who ran the calculation.
    pub calculated_by: String,
    /// Who approved the record.
    pub approved_by: Option<String>,
    /// Who disbursed the record.
    pub paid_by: Option<String>,
    /// Receipt or voucher reference issued at disbursement.
    pub receipt_number: Option<String>,
    /// The configuration version the amounts were computed with.
    pub config_version: String,
    /// Optimistic-lock version, bumped on every stored mutation.
    pub version: u64,
}

impl BenefitRecord {
    /// Verifies the monetary invariants of the record.
    ///
    /// `net_amount` must equal `gross_amount - total_deductions` and
    /// `total_deductions` must equal the sum of the deduction lines.
    pub fn totals_consistent(&self) -> bool {
        let line_sum: Decimal = self.deductions.iter().map(|d| d.amount).sum();
        line_sum == self.total_deductions
            && self.net_amount == self.gross_amount - self.total_deductions
    }
}
