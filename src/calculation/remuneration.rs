//! Remuneration resolver: derives the computable remuneration base.
//!
//! Combines the fixed components of a worker's pay (basic remuneration,
//! family allowance) with the averaged variable components (overtime,
//! commissions, production bonuses) over the benefit's look-back window.
//! Components are returned separately so each accrual calculator can apply
//! its benefit-specific weighting.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{BenefitPeriod, RemunerationBreakdown, WorkerSnapshot};

use super::round_money;

/// Collaborator providing historical remuneration figures.
///
/// Variable components are averaged by the payroll history holder, not by the
/// engine; the engine asks for the arithmetic mean over the look-back window
/// (the resolved period window: the semester for bonuses, the fiscal year for
/// the profit share).
pub trait RemunerationHistory: Send + Sync {
    /// Returns the arithmetic mean of the worker's variable components
    /// (overtime, commissions, bonuses) over the window.
    fn averaged_variable(
        &self,
        worker_id: &str,
        window: (NaiveDate, NaiveDate),
    ) -> EngineResult<Decimal>;

    /// Returns the statutory bonus paid to the worker inside the window,
    /// used for the one-sixth component of the CTS base.
    fn last_statutory_bonus(
        &self,
        worker_id: &str,
        window: (NaiveDate, NaiveDate),
    ) -> EngineResult<Decimal>;
}

/// The computable remuneration base for one worker and period.
#[derive(Debug, Clone, PartialEq)]
pub struct RemunerationBase {
    /// Monthly basic remuneration.
    pub basic: Decimal,
    /// Monthly family allowance.
    pub family_allowance: Decimal,
    /// Averaged variable components over the look-back window.
    pub averaged_variable: Decimal,
    /// Statutory bonus paid inside the look-back window.
    pub statutory_bonus: Decimal,
    /// `basic + family_allowance + averaged_variable`, rounded to 2 decimals.
    pub computable_total: Decimal,
}

impl RemunerationBase {
    /// Converts the base into the breakdown stored on a record, with the
    /// CTS bonus-sixth component filled in by the calculator.
    pub fn to_breakdown(&self, bonus_sixth: Decimal) -> RemunerationBreakdown {
        RemunerationBreakdown {
            basic: self.basic,
            family_allowance: self.family_allowance,
            averaged_variable: self.averaged_variable,
            statutory_bonus: self.statutory_bonus,
            bonus_sixth,
            computable_total: self.computable_total,
        }
    }
}

/// Derives the computable remuneration base for a worker over a period.
///
/// # Errors
///
/// Returns `IncompleteRemunerationData` when the worker's basic remuneration
/// is absent; the basic pay is a required fixed component and a calculation
/// cannot proceed without it.
pub fn resolve_base(
    worker: &WorkerSnapshot,
    period: &BenefitPeriod,
    history: &dyn RemunerationHistory,
) -> EngineResult<RemunerationBase> {
    let basic = worker.basic_remuneration.ok_or_else(|| {
        EngineError::IncompleteRemunerationData {
            worker_id: worker.id.clone(),
            message: "basic remuneration is not set".to_string(),
        }
    })?;

    let window = (period.start, period.end);
    let averaged_variable = history.averaged_variable(&worker.id, window)?;
    let statutory_bonus = history.last_statutory_bonus(&worker.id, window)?;

    let computable_total = round_money(basic + worker.family_allowance + averaged_variable);

    Ok(RemunerationBase {
        basic,
        family_allowance: worker.family_allowance,
        averaged_variable,
        statutory_bonus,
        computable_total,
    })
}
