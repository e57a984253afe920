//! Profit-share (utilidades) accrual calculator.
//!
//! The distributable pool is a configured fraction of the fiscal-year
//! profit, split 50/50 between a days-worked factor and an annual
//! remuneration factor. Both factors are computed over the batch's selected
//! worker set, not a global population: re-running with a different worker
//! subset changes every worker's factor, which is expected behavior.

use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{BenefitPeriod, BenefitType, PeriodTag, ServiceMetrics, WorkerSnapshot};

use super::{GrossBenefit, RemunerationBase, round_money};

/// Denominators for the two distribution factors, accumulated over the
/// selected worker set before fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTotals {
    /// Sum of days worked across the selected workers.
    pub total_days: Decimal,
    /// Sum of annual remunerations across the selected workers.
    pub total_annual_remuneration: Decimal,
}

impl BatchTotals {
    /// Accumulates totals over the selected workers' resolved bases.
    pub fn from_workers<'a, I>(workers: I) -> Self
    where
        I: IntoIterator<Item = (&'a WorkerSnapshot, &'a RemunerationBase)>,
    {
        let mut total_days = Decimal::ZERO;
        let mut total_annual_remuneration = Decimal::ZERO;
        for (worker, base) in workers {
            total_days += Decimal::from(worker.days_worked);
            total_annual_remuneration += annual_remuneration(base);
        }
        Self {
            total_days,
            total_annual_remuneration,
        }
    }
}

/// Projects a worker's computable monthly total to a fiscal-year figure.
pub fn annual_remuneration(base: &RemunerationBase) -> Decimal {
    round_money(base.computable_total * Decimal::from(12))
}

/// Returns the pool distributed to workers: `company_profit × distribution_rate`,
/// rounded half-up to 2 decimals.
pub fn distributable_pool(company_profit: Decimal, config: &EngineConfig) -> Decimal {
    round_money(company_profit * config.benefits().utilidades.distribution_rate)
}

/// Computes one worker's profit share.
///
/// Half the pool is distributed proportionally to days worked, half
/// proportionally to annual remuneration; each half-share is rounded to
/// 2 decimals before summing.
///
/// # Errors
///
/// Returns `InvalidPeriod` for any period other than the annual fiscal-year
/// window, and `IncompleteRemunerationData` when the batch totals are zero
/// (no divisible denominator).
pub fn compute_utilidades(
    worker: &WorkerSnapshot,
    period: &BenefitPeriod,
    base: &RemunerationBase,
    config: &EngineConfig,
    company_profit: Decimal,
    totals: &BatchTotals,
) -> EngineResult<GrossBenefit> {
    if period.benefit_type != BenefitType::Utilidades || period.tag != PeriodTag::Annual {
        return Err(EngineError::InvalidPeriod {
            benefit_type: BenefitType::Utilidades,
            tag: period.tag,
            message: "utilidades are distributed once per fiscal year".to_string(),
        });
    }
    if totals.total_days.is_zero() || totals.total_annual_remuneration.is_zero() {
        return Err(EngineError::IncompleteRemunerationData {
            worker_id: worker.id.clone(),
            message: "batch totals for the selected worker set are zero".to_string(),
        });
    }

    let pool = distributable_pool(company_profit, config);
    let half_pool = round_money(pool / Decimal::from(2));

    let days_factor = Decimal::from(worker.days_worked) / totals.total_days;
    let remuneration_factor = annual_remuneration(base) / totals.total_annual_remuneration;

    let days_share = round_money(half_pool * days_factor);
    let remuneration_share = round_money(half_pool * remuneration_factor);
    let gross = round_money(days_share + remuneration_share);

    Ok(GrossBenefit {
        breakdown: base.to_breakdown(Decimal::ZERO),
        service: ServiceMetrics::from_months_and_days(period.service_months, 0),
        gross,
        extraordinary_bonus: None,
        days_generated: None,
    })
}
