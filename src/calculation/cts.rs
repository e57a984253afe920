//! Severance reserve (CTS) accrual calculator.
//!
//! The CTS base is the computable remuneration plus one sixth of the
//! statutory bonus paid inside the semester; the gross deposit is the base
//! prorated by the fixed campaign length. Service months for this benefit
//! are always the campaign constant, never derived from actual attendance.

use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{BenefitPeriod, BenefitType, PeriodTag, ServiceMetrics, WorkerSnapshot};

use super::{GrossBenefit, RemunerationBase, round_money};

/// Computes the gross CTS deposit for one worker and campaign.
///
/// Formula: `base = computable_total + statutory_bonus / 6`, then
/// `gross = base × campaign_months / 12`, each stage rounded half-up to
/// 2 decimals.
///
/// # Errors
///
/// Returns `InvalidPeriod` when the period is not one of the two CTS
/// campaigns, and `WorkerNotEligible` for workers outside the private
/// labor regime.
///
/// # Example
///
/// A worker with basic pay 1000.00, no allowance, and a 300.00 semester
/// bonus accrues `(1000.00 + 50.00) × 6 / 12 = 525.00`.
pub fn compute_cts(
    worker: &WorkerSnapshot,
    period: &BenefitPeriod,
    base: &RemunerationBase,
    config: &EngineConfig,
) -> EngineResult<GrossBenefit> {
    if period.benefit_type != BenefitType::Cts
        || !matches!(period.tag, PeriodTag::FirstHalf | PeriodTag::SecondHalf)
    {
        return Err(EngineError::InvalidPeriod {
            benefit_type: BenefitType::Cts,
            tag: period.tag,
            message: "CTS is deposited in the May and November campaigns only".to_string(),
        });
    }
    if !worker.is_cts_eligible() {
        return Err(EngineError::WorkerNotEligible {
            worker_id: worker.id.clone(),
            benefit_type: BenefitType::Cts,
        });
    }

    let cts = &config.benefits().cts;

    let bonus_sixth = round_money(base.statutory_bonus / Decimal::from(cts.bonus_fraction_divisor));
    let computable = round_money(base.computable_total + bonus_sixth);

    // The campaign length is a statutory constant, not attendance-driven.
    let service = ServiceMetrics::from_months_and_days(cts.campaign_months, 0);
    let gross = round_money(
        computable * Decimal::from(cts.campaign_months)
            / Decimal::from(cts.months_per_year_divisor),
    );

    let mut breakdown = base.to_breakdown(bonus_sixth);
    breakdown.computable_total = computable;

    Ok(GrossBenefit {
        breakdown,
        service,
        gross,
        extraordinary_bonus: None,
        days_generated: None,
    })
}
