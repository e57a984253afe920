//! Statutory bonus (gratificación) accrual calculator.
//!
//! The gross bonus is the computable remuneration total for the semester.
//! On top of it, a separately tracked extraordinary bonus (a fixed
//! percentage, Ley 30334) is granted while the configuration flag is set.
//! Calculation outside the July and December campaigns fails; it never
//! silently computes zero.

use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{BenefitPeriod, BenefitType, PeriodTag, ServiceMetrics, WorkerSnapshot};

use super::{GrossBenefit, RemunerationBase, round_money};

/// Computes the gross statutory bonus for one worker and campaign.
///
/// `gross = computable_total`; the extraordinary bonus is
/// `computable_total × extraordinary_rate`, rounded half-up to 2 decimals,
/// tracked separately from the gross and only present while enabled in
/// configuration.
///
/// # Errors
///
/// Returns `InvalidPeriod` when the period is not one of the two legal
/// campaigns (first half paid in July, second half paid in December).
pub fn compute_gratificacion(
    _worker: &WorkerSnapshot,
    period: &BenefitPeriod,
    base: &RemunerationBase,
    config: &EngineConfig,
) -> EngineResult<GrossBenefit> {
    if period.benefit_type != BenefitType::Gratificacion
        || !matches!(period.tag, PeriodTag::FirstHalf | PeriodTag::SecondHalf)
    {
        return Err(EngineError::InvalidPeriod {
            benefit_type: BenefitType::Gratificacion,
            tag: period.tag,
            message: "gratificaciones are paid in July and December only".to_string(),
        });
    }

    let grati = &config.benefits().gratificacion;

    let gross = base.computable_total;
    let extraordinary_bonus = if grati.extraordinary_enabled {
        Some(round_money(gross * grati.extraordinary_rate))
    } else {
        None
    };

    Ok(GrossBenefit {
        breakdown: base.to_breakdown(Decimal::ZERO),
        service: ServiceMetrics::from_months_and_days(period.service_months, 0),
        gross,
        extraordinary_bonus,
        days_generated: None,
    })
}
