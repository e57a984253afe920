//! Paid-leave (vacaciones) accrual calculator.
//!
//! Leave accrues continuously: each full month of service generates a
//! twelfth of the statutory yearly days, and the residual days beyond the
//! last full month accrue proportionally. The monetary value of the accrued
//! days is the computable remuneration prorated by thirtieths.

use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{BenefitPeriod, BenefitType, ServiceMetrics, WorkerSnapshot};

use super::{GrossBenefit, RemunerationBase, round_money};

/// Computes the accrued leave days and their monetary value.
///
/// `days = full_months × (statutory_days / 12) + residual_days × (statutory_days / 12) / 30`,
/// and `gross = computable_total × days / 30`, every figure rounded half-up
/// to 2 decimals at each stage.
///
/// # Errors
///
/// Returns `InvalidPeriod` when the period was not built for the paid-leave
/// benefit (see [`crate::calculation::vacation_period`]).
pub fn compute_vacaciones(
    _worker: &WorkerSnapshot,
    period: &BenefitPeriod,
    service: &ServiceMetrics,
    base: &RemunerationBase,
    config: &EngineConfig,
) -> EngineResult<GrossBenefit> {
    if period.benefit_type != BenefitType::Vacaciones {
        return Err(EngineError::InvalidPeriod {
            benefit_type: BenefitType::Vacaciones,
            tag: period.tag,
            message: "paid leave accrues continuously; resolve it from the accrual reset date"
                .to_string(),
        });
    }

    let vacaciones = &config.benefits().vacaciones;

    let days_per_month =
        Decimal::from(vacaciones.statutory_days_per_year) / Decimal::from(12);
    let residual = round_money(
        Decimal::from(service.additional_days) * days_per_month / Decimal::from(30),
    );
    let days_generated =
        round_money(Decimal::from(service.complete_months) * days_per_month + residual);

    let gross = round_money(base.computable_total * days_generated / Decimal::from(30));

    Ok(GrossBenefit {
        breakdown: base.to_breakdown(Decimal::ZERO),
        service: *service,
        gross,
        extraordinary_bonus: None,
        days_generated: Some(days_generated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::testutil::{test_config, test_worker};
    use crate::calculation::vacation_period;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn base_of(total: &str) -> RemunerationBase {
        RemunerationBase {
            basic: dec(total),
            family_allowance: Decimal::ZERO,
            averaged_variable: Decimal::ZERO,
            statutory_bonus: Decimal::ZERO,
            computable_total: dec(total),
        }
    }

    /// VA-001: full months accrue 2.5 days each.
    #[test]
    fn test_full_months_accrue_days() {
        let config = test_config();
        let worker = test_worker("w_001", Some(dec("3000.00")));
        let (period, service) = vacation_period(ymd(2025, 1, 1), ymd(2025, 7, 1), 2025);

        let result =
            compute_vacaciones(&worker, &period, &service, &base_of("3000.00"), &config).unwrap();

        assert_eq!(result.days_generated, Some(dec("15.00")));
        // 3000 * 15 / 30 = 1500
        assert_eq!(result.gross, dec("1500.00"));
    }

    /// VA-002: residual days accrue proportionally.
    #[test]
    fn test_residual_days_prorated() {
        let config = test_config();
        let worker = test_worker("w_001", Some(dec("3000.00")));
        let (period, service) = vacation_period(ymd(2025, 1, 10), ymd(2025, 4, 25), 2025);

        assert_eq!(service.complete_months, 3);
        assert_eq!(service.additional_days, 15);

        let result =
            compute_vacaciones(&worker, &period, &service, &base_of("3000.00"), &config).unwrap();

        // 3 * 2.5 + 15 * 2.5 / 30 = 7.5 + 1.25 = 8.75
        assert_eq!(result.days_generated, Some(dec("8.75")));
        // 3000 * 8.75 / 30 = 875
        assert_eq!(result.gross, dec("875.00"));
    }

    /// VA-003: future-dated reset accrues nothing.
    #[test]
    fn test_future_reset_accrues_zero() {
        let config = test_config();
        let worker = test_worker("w_001", Some(dec("3000.00")));
        let (period, service) = vacation_period(ymd(2026, 1, 1), ymd(2025, 6, 1), 2025);

        let result =
            compute_vacaciones(&worker, &period, &service, &base_of("3000.00"), &config).unwrap();

        assert_eq!(result.days_generated, Some(Decimal::ZERO.round_dp(2)));
        assert_eq!(result.gross, dec("0.00"));
    }

    #[test]
    fn test_monetary_value_rounds_half_up() {
        let config = test_config();
        let worker = test_worker("w_001", Some(dec("1234.56")));
        let (period, service) = vacation_period(ymd(2025, 1, 1), ymd(2025, 2, 1), 2025);

        let result =
            compute_vacaciones(&worker, &period, &service, &base_of("1234.56"), &config).unwrap();

        // 1 month -> 2.5 days; 1234.56 * 2.5 / 30 = 102.88
        assert_eq!(result.days_generated, Some(dec("2.50")));
        assert_eq!(result.gross, dec("102.88"));
    }

    #[test]
    fn test_wrong_benefit_period_is_rejected() {
        let config = test_config();
        let worker = test_worker("w_001", Some(dec("3000.00")));
        let period = crate::calculation::resolve_period(
            BenefitType::Cts,
            crate::models::PeriodTag::FirstHalf,
            2025,
        )
        .unwrap();
        let service = ServiceMetrics::from_months_and_days(6, 0);

        assert!(matches!(
            compute_vacaciones(&worker, &period, &service, &base_of("3000.00"), &config)
                .unwrap_err(),
            EngineError::InvalidPeriod { .. }
        ));
    }
}
