//! Period engine: campaign windows and leave accrual metrics.
//!
//! Maps a calendar period (year + campaign tag) to the exact service window
//! for each benefit. The two fixed-campaign benefits (CTS, gratificación)
//! accept only their two legally defined campaigns per year, independent of
//! the caller's current calendar date; the service windows are
//! campaign-relative, not calendar-year-relative.

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::models::{BenefitPeriod, BenefitType, PeriodTag, ServiceMetrics};

/// Resolves the service window for a benefit campaign.
///
/// Campaign windows:
/// - CTS first half: November 1 of the previous year to April 30 (May deposit).
/// - CTS second half: May 1 to October 31 (November deposit).
/// - Gratificación first half: January 1 to June 30 (July payment).
/// - Gratificación second half: July 1 to December 31 (December payment).
/// - Utilidades: the full fiscal year, `annual` tag only.
///
/// # Errors
///
/// Returns `InvalidPeriod` for any tag outside the benefit's legal campaigns,
/// and for the paid-leave benefit, which accrues continuously and is resolved
/// through [`vacation_period`] instead.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::resolve_period;
/// use benefit_engine::models::{BenefitType, PeriodTag};
/// use chrono::NaiveDate;
///
/// let period = resolve_period(BenefitType::Cts, PeriodTag::FirstHalf, 2025).unwrap();
/// assert_eq!(period.start, NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
/// assert_eq!(period.end, NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
/// assert_eq!(period.service_months, 6);
/// ```
pub fn resolve_period(
    benefit_type: BenefitType,
    tag: PeriodTag,
    year: i32,
) -> EngineResult<BenefitPeriod> {
    let window = match (benefit_type, tag) {
        (BenefitType::Cts, PeriodTag::FirstHalf) => Some((
            date(year - 1, 11, 1),
            date(year, 4, 30),
            6,
        )),
        (BenefitType::Cts, PeriodTag::SecondHalf) => {
            Some((date(year, 5, 1), date(year, 10, 31), 6))
        }
        (BenefitType::Gratificacion, PeriodTag::FirstHalf) => {
            Some((date(year, 1, 1), date(year, 6, 30), 6))
        }
        (BenefitType::Gratificacion, PeriodTag::SecondHalf) => {
            Some((date(year, 7, 1), date(year, 12, 31), 6))
        }
        (BenefitType::Utilidades, PeriodTag::Annual) => {
            Some((date(year, 1, 1), date(year, 12, 31), 12))
        }
        _ => None,
    };

    match window {
        Some((start, end, service_months)) => Ok(BenefitPeriod {
            benefit_type,
            tag,
            year,
            start,
            end,
            service_months,
        }),
        None => Err(EngineError::InvalidPeriod {
            benefit_type,
            tag,
            message: campaign_rule(benefit_type).to_string(),
        }),
    }
}

/// Computes elapsed service since the worker's last leave-accrual reset.
///
/// Uses the commercial thirty-day month the statutes compute with. A reset
/// date in the future of the reference date clamps to zero service.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::vacation_accrual;
/// use chrono::NaiveDate;
///
/// let reset = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let as_of = NaiveDate::from_ymd_opt(2025, 4, 25).unwrap();
/// let metrics = vacation_accrual(reset, as_of);
/// assert_eq!(metrics.complete_months, 3);
/// assert_eq!(metrics.additional_days, 15);
/// ```
pub fn vacation_accrual(last_reset: NaiveDate, as_of: NaiveDate) -> ServiceMetrics {
    if as_of <= last_reset {
        return ServiceMetrics::from_months_and_days(0, 0);
    }

    let mut months =
        (as_of.year() - last_reset.year()) * 12 + as_of.month() as i32 - last_reset.month() as i32;
    if as_of.day() < last_reset.day() {
        months -= 1;
    }
    let months = months.max(0) as u32;

    // Anchor at the end of the last complete month; the residue is counted in
    // calendar days from there.
    let anchor = add_months(last_reset, months);
    let additional_days = (as_of - anchor).num_days().max(0) as u32;

    ServiceMetrics::from_months_and_days(months, additional_days)
}

/// Builds the paid-leave period for a record: the window runs from the last
/// accrual reset to the reference date.
pub fn vacation_period(
    last_reset: NaiveDate,
    as_of: NaiveDate,
    year: i32,
) -> (BenefitPeriod, ServiceMetrics) {
    let metrics = vacation_accrual(last_reset, as_of);
    let period = BenefitPeriod {
        benefit_type: BenefitType::Vacaciones,
        tag: PeriodTag::Annual,
        year,
        start: last_reset,
        end: as_of.max(last_reset),
        service_months: metrics.complete_months,
    };
    (period, metrics)
}

fn campaign_rule(benefit_type: BenefitType) -> &'static str {
    match benefit_type {
        BenefitType::Cts => "CTS is deposited in the May and November campaigns only",
        BenefitType::Gratificacion => "gratificaciones are paid in July and December only",
        BenefitType::Utilidades => "utilidades are distributed once per fiscal year",
        BenefitType::Vacaciones => {
            "paid leave accrues continuously; resolve it from the accrual reset date"
        }
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    // Campaign boundaries are fixed month/day pairs, always valid.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn add_months(base: NaiveDate, months: u32) -> NaiveDate {
    base.checked_add_months(chrono::Months::new(months))
        .unwrap_or(base)
}
