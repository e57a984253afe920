//! Benefit type, period tag and service-window models.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The four statutory benefits the engine calculates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitType {
    /// Severance/time-of-service reserve, deposited twice a year.
    Cts,
    /// Statutory bonus paid in July and December.
    Gratificacion,
    /// Annual profit-share distribution.
    Utilidades,
    /// Paid-leave day accrual.
    Vacaciones,
}

impl BenefitType {
    /// Returns the record-code prefix for this benefit.
    pub fn code_prefix(self) -> &'static str {
        match self {
            BenefitType::Cts => "CTS",
            BenefitType::Gratificacion => "GRA",
            BenefitType::Utilidades => "UTI",
            BenefitType::Vacaciones => "VAC",
        }
    }

    /// Returns true for benefits restricted to two fixed campaigns per year.
    pub fn is_fixed_campaign(self) -> bool {
        matches!(self, BenefitType::Cts | BenefitType::Gratificacion)
    }
}

impl fmt::Display for BenefitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BenefitType::Cts => "cts",
            BenefitType::Gratificacion => "gratificacion",
            BenefitType::Utilidades => "utilidades",
            BenefitType::Vacaciones => "vacaciones",
        };
        write!(f, "{}", name)
    }
}

/// Identifies a calculation campaign within a year.
///
/// Fixed-campaign benefits accept only [`PeriodTag::FirstHalf`] and
/// [`PeriodTag::SecondHalf`]; the profit share accepts only
/// [`PeriodTag::Annual`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodTag {
    /// First semester campaign (May CTS deposit, July gratificación).
    FirstHalf,
    /// Second semester campaign (November CTS deposit, December gratificación).
    SecondHalf,
    /// Full fiscal year (profit share).
    Annual,
}

impl fmt::Display for PeriodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeriodTag::FirstHalf => "first_half",
            PeriodTag::SecondHalf => "second_half",
            PeriodTag::Annual => "annual",
        };
        write!(f, "{}", name)
    }
}

/// Service time accrued inside a period window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMetrics {
    /// Complete months of service.
    pub complete_months: u32,
    /// Days beyond the last complete month.
    pub additional_days: u32,
    /// Total days in the window (months at thirty days plus the residue).
    pub total_days: u32,
}

impl ServiceMetrics {
    /// Builds metrics from complete months and residual days, using the
    /// commercial thirty-day month the statutes compute with.
    pub fn from_months_and_days(complete_months: u32, additional_days: u32) -> Self {
        Self {
            complete_months,
            additional_days,
            total_days: complete_months * 30 + additional_days,
        }
    }
}

/// The resolved service window for one benefit calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitPeriod {
    /// The benefit being calculated.
    pub benefit_type: BenefitType,
    /// The campaign tag within the year.
    pub tag: PeriodTag,
    /// The campaign year (the year the benefit is paid in).
    pub year: i32,
    /// The first day of the service window (inclusive).
    pub start: NaiveDate,
    /// The last day of the service window (inclusive).
    pub end: NaiveDate,
    /// Months of service the campaign covers.
    pub service_months: u32,
}

impl BenefitPeriod {
    /// Checks if a given date falls within this period's service window.
    ///
    /// The check is inclusive of both start and end dates.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
