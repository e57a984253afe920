//! Calculation logic for the Benefit Calculation Engine.
//!
//! This module contains the pure calculation functions of the engine: the
//! period engine resolving campaign windows, the remuneration resolver
//! deriving the computable base, the four accrual calculators (CTS,
//! gratificación, utilidades, vacaciones) and the deduction engine. All
//! functions here are synchronous, side-effect-free and deterministic for
//! fixed inputs, so calculations are reproducible for audits.

mod cts;
mod deductions;
mod gratificacion;
mod period;
mod remuneration;
mod utilidades;
mod vacaciones;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{RemunerationBreakdown, ServiceMetrics};

pub use cts::compute_cts;
pub use deductions::{DeductionOutcome, apply_deductions};
pub use gratificacion::compute_gratificacion;
pub use period::{resolve_period, vacation_accrual, vacation_period};
pub use remuneration::{RemunerationBase, RemunerationHistory, resolve_base};
pub use utilidades::{BatchTotals, annual_remuneration, compute_utilidades, distributable_pool};
pub use vacaciones::compute_vacaciones;

/// Rounds a monetary figure to 2 decimal places using arithmetic half-up
/// rounding.
///
/// Every intermediate multiplication stage of the statutory formulas rounds
/// through this function. Banker's rounding is deliberately not used; the
/// reference payroll outputs round midpoints away from zero.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let value = Decimal::from_str("10.005").unwrap();
/// assert_eq!(round_money(value), Decimal::from_str("10.01").unwrap());
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The gross-side output of an accrual calculator, before deductions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrossBenefit {
    /// The remuneration components the gross derives from.
    pub breakdown: RemunerationBreakdown,
    /// Service accrued in the period.
    pub service: ServiceMetrics,
    /// The gross benefit amount, rounded to 2 decimals.
    pub gross: Decimal,
    /// Extraordinary bonus tracked separately (gratificación only).
    pub extraordinary_bonus: Option<Decimal>,
    /// Accrued leave days (vacaciones only).
    pub days_generated: Option<Decimal>,
}
