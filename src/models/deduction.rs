//! Deduction line model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of a withholding applied to a gross benefit amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    /// Pension-system contribution (AFP or ONP).
    PensionSystem,
    /// Fifth-category income-tax withholding.
    IncomeTax,
    /// Any other configured withholding (judicial retention, advances).
    Other,
}

/// A single itemized deduction on a benefit record.
///
/// Owned exclusively by its [`crate::models::BenefitRecord`]; lines are never
/// shared between records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLine {
    /// Short code identifying the deduction (e.g., "ONP", "RTA5").
    pub code: String,
    /// Human-readable display name.
    pub name: String,
    /// The kind of deduction.
    pub kind: DeductionKind,
    /// The computed amount, rounded to 2 decimals.
    pub amount: Decimal,
    /// The rate used to compute the amount, when rate-based.
    pub rate: Option<Decimal>,
}
