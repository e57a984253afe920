//! Worker snapshot model and related types.
//!
//! This module defines the [`WorkerSnapshot`] consumed from the external
//! Worker Directory, together with the labor-regime, pension and banking
//! types attached to it. A snapshot is immutable for the duration of one
//! calculation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The labor regime a worker is hired under.
///
/// The regime determines benefit eligibility; for example only private-regime
/// workers accrue a CTS deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborRegime {
    /// Private labor regime (D.L. 728).
    Regime728,
    /// Public administrative career regime (D.L. 276).
    Regime276,
    /// Administrative services contract (CAS).
    Cas,
}

/// The pension scheme a worker contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scheme")]
pub enum PensionScheme {
    /// Private pension fund (AFP) with the fund's combined contribution rate.
    Afp {
        /// The combined AFP contribution rate (fund + commission + insurance).
        rate: Decimal,
    },
    /// Public pension system (ONP); the rate comes from configuration.
    Onp,
    /// No pension affiliation.
    None,
}

/// Withholding-relevant attributes of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxProfile {
    /// The pension scheme the worker contributes to.
    pub pension: PensionScheme,
    /// True when the worker's projected income is below the withholding floor.
    pub income_tax_exempt: bool,
}

/// The type of a worker's deposit account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Savings account.
    Savings,
    /// Current account.
    Current,
    /// Dedicated CTS deposit account.
    Cts,
}

/// The currency of a worker's deposit account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// Peruvian sol.
    Pen,
    /// United States dollar.
    Usd,
}

/// Banking details for benefit disbursement.
///
/// Copied into each [`crate::models::BenefitRecord`] at calculation time so a
/// later change to the worker's accounts never alters an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankingDetails {
    /// The bank holding the account.
    pub bank: String,
    /// The type of account.
    pub account_type: AccountType,
    /// The account number.
    pub account_number: String,
    /// The currency of the account.
    pub currency: Currency,
}

/// A read-only snapshot of a worker, as provided by the Worker Directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    /// Unique identifier for the worker.
    pub id: String,
    /// National identity document number (DNI).
    pub national_id: String,
    /// The worker's full name.
    pub full_name: String,
    /// The municipal area the worker belongs to (e.g., "Limpieza Pública").
    pub area: String,
    /// The worker's position or role.
    pub position: String,
    /// The date the worker was hired.
    pub hire_date: NaiveDate,
    /// The date the worker's leave accrual was last reset (start of the
    /// current accrual cycle). Falls back to the hire date when absent.
    pub vacation_reset_date: Option<NaiveDate>,
    /// The labor regime the worker is hired under.
    pub labor_regime: LaborRegime,
    /// The monthly basic remuneration. Absent means the payroll master data
    /// is incomplete and any calculation for this worker must fail.
    pub basic_remuneration: Option<Decimal>,
    /// The monthly family allowance (zero when not entitled).
    pub family_allowance: Decimal,
    /// Days effectively worked in the fiscal year (profit-share factor input).
    pub days_worked: u32,
    /// Withholding-relevant attributes.
    pub tax_profile: TaxProfile,
    /// Banking details for disbursement.
    pub banking: BankingDetails,
}

impl WorkerSnapshot {
    /// Returns true if the worker accrues a CTS deposit.
    ///
    /// Only private-regime (D.L. 728) workers are CTS-eligible.
    pub fn is_cts_eligible(&self) -> bool {
        self.labor_regime == LaborRegime::Regime728
    }
}
