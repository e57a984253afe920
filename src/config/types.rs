//! Configuration types for benefit calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. A calculation run pins
//! the configuration version it used, so recalculating after a config change
//! is detectable and never silently mutates historical records.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Metadata about the configuration snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// The municipal entity the configuration belongs to.
    pub entity: String,
    /// The version tag of this configuration snapshot (e.g., "2025-01").
    pub version: String,
}

/// Constants for the severance reserve (CTS) calculation.
#[derive(Debug, Clone, Deserialize)]
pub struct CtsConfig {
    /// Fixed campaign length in months; CTS never uses actual attendance.
    pub campaign_months: u32,
    /// The divisor turning service months into a yearly fraction.
    pub months_per_year_divisor: u32,
    /// Divisor for the statutory-bonus share added to the base (one sixth).
    pub bonus_fraction_divisor: u32,
}

/// Constants for the statutory bonus (gratificación) calculation.
#[derive(Debug, Clone, Deserialize)]
pub struct GratificacionConfig {
    /// The extraordinary bonus rate applied on top of the gross (Ley 30334).
    pub extraordinary_rate: Decimal,
    /// Whether the extraordinary bonus is currently granted.
    pub extraordinary_enabled: bool,
}

/// Constants for the profit-share (utilidades) distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct UtilidadesConfig {
    /// The fraction of company profit distributed to workers.
    pub distribution_rate: Decimal,
}

/// Constants for the paid-leave (vacaciones) accrual.
#[derive(Debug, Clone, Deserialize)]
pub struct VacacionesConfig {
    /// Statutory leave days accrued per full year of service.
    pub statutory_days_per_year: u32,
}

/// Per-benefit statutory constants from benefits.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct BenefitsConfig {
    /// Severance reserve constants.
    pub cts: CtsConfig,
    /// Statutory bonus constants.
    pub gratificacion: GratificacionConfig,
    /// Profit-share constants.
    pub utilidades: UtilidadesConfig,
    /// Paid-leave constants.
    pub vacaciones: VacacionesConfig,
}

/// A single rate-based withholding rule.
#[derive(Debug, Clone, Deserialize)]
pub struct WithholdingRule {
    /// Short code identifying the deduction (e.g., "ONP").
    pub code: String,
    /// Human-readable display name.
    pub name: String,
    /// The withholding rate applied to the gross amount.
    pub rate: Decimal,
}

/// Pension-system deduction rules from deductions.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PensionDeductionConfig {
    /// Whether pension withholding is applied at all.
    pub enabled: bool,
    /// The public pension system (ONP) rule.
    pub onp: WithholdingRule,
    /// Display code and name for AFP lines; the rate comes from the worker's
    /// fund affiliation, not from configuration.
    pub afp_code: String,
    /// Display name for AFP lines.
    pub afp_name: String,
}

/// Income-tax withholding rules from deductions.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeTaxConfig {
    /// Whether income-tax withholding is applied at all.
    pub enabled: bool,
    /// The fifth-category withholding rule.
    pub rule: WithholdingRule,
}

/// Deduction configuration from deductions.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionConfig {
    /// Pension-system withholding rules.
    pub pension: PensionDeductionConfig,
    /// Income-tax withholding rules.
    pub income_tax: IncomeTaxConfig,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    metadata: EngineMetadata,
    benefits: BenefitsConfig,
    deductions: DeductionConfig,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        metadata: EngineMetadata,
        benefits: BenefitsConfig,
        deductions: DeductionConfig,
    ) -> Self {
        Self {
            metadata,
            benefits,
            deductions,
        }
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns the version tag of this configuration snapshot.
    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Returns the per-benefit statutory constants.
    pub fn benefits(&self) -> &BenefitsConfig {
        &self.benefits
    }

    /// Returns the deduction rules.
    pub fn deductions(&self) -> &DeductionConfig {
        &self.deductions
    }
}
