//! Deduction engine: pension and income-tax withholding.
//!
//! Applies the configured withholding rules to a gross benefit amount.
//! Each deduction kind is independently toggleable; a disabled kind
//! contributes no line at all, not a zero-amount line.

use rust_decimal::Decimal;

use crate::config::DeductionConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{DeductionKind, DeductionLine, PensionScheme, TaxProfile};

use super::round_money;

/// The outcome of applying deductions to a gross amount.
#[derive(Debug, Clone, PartialEq)]
pub struct DeductionOutcome {
    /// The itemized deduction lines.
    pub lines: Vec<DeductionLine>,
    /// Sum of the line amounts.
    pub total: Decimal,
    /// `gross - total`.
    pub net: Decimal,
}

/// Applies the configured withholdings to a gross benefit amount.
///
/// Pension lines use the worker's scheme: the ONP rate comes from
/// configuration, the AFP rate from the worker's fund affiliation. The
/// income-tax line is skipped for exempt workers. Every line amount is
/// rounded half-up to 2 decimals.
///
/// # Errors
///
/// Returns `NegativeNetResult` when the deductions would exceed the gross
/// amount; the engine surfaces this instead of clamping the net to zero.
pub fn apply_deductions(
    worker_id: &str,
    gross: Decimal,
    profile: &TaxProfile,
    config: &DeductionConfig,
) -> EngineResult<DeductionOutcome> {
    let mut lines = Vec::new();

    if config.pension.enabled {
        match profile.pension {
            PensionScheme::Onp => {
                let rule = &config.pension.onp;
                lines.push(DeductionLine {
                    code: rule.code.clone(),
                    name: rule.name.clone(),
                    kind: DeductionKind::PensionSystem,
                    amount: round_money(gross * rule.rate),
                    rate: Some(rule.rate),
                });
            }
            PensionScheme::Afp { rate } => {
                lines.push(DeductionLine {
                    code: config.pension.afp_code.clone(),
                    name: config.pension.afp_name.clone(),
                    kind: DeductionKind::PensionSystem,
                    amount: round_money(gross * rate),
                    rate: Some(rate),
                });
            }
            PensionScheme::None => {}
        }
    }

    if config.income_tax.enabled && !profile.income_tax_exempt {
        let rule = &config.income_tax.rule;
        lines.push(DeductionLine {
            code: rule.code.clone(),
            name: rule.name.clone(),
            kind: DeductionKind::IncomeTax,
            amount: round_money(gross * rule.rate),
            rate: Some(rule.rate),
        });
    }

    let total: Decimal = lines.iter().map(|l| l.amount).sum();
    if total > gross {
        return Err(EngineError::NegativeNetResult {
            worker_id: worker_id.to_string(),
            gross: gross.to_string(),
            deductions: total.to_string(),
        });
    }

    Ok(DeductionOutcome {
        lines,
        total,
        net: gross - total,
    })
}
