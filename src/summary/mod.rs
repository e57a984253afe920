//! Campaign summary aggregation.
//!
//! Aggregates a set of benefit records into the totals a treasury office
//! reviews before approving a campaign: gross, deductions and net totals,
//! the average net, and counts broken down by workflow state and by
//! municipal area.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::calculation::round_money;
use crate::models::{BenefitRecord, RecordState};

/// Per-area slice of a campaign summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaBreakdown {
    /// Records belonging to the area.
    pub record_count: usize,
    /// Sum of the area's net amounts.
    pub net_total: Decimal,
}

/// The aggregate view of a set of benefit records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenefitSummary {
    /// Number of records aggregated.
    pub record_count: usize,
    /// Sum of gross amounts.
    pub total_gross: Decimal,
    /// Sum of deduction totals.
    pub total_deductions: Decimal,
    /// Sum of net amounts.
    pub total_net: Decimal,
    /// `total_net / record_count`, rounded to 2 decimals; zero when empty.
    pub average_net: Decimal,
    /// Record counts per workflow state.
    pub by_state: HashMap<RecordState, usize>,
    /// Net totals per municipal area.
    pub by_area: HashMap<String, AreaBreakdown>,
}

/// Aggregates records into a campaign summary.
///
/// Works over whatever slice the caller selected; deleted records are simply
/// absent and never contribute.
pub fn summarize(records: &[BenefitRecord]) -> BenefitSummary {
    let mut summary = BenefitSummary {
        record_count: records.len(),
        ..BenefitSummary::default()
    };

    for record in records {
        summary.total_gross += record.gross_amount;
        summary.total_deductions += record.total_deductions;
        summary.total_net += record.net_amount;
        *summary.by_state.entry(record.state).or_default() += 1;
        let area = summary.by_area.entry(record.area.clone()).or_default();
        area.record_count += 1;
        area.net_total += record.net_amount;
    }

    if summary.record_count > 0 {
        summary.average_net =
            round_money(summary.total_net / Decimal::from(summary.record_count as u64));
    }
    summary
}
