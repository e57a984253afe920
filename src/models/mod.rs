//! Core data models for the Benefit Calculation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod deduction;
mod period;
mod record;
mod worker;

pub use deduction::{DeductionKind, DeductionLine};
pub use period::{BenefitPeriod, BenefitType, PeriodTag, ServiceMetrics};
pub use record::{
    AuditEntry, BenefitRecord, RecordState, RemunerationBreakdown, terminal_state_for,
};
pub use worker::{
    AccountType, BankingDetails, Currency, LaborRegime, PensionScheme, TaxProfile, WorkerSnapshot,
};
