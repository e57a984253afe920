//! Error types for the Benefit Calculation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during benefit calculation and
//! record lifecycle management.

use thiserror::Error;

use crate::models::{BenefitType, PeriodTag, RecordState};

/// The main error type for the Benefit Calculation Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use benefit_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A period tag is not valid for the requested benefit type.
    ///
    /// Fixed-campaign benefits (CTS, gratificaciones) can only be calculated
    /// for their two legally defined campaigns per year.
    #[error("Invalid period '{tag}' for benefit {benefit_type}: {message}")]
    InvalidPeriod {
        /// The benefit type the period was requested for.
        benefit_type: BenefitType,
        /// The rejected period tag.
        tag: PeriodTag,
        /// A description of why the period is invalid.
        message: String,
    },

    /// A required fixed remuneration component is absent for a worker.
    #[error("Incomplete remuneration data for worker '{worker_id}': {message}")]
    IncompleteRemunerationData {
        /// The worker whose remuneration data is incomplete.
        worker_id: String,
        /// A description of the missing component.
        message: String,
    },

    /// Configured deductions would exceed the gross benefit amount.
    ///
    /// This is surfaced rather than clamped to zero so the caller can see
    /// the misconfiguration.
    #[error("Deductions {deductions} exceed gross amount {gross} for worker '{worker_id}'")]
    NegativeNetResult {
        /// The worker whose net would be negative.
        worker_id: String,
        /// The gross benefit amount.
        gross: String,
        /// The total deductions computed.
        deductions: String,
    },

    /// A worker requested in a batch is not in the eligible worker set for
    /// the benefit being calculated.
    #[error("Worker '{worker_id}' is not eligible for benefit {benefit_type}")]
    WorkerNotEligible {
        /// The worker that was requested.
        worker_id: String,
        /// The benefit the worker is not eligible for.
        benefit_type: BenefitType,
    },

    /// A non-observed record already exists for the same worker, period and
    /// benefit type.
    #[error("Duplicate calculation for worker '{worker_id}': record '{record_code}' is {state}")]
    DuplicateCalculation {
        /// The worker with an existing record.
        worker_id: String,
        /// The code of the existing record.
        record_code: String,
        /// The state of the existing record.
        state: RecordState,
    },

    /// A lifecycle transition is not legal from the record's current state.
    #[error("Invalid transition for record '{record_code}': {from} -> {to}: {message}")]
    InvalidTransition {
        /// The record whose transition was rejected.
        record_code: String,
        /// The current state of the record.
        from: RecordState,
        /// The requested target state.
        to: RecordState,
        /// A description of the rejected transition.
        message: String,
    },

    /// A record past approval cannot be deleted.
    #[error("Record '{record_code}' is locked in state {state} and cannot be deleted")]
    RecordLocked {
        /// The record that is locked.
        record_code: String,
        /// The state that locks the record.
        state: RecordState,
    },

    /// The caller's view of a record is older than the stored version.
    #[error("Stale state for record '{record_code}': caller has version {caller_version}, store has {stored_version}")]
    StaleState {
        /// The record with a version conflict.
        record_code: String,
        /// The version the caller presented.
        caller_version: u64,
        /// The version currently stored.
        stored_version: u64,
    },

    /// A batch was cancelled before this worker's pipeline started.
    #[error("Calculation cancelled for worker '{worker_id}'")]
    Cancelled {
        /// The worker whose calculation did not run.
        worker_id: String,
    },

    /// The persistence gateway failed irrecoverably.
    ///
    /// The in-memory record state is left unchanged when this is returned.
    #[error("Persistence failure: {message}")]
    PersistenceFailure {
        /// A description of the persistence failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
