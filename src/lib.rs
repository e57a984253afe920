//! Benefit Calculation and Lifecycle Engine for municipal payroll.
//!
//! This crate implements the statutory labor-benefit engine behind a municipal
//! payroll system: severance reserve (CTS), statutory bonuses
//! (gratificaciones), profit sharing (utilidades) and paid-leave accrual
//! (vacaciones). It covers proportional accrual over service periods,
//! multi-component remuneration bases, statutory percentage bonuses,
//! deduction computation, and the approval/payment workflow each computed
//! record follows from calculation to disbursement.

#![warn(missing_docs)]

pub mod batch;
pub mod calculation;
pub mod config;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod models;
pub mod summary;
