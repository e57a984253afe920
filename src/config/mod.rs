//! Configuration loading and management for the Benefit Calculation Engine.
//!
//! This module provides functionality to load the versioned engine
//! configuration from YAML files: entity metadata, per-benefit statutory
//! constants, and withholding rules.
//!
//! # Example
//!
//! ```no_run
//! use benefit_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/municipal").unwrap();
//! println!("Loaded config version: {}", loader.config().version());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BenefitsConfig, CtsConfig, DeductionConfig, EngineConfig, EngineMetadata, GratificacionConfig,
    IncomeTaxConfig, PensionDeductionConfig, UtilidadesConfig, VacacionesConfig, WithholdingRule,
};
