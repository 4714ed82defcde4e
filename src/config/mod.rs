//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load payroll configuration from YAML
//! files: company metadata and the attendance, allowance, overtime and
//! statutory deduction policy.
//!
//! # Example
//!
//! ```no_run
//! use hospital_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/hospital").unwrap();
//! println!("Loaded payroll policy for: {}", config.company().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllowancePolicy, AttendancePolicy, CompanyMetadata, DeductionPolicy, OvertimePolicy,
    PayrollConfig, PayrollPolicy, ProfessionalTaxPolicy, ProvidentFundPolicy,
    StateInsurancePolicy,
};
