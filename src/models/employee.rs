//! Employee model and related types.
//!
//! This module defines the Employee struct and its salary structure as
//! consumed by the payroll calculator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether an employee is included in payroll runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// On payroll.
    #[default]
    Active,
    /// Kept on the roster but skipped by payroll runs.
    Inactive,
}

fn default_true() -> bool {
    true
}

/// Represents a staff member on the hospital roster.
///
/// Allowance fields hold a fixed monthly amount; zero means the amount is
/// derived from basic pay by the payroll policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee (e.g. "EMP001").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Department the employee belongs to.
    pub department: String,
    /// Base monthly salary before proration.
    pub basic_salary: Decimal,
    /// Fixed monthly house rent allowance, or zero to derive it.
    #[serde(default)]
    pub hra: Decimal,
    /// Fixed monthly conveyance allowance, or zero for the flat default.
    #[serde(default)]
    pub conveyance: Decimal,
    /// Fixed monthly other allowance, or zero for the flat default.
    #[serde(default)]
    pub other_allowances: Decimal,
    /// Participates in the provident fund.
    #[serde(default = "default_true")]
    pub has_pf: bool,
    /// Participates in state insurance.
    #[serde(default = "default_true")]
    pub has_esic: bool,
    /// Liable for professional tax.
    #[serde(default = "default_true")]
    pub has_pt: bool,
    /// Flat advance to deduct when no loan ledger is configured.
    #[serde(default)]
    pub advance: Decimal,
    /// Whether the employee is on payroll.
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns true if the employee is included in payroll runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use hospital_payroll::models::{Employee, EmployeeStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let nurse = Employee {
    ///     id: "EMP001".to_string(),
    ///     name: "Asha Rao".to_string(),
    ///     department: "Nursing".to_string(),
    ///     basic_salary: Decimal::new(30000, 0),
    ///     hra: Decimal::ZERO,
    ///     conveyance: Decimal::ZERO,
    ///     other_allowances: Decimal::ZERO,
    ///     has_pf: true,
    ///     has_esic: true,
    ///     has_pt: true,
    ///     advance: Decimal::ZERO,
    ///     status: EmployeeStatus::Active,
    /// };
    /// assert!(nurse.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}
