//! Configuration types for payroll policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every policy struct
//! implements `Default` with the hospital's standing constants, so a partial
//! `payroll.yaml` only needs to name what it changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metadata about the organization running payroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyMetadata {
    /// Legal name printed on payslips.
    pub name: String,
    /// ISO currency code (e.g., "INR").
    pub currency_code: String,
    /// Currency symbol for display.
    pub currency_symbol: String,
    /// Configuration version or effective date.
    pub version: String,
}

/// Off-day rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendancePolicy {
    /// Off days paid per month; unused ones become extra paid days.
    pub paid_offs_per_month: u32,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            paid_offs_per_month: 4,
        }
    }
}

/// Allowance defaults for employees without fixed allowance amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowancePolicy {
    /// HRA as a fraction of prorated basic.
    pub hra_rate: Decimal,
    /// Flat conveyance paid when any base day is worked.
    pub conveyance_flat: Decimal,
    /// Flat other allowance paid when any base day is worked.
    pub other_flat: Decimal,
}

impl Default for AllowancePolicy {
    fn default() -> Self {
        Self {
            hra_rate: Decimal::new(40, 2),
            conveyance_flat: Decimal::new(1600, 0),
            other_flat: Decimal::new(2000, 0),
        }
    }
}

/// Overtime multipliers applied to the daily rate.
///
/// Only `normal_multiplier` is used by the calculation; night and holiday
/// multipliers are carried for reporting collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OvertimePolicy {
    /// Multiplier for every overtime day.
    pub normal_multiplier: Decimal,
    /// Night-shift multiplier.
    pub night_multiplier: Decimal,
    /// Holiday multiplier.
    pub holiday_multiplier: Decimal,
}

impl Default for OvertimePolicy {
    fn default() -> Self {
        Self {
            normal_multiplier: Decimal::new(15, 1),
            night_multiplier: Decimal::new(20, 1),
            holiday_multiplier: Decimal::new(25, 1),
        }
    }
}

/// Provident fund rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidentFundPolicy {
    /// Employee contribution rate.
    pub rate: Decimal,
    /// Basic pay above this amount is not contributory.
    pub wage_ceiling: Decimal,
}

impl Default for ProvidentFundPolicy {
    fn default() -> Self {
        Self {
            rate: Decimal::new(12, 2),
            wage_ceiling: Decimal::new(15000, 0),
        }
    }
}

/// State insurance rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateInsurancePolicy {
    /// Employee contribution rate.
    pub rate: Decimal,
    /// Employees whose basic salary components exceed this are not covered.
    pub eligibility_ceiling: Decimal,
}

impl Default for StateInsurancePolicy {
    fn default() -> Self {
        Self {
            rate: Decimal::new(75, 4),
            eligibility_ceiling: Decimal::new(21000, 0),
        }
    }
}

/// Professional tax rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessionalTaxPolicy {
    /// Flat monthly tax.
    pub amount: Decimal,
    /// Tax applies when gross salary is strictly above this.
    pub gross_threshold: Decimal,
}

impl Default for ProfessionalTaxPolicy {
    fn default() -> Self {
        Self {
            amount: Decimal::new(200, 0),
            gross_threshold: Decimal::new(10000, 0),
        }
    }
}

/// Statutory deduction rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionPolicy {
    /// Provident fund.
    pub provident_fund: ProvidentFundPolicy,
    /// State insurance.
    pub state_insurance: StateInsurancePolicy,
    /// Professional tax.
    pub professional_tax: ProfessionalTaxPolicy,
}

/// The complete payroll policy from payroll.yaml.
///
/// # Example
///
/// ```
/// use hospital_payroll::config::PayrollPolicy;
/// use rust_decimal::Decimal;
///
/// let policy = PayrollPolicy::default();
/// assert_eq!(policy.attendance.paid_offs_per_month, 4);
/// assert_eq!(policy.overtime.normal_multiplier, Decimal::new(15, 1));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollPolicy {
    /// Off-day rules.
    pub attendance: AttendancePolicy,
    /// Allowance defaults.
    pub allowances: AllowancePolicy,
    /// Overtime multipliers.
    pub overtime: OvertimePolicy,
    /// Statutory deductions.
    pub deductions: DeductionPolicy,
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    /// Company metadata.
    metadata: CompanyMetadata,
    /// Payroll policy.
    policy: PayrollPolicy,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(metadata: CompanyMetadata, policy: PayrollPolicy) -> Self {
        Self { metadata, policy }
    }

    /// Returns the company metadata.
    pub fn company(&self) -> &CompanyMetadata {
        &self.metadata
    }

    /// Returns the payroll policy.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }
}
