//! Allowance calculation.
//!
//! HRA, conveyance and other allowances are either a fixed monthly amount on
//! the employee record, prorated like basic pay, or a policy default.

use rust_decimal::Decimal;

use crate::config::AllowancePolicy;
use crate::models::{AuditStep, Employee, WorkingDays};

use super::round_rupees;

/// The result of calculating allowances, including the amounts and audit step.
#[derive(Debug, Clone)]
pub struct AllowancesResult {
    /// House rent allowance.
    pub hra: Decimal,
    /// Conveyance allowance.
    pub conveyance: Decimal,
    /// Other allowances.
    pub other_allowances: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn prorate(fixed: Decimal, working_days: &WorkingDays) -> Decimal {
    if working_days.days_in_month == 0 {
        return Decimal::ZERO;
    }
    round_rupees(
        fixed / Decimal::from(working_days.days_in_month)
            * Decimal::from(working_days.base_working_days),
    )
}

fn flat_if_worked(flat: Decimal, working_days: &WorkingDays) -> Decimal {
    if working_days.base_working_days > 0 {
        flat
    } else {
        Decimal::ZERO
    }
}

/// Calculates HRA, conveyance and other allowances for the month.
///
/// For each allowance, a positive fixed amount on the employee is prorated
/// over base working days. Otherwise:
/// - HRA is `hra_rate` of the prorated `basic`
/// - conveyance and other allowances are flat amounts, paid only if at least
///   one base day was worked
///
/// # Examples
///
/// ```
/// use hospital_payroll::calculation::calculate_allowances;
/// use hospital_payroll::config::AllowancePolicy;
/// use hospital_payroll::models::{Employee, EmployeeStatus, WorkingDays};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "EMP001".to_string(),
///     name: "Asha Rao".to_string(),
///     department: "Nursing".to_string(),
///     basic_salary: Decimal::from(30000),
///     hra: Decimal::ZERO,
///     conveyance: Decimal::ZERO,
///     other_allowances: Decimal::ZERO,
///     has_pf: true,
///     has_esic: true,
///     has_pt: true,
///     advance: Decimal::ZERO,
///     status: EmployeeStatus::Active,
/// };
/// let days = WorkingDays {
///     base_working_days: 30,
///     days_in_month: 30,
///     ..Default::default()
/// };
///
/// let result = calculate_allowances(&employee, Decimal::from(30000), &days, &AllowancePolicy::default(), 4);
/// assert_eq!(result.hra, Decimal::from(12000));
/// assert_eq!(result.conveyance, Decimal::from(1600));
/// assert_eq!(result.other_allowances, Decimal::from(2000));
/// ```
pub fn calculate_allowances(
    employee: &Employee,
    basic: Decimal,
    working_days: &WorkingDays,
    policy: &AllowancePolicy,
    step_number: u32,
) -> AllowancesResult {
    let (hra, hra_source) = if employee.hra > Decimal::ZERO {
        (prorate(employee.hra, working_days), "fixed")
    } else {
        (round_rupees(basic * policy.hra_rate), "percent_of_basic")
    };

    let (conveyance, conveyance_source) = if employee.conveyance > Decimal::ZERO {
        (prorate(employee.conveyance, working_days), "fixed")
    } else {
        (flat_if_worked(policy.conveyance_flat, working_days), "flat_default")
    };

    let (other_allowances, other_source) = if employee.other_allowances > Decimal::ZERO {
        (prorate(employee.other_allowances, working_days), "fixed")
    } else {
        (flat_if_worked(policy.other_flat, working_days), "flat_default")
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "allowances".to_string(),
        rule_name: "Allowances".to_string(),
        input: serde_json::json!({
            "basic": basic.to_string(),
            "fixed_hra": employee.hra.normalize().to_string(),
            "fixed_conveyance": employee.conveyance.normalize().to_string(),
            "fixed_other_allowances": employee.other_allowances.normalize().to_string(),
            "base_working_days": working_days.base_working_days,
            "days_in_month": working_days.days_in_month,
        }),
        output: serde_json::json!({
            "hra": hra.to_string(),
            "hra_source": hra_source,
            "conveyance": conveyance.to_string(),
            "conveyance_source": conveyance_source,
            "other_allowances": other_allowances.to_string(),
            "other_allowances_source": other_source,
        }),
        reasoning: format!(
            "HRA ₹{} ({}), conveyance ₹{} ({}), other ₹{} ({})",
            hra, hra_source, conveyance, conveyance_source, other_allowances, other_source
        ),
    };

    AllowancesResult {
        hra,
        conveyance,
        other_allowances,
        audit_step,
    }
}
