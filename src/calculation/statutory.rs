//! Statutory deductions: provident fund, state insurance and professional tax.
//!
//! PF and ESIC are computed on basic pay and basic salary components, which
//! exclude overtime. Professional tax is tested against gross salary, which
//! includes it.

use rust_decimal::Decimal;

use crate::config::DeductionPolicy;
use crate::models::{AuditStep, Employee};

use super::round_rupees;

/// The result of one statutory deduction, including the amount and audit step.
#[derive(Debug, Clone)]
pub struct StatutoryDeductionResult {
    /// The amount to deduct.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee's provident fund contribution.
///
/// `round(min(basic, wage_ceiling) * rate)` for participating employees.
///
/// # Examples
///
/// ```
/// use hospital_payroll::calculation::calculate_provident_fund;
/// use hospital_payroll::config::DeductionPolicy;
/// # use hospital_payroll::models::{Employee, EmployeeStatus};
/// use rust_decimal::Decimal;
/// # let employee = Employee {
/// #     id: "EMP001".to_string(),
/// #     name: "Asha Rao".to_string(),
/// #     department: "Nursing".to_string(),
/// #     basic_salary: Decimal::from(30000),
/// #     hra: Decimal::ZERO,
/// #     conveyance: Decimal::ZERO,
/// #     other_allowances: Decimal::ZERO,
/// #     has_pf: true,
/// #     has_esic: true,
/// #     has_pt: true,
/// #     advance: Decimal::ZERO,
/// #     status: EmployeeStatus::Active,
/// # };
///
/// let result = calculate_provident_fund(&employee, Decimal::from(30000), &DeductionPolicy::default(), 6);
/// assert_eq!(result.amount, Decimal::from(1800));
/// ```
pub fn calculate_provident_fund(
    employee: &Employee,
    basic: Decimal,
    policy: &DeductionPolicy,
    step_number: u32,
) -> StatutoryDeductionResult {
    let rule = &policy.provident_fund;
    let pf_base = basic.min(rule.wage_ceiling);
    let amount = if employee.has_pf {
        round_rupees(pf_base * rule.rate)
    } else {
        Decimal::ZERO
    };

    let reasoning = if employee.has_pf {
        format!(
            "min(₹{}, ₹{}) × {} = ₹{}",
            basic,
            rule.wage_ceiling.normalize(),
            rule.rate.normalize(),
            amount
        )
    } else {
        "Employee does not participate in the provident fund".to_string()
    };

    StatutoryDeductionResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "provident_fund".to_string(),
            rule_name: "Provident Fund".to_string(),
            input: serde_json::json!({
                "has_pf": employee.has_pf,
                "basic": basic.to_string(),
                "wage_ceiling": rule.wage_ceiling.normalize().to_string(),
                "rate": rule.rate.normalize().to_string(),
            }),
            output: serde_json::json!({
                "pf_base": pf_base.to_string(),
                "pf": amount.to_string(),
            }),
            reasoning,
        },
    }
}

/// Calculates the employee's state insurance contribution.
///
/// Employees are covered only while basic salary components are at or below
/// the eligibility ceiling; covered participants pay
/// `round(basic_salary_components * rate)`.
pub fn calculate_state_insurance(
    employee: &Employee,
    basic_salary_components: Decimal,
    policy: &DeductionPolicy,
    step_number: u32,
) -> StatutoryDeductionResult {
    let rule = &policy.state_insurance;
    let eligible = basic_salary_components <= rule.eligibility_ceiling;
    let amount = if employee.has_esic && eligible {
        round_rupees(basic_salary_components * rule.rate)
    } else {
        Decimal::ZERO
    };

    let reasoning = if !employee.has_esic {
        "Employee does not participate in state insurance".to_string()
    } else if !eligible {
        format!(
            "Basic salary components ₹{} exceed the ₹{} ceiling - not covered",
            basic_salary_components,
            rule.eligibility_ceiling.normalize()
        )
    } else {
        format!(
            "₹{} × {} = ₹{}",
            basic_salary_components,
            rule.rate.normalize(),
            amount
        )
    };

    StatutoryDeductionResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "state_insurance".to_string(),
            rule_name: "State Insurance".to_string(),
            input: serde_json::json!({
                "has_esic": employee.has_esic,
                "basic_salary_components": basic_salary_components.to_string(),
                "eligibility_ceiling": rule.eligibility_ceiling.normalize().to_string(),
                "rate": rule.rate.normalize().to_string(),
            }),
            output: serde_json::json!({
                "eligible": eligible,
                "esic": amount.to_string(),
            }),
            reasoning,
        },
    }
}

/// Calculates professional tax: a flat amount when gross salary is strictly
/// above the threshold.
pub fn calculate_professional_tax(
    employee: &Employee,
    gross_salary: Decimal,
    policy: &DeductionPolicy,
    step_number: u32,
) -> StatutoryDeductionResult {
    let rule = &policy.professional_tax;
    let liable = employee.has_pt && gross_salary > rule.gross_threshold;
    let amount = if liable { rule.amount } else { Decimal::ZERO };

    let reasoning = if !employee.has_pt {
        "Employee is exempt from professional tax".to_string()
    } else if liable {
        format!(
            "Gross ₹{} above ₹{} - flat ₹{}",
            gross_salary,
            rule.gross_threshold.normalize(),
            rule.amount.normalize()
        )
    } else {
        format!(
            "Gross ₹{} not above ₹{} - no tax",
            gross_salary,
            rule.gross_threshold.normalize()
        )
    };

    StatutoryDeductionResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "professional_tax".to_string(),
            rule_name: "Professional Tax".to_string(),
            input: serde_json::json!({
                "has_pt": employee.has_pt,
                "gross_salary": gross_salary.to_string(),
                "gross_threshold": rule.gross_threshold.normalize().to_string(),
            }),
            output: serde_json::json!({
                "liable": liable,
                "pt": amount.normalize().to_string(),
            }),
            reasoning,
        },
    }
}
