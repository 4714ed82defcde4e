//! Basic pay proration.
//!
//! Basic salary is a monthly figure. It is converted to a daily rate using the
//! actual number of days in the month and paid for base working days only.

use rust_decimal::Decimal;

use crate::models::{AuditStep, WorkingDays};

use super::round_rupees;

/// The result of prorating basic pay, including the daily rate and audit step.
#[derive(Debug, Clone)]
pub struct BasicPayResult {
    /// `basic_salary / days_in_month`, unrounded.
    pub daily_rate: Decimal,
    /// `round(daily_rate * base_working_days)`.
    pub basic: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prorates a monthly basic salary over the base working days.
///
/// Zero or negative salaries are not rejected; they simply produce zero or
/// negative figures.
///
/// # Examples
///
/// ```
/// use hospital_payroll::calculation::calculate_basic_pay;
/// use hospital_payroll::models::WorkingDays;
/// use rust_decimal::Decimal;
///
/// let days = WorkingDays {
///     base_working_days: 30,
///     days_in_month: 31,
///     ..Default::default()
/// };
/// let result = calculate_basic_pay(Decimal::from(31000), &days, 3);
///
/// assert_eq!(result.daily_rate, Decimal::from(1000));
/// assert_eq!(result.basic, Decimal::from(30000));
/// ```
pub fn calculate_basic_pay(
    basic_salary: Decimal,
    working_days: &WorkingDays,
    step_number: u32,
) -> BasicPayResult {
    let daily_rate = if working_days.days_in_month == 0 {
        Decimal::ZERO
    } else {
        basic_salary / Decimal::from(working_days.days_in_month)
    };
    let basic = round_rupees(daily_rate * Decimal::from(working_days.base_working_days));

    let audit_step = AuditStep {
        step_number,
        rule_id: "basic_pay".to_string(),
        rule_name: "Basic Pay Proration".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "days_in_month": working_days.days_in_month,
            "base_working_days": working_days.base_working_days,
        }),
        output: serde_json::json!({
            "daily_rate": daily_rate.round_dp(4).normalize().to_string(),
            "basic": basic.to_string(),
        }),
        reasoning: format!(
            "₹{} / {} days = ₹{} per day × {} base days = ₹{}",
            basic_salary.normalize(),
            working_days.days_in_month,
            daily_rate.round_dp(2).normalize(),
            working_days.base_working_days,
            basic
        ),
    };

    BasicPayResult {
        daily_rate,
        basic,
        audit_step,
    }
}
