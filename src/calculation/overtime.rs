//! Overtime pay.
//!
//! Overtime is paid per day at a multiple of the daily rate, in addition to
//! basic pay. Every overtime day uses the normal multiplier.

use rust_decimal::Decimal;

use crate::config::OvertimePolicy;
use crate::models::AuditStep;

use super::round_rupees;

/// The result of calculating overtime pay, including the amount and audit step.
#[derive(Debug, Clone)]
pub struct OvertimePayResult {
    /// `round(overtime_days * daily_rate * multiplier)`.
    pub amount: Decimal,
    /// The multiplier that was applied.
    pub multiplier: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates overtime pay for OT-only and P+OT days.
///
/// # Examples
///
/// ```
/// use hospital_payroll::calculation::calculate_overtime_pay;
/// use hospital_payroll::config::OvertimePolicy;
/// use rust_decimal::Decimal;
///
/// let result = calculate_overtime_pay(3, Decimal::from(1000), &OvertimePolicy::default(), 5);
/// assert_eq!(result.amount, Decimal::from(4500));
/// ```
pub fn calculate_overtime_pay(
    overtime_days: u32,
    daily_rate: Decimal,
    policy: &OvertimePolicy,
    step_number: u32,
) -> OvertimePayResult {
    let multiplier = policy.normal_multiplier;
    let amount = round_rupees(Decimal::from(overtime_days) * daily_rate * multiplier);

    let audit_step = AuditStep {
        step_number,
        rule_id: "overtime_pay".to_string(),
        rule_name: "Overtime Pay".to_string(),
        input: serde_json::json!({
            "overtime_days": overtime_days,
            "daily_rate": daily_rate.round_dp(4).normalize().to_string(),
            "multiplier": multiplier.normalize().to_string(),
        }),
        output: serde_json::json!({
            "overtime_amount": amount.to_string(),
        }),
        reasoning: format!(
            "{} overtime days × ₹{} × {} = ₹{}",
            overtime_days,
            daily_rate.round_dp(2).normalize(),
            multiplier.normalize(),
            amount
        ),
    };

    OvertimePayResult {
        amount,
        multiplier,
        audit_step,
    }
}
