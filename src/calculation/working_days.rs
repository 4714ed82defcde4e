//! Paid-day calculation.
//!
//! Hospital staff work a 24-hour roster with a monthly allowance of paid off
//! days. Offs within the allowance are paid, offs beyond it are not, and any
//! unused allowance is paid as extra days. Overtime days are counted
//! separately because they are paid at the overtime rate.

use crate::config::AttendancePolicy;
use crate::models::{AttendanceBreakdown, AuditStep, WorkingDays};

/// The result of calculating paid days, including the totals and audit step.
#[derive(Debug, Clone)]
pub struct WorkingDaysResult {
    /// Paid-day totals.
    pub working_days: WorkingDays,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates base and overtime paid days from classified attendance.
///
/// - `paid_off = min(off, allowance)`
/// - `unused_paid_off = max(0, allowance - off)`
/// - `base_working_days = present + present_with_overtime + paid_off + unused_paid_off`
/// - `overtime_days = overtime_only + present_with_overtime`
///
/// # Examples
///
/// ```
/// use hospital_payroll::calculation::calculate_working_days;
/// use hospital_payroll::config::AttendancePolicy;
/// use hospital_payroll::models::AttendanceBreakdown;
///
/// let breakdown = AttendanceBreakdown {
///     present: 23,
///     present_with_overtime: 3,
///     overtime_only: 0,
///     off: 4,
///     absent: 1,
///     unclassified: 0,
/// };
/// let result = calculate_working_days(&breakdown, 31, &AttendancePolicy::default(), 2);
///
/// assert_eq!(result.working_days.base_working_days, 30);
/// assert_eq!(result.working_days.overtime_days, 3);
/// assert_eq!(result.working_days.working_days, 33);
/// ```
pub fn calculate_working_days(
    breakdown: &AttendanceBreakdown,
    days_in_month: u32,
    policy: &AttendancePolicy,
    step_number: u32,
) -> WorkingDaysResult {
    let allowance = policy.paid_offs_per_month;

    let paid_off = breakdown.off.min(allowance);
    let unused_paid_off = allowance.saturating_sub(breakdown.off);
    let excess_off = breakdown.off.saturating_sub(allowance);

    let base_working_days =
        breakdown.present + breakdown.present_with_overtime + paid_off + unused_paid_off;
    let overtime_days = breakdown.overtime_only + breakdown.present_with_overtime;
    let working_days = base_working_days + overtime_days;

    let reasoning = if excess_off > 0 {
        format!(
            "{} P + {} P+OT + {} paid offs = {} base days ({} offs beyond the {}-day allowance unpaid); {} overtime days",
            breakdown.present,
            breakdown.present_with_overtime,
            paid_off,
            base_working_days,
            excess_off,
            allowance,
            overtime_days
        )
    } else {
        format!(
            "{} P + {} P+OT + {} paid offs + {} unused offs = {} base days; {} overtime days",
            breakdown.present,
            breakdown.present_with_overtime,
            paid_off,
            unused_paid_off,
            base_working_days,
            overtime_days
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "working_days".to_string(),
        rule_name: "Paid Working Days".to_string(),
        input: serde_json::json!({
            "present": breakdown.present,
            "present_with_overtime": breakdown.present_with_overtime,
            "overtime_only": breakdown.overtime_only,
            "off": breakdown.off,
            "paid_offs_per_month": allowance,
            "days_in_month": days_in_month,
        }),
        output: serde_json::json!({
            "paid_off": paid_off,
            "unused_paid_off": unused_paid_off,
            "excess_off": excess_off,
            "base_working_days": base_working_days,
            "overtime_days": overtime_days,
            "working_days": working_days,
        }),
        reasoning,
    };

    WorkingDaysResult {
        working_days: WorkingDays {
            paid_off,
            unused_paid_off,
            excess_off,
            base_working_days,
            overtime_days,
            working_days,
            days_in_month,
        },
        audit_step,
    }
}
