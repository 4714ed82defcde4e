//! Payroll line models.
//!
//! This module contains the [`PayrollLine`] type and its associated structures
//! that capture every output of a monthly pay calculation: the attendance
//! breakdown, working-day totals, earnings, deductions and an audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollMonth;

/// Day counts produced by classifying a month of attendance marks.
///
/// # Example
///
/// ```
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
/// assert_eq!(breakdown.total_days(), 31);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceBreakdown {
    /// `P` days, including blank days.
    pub present: u32,
    /// `P+OT` days.
    pub present_with_overtime: u32,
    /// `OT` days.
    pub overtime_only: u32,
    /// `OFF` days.
    pub off: u32,
    /// `A` days.
    pub absent: u32,
    /// Days whose mark was not recognized.
    pub unclassified: u32,
}

impl AttendanceBreakdown {
    /// Sum of every category, including unclassified days.
    pub fn total_days(&self) -> u32 {
        self.present
            + self.present_with_overtime
            + self.overtime_only
            + self.off
            + self.absent
            + self.unclassified
    }
}

/// Paid-day totals derived from the attendance breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDays {
    /// Off days that are paid (capped by the monthly allowance).
    pub paid_off: u32,
    /// Unused off allowance converted into extra paid days.
    pub unused_paid_off: u32,
    /// Off days beyond the allowance, unpaid.
    pub excess_off: u32,
    /// Days paid at the daily rate.
    pub base_working_days: u32,
    /// Days paid at the overtime rate.
    pub overtime_days: u32,
    /// `base_working_days + overtime_days`, for display.
    pub working_days: u32,
    /// Calendar days in the month.
    pub days_in_month: u32,
}

/// Pay components for the month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// Prorated basic pay.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Conveyance allowance.
    pub conveyance: Decimal,
    /// Other allowances.
    pub other_allowances: Decimal,
    /// Overtime pay.
    pub overtime_amount: Decimal,
    /// `basic + hra + conveyance + other_allowances`; excludes overtime.
    pub basic_salary_components: Decimal,
    /// `basic_salary_components + overtime_amount`.
    pub gross_salary: Decimal,
}

/// Deductions taken from gross pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Provident fund.
    pub pf: Decimal,
    /// State insurance.
    pub esic: Decimal,
    /// Professional tax.
    pub pt: Decimal,
    /// Salary-advance recovery.
    pub advance: Decimal,
    /// Sum of the four deductions.
    pub total: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// One employee's payroll for one month.
///
/// Produced fresh by every calculation; a changed input means a new line,
/// never an edit to an old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// The employee paid.
    pub employee_id: String,
    /// Employee name at calculation time.
    pub employee_name: String,
    /// Employee department at calculation time.
    pub department: String,
    /// The payroll month.
    pub month: PayrollMonth,
    /// Classified attendance.
    pub attendance: AttendanceBreakdown,
    /// Paid-day totals.
    pub working_days: WorkingDays,
    /// `basic_salary / days_in_month`, unrounded.
    pub daily_rate: Decimal,
    /// Pay components.
    pub earnings: Earnings,
    /// Deductions.
    pub deductions: Deductions,
    /// `gross_salary - deductions.total`.
    pub net_pay: Decimal,
    /// Record of every rule applied.
    pub audit_trace: AuditTrace,
}
