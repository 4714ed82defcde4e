//! Request types for the payroll API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Employee, PayrollMonth};

/// Request body for `PUT /roster`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRequest {
    /// The complete roster; replaces the current one.
    pub employees: Vec<Employee>,
}

/// Request body for `PUT /attendance/:month/:employee_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// One mark per calendar day, day 1 first.
    pub marks: Vec<String>,
}

/// Request body for `POST /payroll/calculate`.
///
/// Calculates a line for an employee who need not be on the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee to pay.
    pub employee: Employee,
    /// The payroll month.
    pub month: PayrollMonth,
    /// One mark per calendar day.
    pub marks: Vec<String>,
}

/// Request body for `POST /payroll/:month/employees/:employee_id/recalculate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecalculateRequest {
    /// Replacement flat advance; only accepted without a loan ledger.
    #[serde(default)]
    pub advance_override: Option<Decimal>,
}

/// Request body for `POST /loans`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoanRequest {
    /// The borrowing employee; must be on the roster.
    pub employee_id: String,
    /// Amount advanced.
    pub principal: Decimal,
    /// Number of monthly installments.
    pub installment_count: u32,
    /// First month a deduction is taken.
    pub start_month: PayrollMonth,
}

/// Query string for endpoints reporting on a month.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthQuery {
    /// `YYYY-MM`.
    #[serde(default)]
    pub month: Option<String>,
}
