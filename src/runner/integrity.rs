//! Roster and attendance consistency checks.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Employee, PayrollMonth};

/// The kind of problem found by [`check_roster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityIssueKind {
    /// Two roster entries share an id.
    DuplicateEmployeeId,
    /// An active employee has no attendance for the month.
    MissingAttendance,
    /// Basic salary is zero or negative.
    NonPositiveSalary,
    /// Id, name or department is empty.
    MissingRequiredField,
}

/// A data problem that does not block a payroll run but needs attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    /// What kind of problem this is.
    pub kind: IntegrityIssueKind,
    /// The employee concerned.
    pub employee_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Checks the roster against the attendance recorded for `month`.
///
/// `has_attendance` reports whether a record exists for an employee id.
pub(crate) fn check_roster(
    roster: &[Employee],
    month: PayrollMonth,
    has_attendance: impl Fn(&str) -> bool,
) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for employee in roster {
        if !seen.insert(employee.id.as_str()) && reported.insert(employee.id.as_str()) {
            issues.push(IntegrityIssue {
                kind: IntegrityIssueKind::DuplicateEmployeeId,
                employee_id: employee.id.clone(),
                message: format!("Duplicate employee id '{}'", employee.id),
            });
        }
    }

    for employee in roster.iter().filter(|e| e.is_active()) {
        if !has_attendance(&employee.id) {
            issues.push(IntegrityIssue {
                kind: IntegrityIssueKind::MissingAttendance,
                employee_id: employee.id.clone(),
                message: format!("Missing attendance for {} in {}", employee.name, month),
            });
        }
    }

    for employee in roster {
        if employee.basic_salary <= Decimal::ZERO {
            issues.push(IntegrityIssue {
                kind: IntegrityIssueKind::NonPositiveSalary,
                employee_id: employee.id.clone(),
                message: format!(
                    "Invalid basic salary {} for {}",
                    employee.basic_salary, employee.name
                ),
            });
        }
    }

    for employee in roster {
        let missing: Vec<&str> = [
            ("id", employee.id.trim().is_empty()),
            ("name", employee.name.trim().is_empty()),
            ("department", employee.department.trim().is_empty()),
        ]
        .into_iter()
        .filter_map(|(field, empty)| empty.then_some(field))
        .collect();

        if !missing.is_empty() {
            issues.push(IntegrityIssue {
                kind: IntegrityIssueKind::MissingRequiredField,
                employee_id: employee.id.clone(),
                message: format!("Missing required fields: {}", missing.join(", ")),
            });
        }
    }

    issues
}
