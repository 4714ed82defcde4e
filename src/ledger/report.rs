//! Loan summaries and the ledger-wide advance report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Loan, LoanStatus, PayrollMonth};

/// One employee's loans at a glance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    /// Number of active loans.
    pub active_loans: usize,
    /// Number of completed loans.
    pub completed_loans: usize,
    /// Remaining principal across active loans.
    pub total_active_amount: Decimal,
    /// Original principal across completed loans.
    pub total_completed_amount: Decimal,
    /// Deduction the ledger would take in the summarized month.
    pub current_month_deduction: Decimal,
    /// Every loan of the employee, in creation order.
    pub loans: Vec<Loan>,
}

impl LoanSummary {
    pub(crate) fn from_loans(loans: &[Loan], current_month_deduction: Decimal) -> Self {
        let active: Vec<&Loan> = loans
            .iter()
            .filter(|l| l.status == LoanStatus::Active)
            .collect();
        let completed: Vec<&Loan> = loans
            .iter()
            .filter(|l| l.status == LoanStatus::Completed)
            .collect();

        Self {
            active_loans: active.len(),
            completed_loans: completed.len(),
            total_active_amount: active.iter().map(|l| l.remaining_principal).sum(),
            total_completed_amount: completed.iter().map(|l| l.principal).sum(),
            current_month_deduction,
            loans: loans.to_vec(),
        }
    }

    /// True if the employee has an active or completed loan.
    pub fn has_reportable_loans(&self) -> bool {
        self.active_loans > 0 || self.completed_loans > 0
    }
}

/// An employee's line in the advance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAdvanceSummary {
    /// The employee.
    pub employee_id: String,
    /// Employee name from the roster.
    pub employee_name: String,
    /// Employee department from the roster.
    pub department: String,
    /// The employee's loans.
    #[serde(flatten)]
    pub summary: LoanSummary,
}

/// Totals across the advance report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceReportSummary {
    /// Employees with an active or completed loan.
    pub employees_with_loans: usize,
    /// Active loans across all employees.
    pub active_loans: usize,
    /// Remaining principal across all active loans.
    pub total_active_amount: Decimal,
    /// Completed loans across all employees.
    pub completed_loans: usize,
    /// Original principal across all completed loans.
    pub total_completed_amount: Decimal,
}

/// Ledger-wide view of salary advances for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceReport {
    /// The month whose deductions are shown.
    pub month: PayrollMonth,
    /// Report-wide totals.
    pub summary: AdvanceReportSummary,
    /// Per-employee detail, in roster order.
    pub employees: Vec<EmployeeAdvanceSummary>,
}

impl AdvanceReport {
    pub(crate) fn new(month: PayrollMonth) -> Self {
        Self {
            month,
            summary: AdvanceReportSummary::default(),
            employees: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: EmployeeAdvanceSummary) {
        self.summary.employees_with_loans += 1;
        self.summary.active_loans += entry.summary.active_loans;
        self.summary.total_active_amount += entry.summary.total_active_amount;
        self.summary.completed_loans += entry.summary.completed_loans;
        self.summary.total_completed_amount += entry.summary.total_completed_amount;
        self.employees.push(entry);
    }
}
