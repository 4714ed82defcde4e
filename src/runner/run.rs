//! Payroll run records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PayrollLine, PayrollMonth};

/// Whether a run's loan deductions have been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Calculated for review; the ledger is untouched.
    Draft,
    /// Loan deductions applied.
    Finalized,
}

/// Totals across every line of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Number of lines.
    pub employee_count: usize,
    /// Sum of gross salary.
    pub total_gross: Decimal,
    /// Sum of total deductions.
    pub total_deductions: Decimal,
    /// Sum of advance recoveries.
    pub total_advance: Decimal,
    /// Sum of net pay.
    pub total_net: Decimal,
}

impl RunTotals {
    /// Sums the lines.
    pub fn from_lines(lines: &[PayrollLine]) -> Self {
        lines.iter().fold(
            Self {
                employee_count: lines.len(),
                ..Self::default()
            },
            |mut totals, line| {
                totals.total_gross += line.earnings.gross_salary;
                totals.total_deductions += line.deductions.total;
                totals.total_advance += line.deductions.advance;
                totals.total_net += line.net_pay;
                totals
            },
        )
    }
}

/// The payroll for every active employee for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// The payroll month.
    pub month: PayrollMonth,
    /// Draft or finalized.
    pub status: RunStatus,
    /// One line per active employee, in roster order.
    pub lines: Vec<PayrollLine>,
    /// Totals across the lines.
    pub totals: RunTotals,
    /// When the run was finalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<DateTime<Utc>>,
}

impl PayrollRun {
    pub(crate) fn draft(month: PayrollMonth, lines: Vec<PayrollLine>) -> Self {
        Self {
            month,
            status: RunStatus::Draft,
            totals: RunTotals::from_lines(&lines),
            lines,
            finalized_at: None,
        }
    }

    /// True once loan deductions have been committed.
    pub fn is_finalized(&self) -> bool {
        self.status == RunStatus::Finalized
    }

    /// Replaces the employee's line, or appends it if absent, and re-totals.
    pub(crate) fn upsert_line(&mut self, line: PayrollLine) {
        match self
            .lines
            .iter_mut()
            .find(|l| l.employee_id == line.employee_id)
        {
            Some(existing) => *existing = line,
            None => self.lines.push(line),
        }
        self.totals = RunTotals::from_lines(&self.lines);
    }
}
