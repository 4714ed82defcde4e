//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod employee;
mod loan;
mod month;
mod payroll_line;

pub use attendance::{AttendanceMark, AttendanceRecord};
pub use employee::{Employee, EmployeeStatus};
pub use loan::{
    CompletionType, DeductionType, Loan, LoanHistoryEntry, LoanStatus, installment_for,
    installments_remaining,
};
pub use month::PayrollMonth;
pub use payroll_line::{
    AttendanceBreakdown, AuditStep, AuditTrace, AuditWarning, Deductions, Earnings, PayrollLine,
    WorkingDays,
};
