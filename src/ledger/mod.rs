//! Salary-advance loan ledger.
//!
//! The [`LoanLedger`] owns every employee's loans, computes the advance to
//! recover each month, applies it after a payroll run is finalized, and
//! handles cancellation, settlement, one-off overrides and adjustments.
//! Durable storage is pluggable through [`LoanPersistence`].
//!
//! # Example
//!
//! ```
//! use hospital_payroll::ledger::LoanLedger;
//! use rust_decimal::Decimal;
//!
//! let mut ledger = LoanLedger::in_memory();
//! let april = "2025-04".parse().unwrap();
//! ledger.create_loan("EMP001", Decimal::from(12000), 6, april).unwrap();
//!
//! assert_eq!(ledger.monthly_deduction("EMP001", april), Decimal::from(2000));
//! ```

mod loan_ledger;
mod persistence;
mod report;

pub use loan_ledger::{DeductionApplication, LoanAction, LoanDeduction, LoanLedger};
pub use persistence::{InMemoryLoanStore, JsonFileLoanStore, LoanPersistence};
pub use report::{AdvanceReport, AdvanceReportSummary, EmployeeAdvanceSummary, LoanSummary};
