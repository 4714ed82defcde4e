//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the calculator, loan ledger and payroll runner can report.
//! Policy no-ops (e.g. deducting from a cancelled loan) are not errors and
//! never appear here.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use hospital_payroll::error::PayrollError;
///
/// let error = PayrollError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A month identifier was not of the form `YYYY-MM`.
    #[error("Invalid month '{value}': expected YYYY-MM")]
    InvalidMonth {
        /// The rejected value.
        value: String,
    },

    /// The attendance record does not carry one mark per calendar day.
    #[error(
        "Attendance for employee '{employee_id}' in {month} has {actual} marks, expected {expected}"
    )]
    AttendanceLengthMismatch {
        /// The employee the record belongs to.
        employee_id: String,
        /// The month of the record.
        month: String,
        /// Number of calendar days in the month.
        expected: usize,
        /// Number of marks supplied.
        actual: usize,
    },

    /// The attendance record belongs to another employee or month.
    #[error("Attendance record mismatch: {message}")]
    AttendanceMismatch {
        /// A description of the mismatch.
        message: String,
    },

    /// No attendance was recorded for an active employee in the month.
    #[error("No attendance recorded for employee '{employee_id}' in {month}")]
    AttendanceMissing {
        /// The employee with no record.
        employee_id: String,
        /// The month that was requested.
        month: String,
    },

    /// The employee id is not on the roster.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The unknown employee id.
        employee_id: String,
    },

    /// The roster lists the same employee id more than once.
    #[error("Employee id '{employee_id}' appears more than once on the roster")]
    DuplicateEmployee {
        /// The repeated id.
        employee_id: String,
    },

    /// The employee is on the roster but not on payroll.
    #[error("Employee '{employee_id}' is inactive")]
    EmployeeInactive {
        /// The inactive employee.
        employee_id: String,
    },

    /// The loan id is not held by the ledger.
    #[error("Loan not found: {loan_id}")]
    LoanNotFound {
        /// The unknown loan id.
        loan_id: String,
    },

    /// Loan parameters were rejected.
    #[error("Invalid loan field '{field}': {message}")]
    InvalidLoan {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A manual advance was supplied while the loan ledger owns advances.
    #[error("Advance for employee '{employee_id}' is managed by the loan ledger")]
    AdvanceManagedByLedger {
        /// The employee whose advance was edited.
        employee_id: String,
    },

    /// A loan operation was requested but advances come from the employee record.
    #[error("No loan ledger is configured")]
    LedgerNotConfigured,

    /// No payroll run exists for the month.
    #[error("No payroll run for {month}")]
    RunNotFound {
        /// The month that was requested.
        month: String,
    },

    /// The durable write of loan state failed; the in-memory change was rolled back.
    #[error("Failed to persist loans for employee '{employee_id}': {message}")]
    Persistence {
        /// The employee whose loans were being written.
        employee_id: String,
        /// The underlying failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

/// Failures reported by a loan store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the store failed.
    #[error("I/O error on loan store '{path}': {source}")]
    Io {
        /// The store location.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The stored snapshot could not be encoded or decoded.
    #[error("Loan store '{path}' could not be (de)serialized: {message}")]
    Serialization {
        /// The store location.
        path: String,
        /// A description of the serde failure.
        message: String,
    },

    /// The store refused the write.
    #[error("Loan store unavailable: {message}")]
    Unavailable {
        /// Why the store is unavailable.
        message: String,
    },
}

impl PersistenceError {
    /// Wraps the failure as a [`PayrollError::Persistence`] for one employee's loans.
    pub fn for_employee(self, employee_id: &str) -> PayrollError {
        PayrollError::Persistence {
            employee_id: employee_id.to_string(),
            message: self.to_string(),
        }
    }
}
