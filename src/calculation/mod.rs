//! Calculation logic for the payroll engine.
//!
//! This module contains all the calculation functions for monthly hospital
//! payroll: attendance classification, paid working days, basic pay
//! proration, allowances, overtime pay, statutory deductions, and the
//! single-employee payroll line that combines them.

mod allowances;
mod attendance;
mod base_pay;
mod overtime;
mod payroll;
mod rounding;
mod statutory;
mod working_days;

pub use allowances::{AllowancesResult, calculate_allowances};
pub use attendance::{AttendanceClassificationResult, UnrecognizedMark, classify_attendance};
pub use base_pay::{BasicPayResult, calculate_basic_pay};
pub use overtime::{OvertimePayResult, calculate_overtime_pay};
pub use payroll::{MAX_MONTHLY_AMOUNT, calculate_payroll};
pub use rounding::round_rupees;
pub use statutory::{
    StatutoryDeductionResult, calculate_professional_tax, calculate_provident_fund,
    calculate_state_insurance,
};
pub use working_days::{WorkingDaysResult, calculate_working_days};
