//! Monthly payroll runs.
//!
//! The [`PayrollRunner`] holds the roster, the attendance for each month, the
//! advance source and the runs themselves. It previews a month as a draft,
//! finalizes it by committing loan deductions once per employee, and
//! recalculates single employees after corrections.

mod integrity;
mod payroll_runner;
mod run;

pub use integrity::{IntegrityIssue, IntegrityIssueKind};
pub use payroll_runner::{AdvanceSource, PayrollRunner};
pub use run::{PayrollRun, RunStatus, RunTotals};
