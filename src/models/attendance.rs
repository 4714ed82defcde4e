//! Attendance marks and monthly attendance records.

use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

use super::PayrollMonth;

/// A single day's attendance mark after normalization.
///
/// Marks are entered as free text by the attendance collaborators; parsing is
/// case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceMark {
    /// `P`
    Present,
    /// `P+OT` or `POT`
    PresentWithOvertime,
    /// `OT`
    OvertimeOnly,
    /// `OFF` or `O`
    Off,
    /// `A`
    Absent,
    /// An empty cell. Paid as a present day.
    Blank,
    /// Anything else, kept verbatim.
    Unrecognized(String),
}

impl AttendanceMark {
    /// Parses a raw mark.
    ///
    /// # Example
    ///
    /// ```
    /// use hospital_payroll::models::AttendanceMark;
    ///
    /// assert_eq!(AttendanceMark::parse(" p+ot "), AttendanceMark::PresentWithOvertime);
    /// assert_eq!(AttendanceMark::parse("Off"), AttendanceMark::Off);
    /// assert_eq!(AttendanceMark::parse(""), AttendanceMark::Blank);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_uppercase();
        match normalized.as_str() {
            "P" => Self::Present,
            "P+OT" | "POT" => Self::PresentWithOvertime,
            "OT" => Self::OvertimeOnly,
            "OFF" | "O" => Self::Off,
            "A" => Self::Absent,
            "" => Self::Blank,
            _ => Self::Unrecognized(raw.trim().to_string()),
        }
    }
}

/// One employee's attendance for one calendar month.
///
/// `marks[0]` is day 1 of the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the marks belong to.
    pub employee_id: String,
    /// The month the marks cover.
    pub month: PayrollMonth,
    /// One raw mark per calendar day.
    pub marks: Vec<String>,
}

impl AttendanceRecord {
    /// Creates a record from raw marks.
    pub fn new<S: Into<String>>(
        employee_id: impl Into<String>,
        month: PayrollMonth,
        marks: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            month,
            marks: marks.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks that the record has exactly one mark per calendar day.
    pub fn validate(&self) -> PayrollResult<()> {
        let expected = self.month.days_in_month() as usize;
        if self.marks.len() != expected {
            return Err(PayrollError::AttendanceLengthMismatch {
                employee_id: self.employee_id.clone(),
                month: self.month.to_string(),
                expected,
                actual: self.marks.len(),
            });
        }
        Ok(())
    }
}
