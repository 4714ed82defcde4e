//! Attendance classification.
//!
//! This module turns a month of raw daily marks into per-category day counts.

use tracing::warn;

use crate::models::{AttendanceBreakdown, AttendanceMark, AuditStep};

/// A mark that matched no attendance category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedMark {
    /// 1-based day of the month.
    pub day: u32,
    /// The mark as entered, trimmed.
    pub mark: String,
}

/// The result of classifying attendance, including the counts and audit step.
#[derive(Debug, Clone)]
pub struct AttendanceClassificationResult {
    /// Day counts per category.
    pub breakdown: AttendanceBreakdown,
    /// Marks that were counted toward no category.
    pub unrecognized: Vec<UnrecognizedMark>,
    /// The audit step recording this classification.
    pub audit_step: AuditStep,
}

/// Classifies an ordered sequence of daily marks.
///
/// Blank marks are paid as present days. Unrecognized marks are counted as
/// `unclassified`, logged, and otherwise ignored.
///
/// # Examples
///
/// ```
/// use hospital_payroll::calculation::classify_attendance;
///
/// let marks = ["P", "p+ot", "OT", "Off", "A", "", "Leave"];
/// let result = classify_attendance(&marks, 1);
///
/// assert_eq!(result.breakdown.present, 2);
/// assert_eq!(result.breakdown.present_with_overtime, 1);
/// assert_eq!(result.breakdown.overtime_only, 1);
/// assert_eq!(result.breakdown.off, 1);
/// assert_eq!(result.breakdown.absent, 1);
/// assert_eq!(result.breakdown.unclassified, 1);
/// assert_eq!(result.unrecognized[0].day, 7);
/// ```
pub fn classify_attendance<S: AsRef<str>>(
    marks: &[S],
    step_number: u32,
) -> AttendanceClassificationResult {
    let mut breakdown = AttendanceBreakdown::default();
    let mut unrecognized = Vec::new();
    let mut blank_days = 0u32;

    for (index, raw) in marks.iter().enumerate() {
        let day = index as u32 + 1;
        match AttendanceMark::parse(raw.as_ref()) {
            AttendanceMark::Present => breakdown.present += 1,
            AttendanceMark::PresentWithOvertime => breakdown.present_with_overtime += 1,
            AttendanceMark::OvertimeOnly => breakdown.overtime_only += 1,
            AttendanceMark::Off => breakdown.off += 1,
            AttendanceMark::Absent => breakdown.absent += 1,
            AttendanceMark::Blank => {
                breakdown.present += 1;
                blank_days += 1;
            }
            AttendanceMark::Unrecognized(mark) => {
                warn!(day, mark = %mark, "Ignoring unrecognized attendance mark");
                breakdown.unclassified += 1;
                unrecognized.push(UnrecognizedMark { day, mark });
            }
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_classification".to_string(),
        rule_name: "Attendance Classification".to_string(),
        input: serde_json::json!({
            "days_marked": marks.len(),
        }),
        output: serde_json::json!({
            "present": breakdown.present,
            "present_with_overtime": breakdown.present_with_overtime,
            "overtime_only": breakdown.overtime_only,
            "off": breakdown.off,
            "absent": breakdown.absent,
            "unclassified": breakdown.unclassified,
            "blank_counted_present": blank_days,
        }),
        reasoning: format!(
            "P:{} P+OT:{} OT:{} OFF:{} A:{} ({} blank paid as present, {} unrecognized)",
            breakdown.present,
            breakdown.present_with_overtime,
            breakdown.overtime_only,
            breakdown.off,
            breakdown.absent,
            blank_days,
            breakdown.unclassified
        ),
    };

    AttendanceClassificationResult {
        breakdown,
        unrecognized,
        audit_step,
    }
}
