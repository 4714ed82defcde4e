//! Single-employee payroll calculation.
//!
//! Runs every rule in order over one employee's month of attendance and
//! assembles the resulting [`PayrollLine`] with its audit trace.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PayrollPolicy;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    AttendanceRecord, AuditStep, AuditTrace, AuditWarning, Deductions, Earnings, Employee,
    PayrollLine,
};

use super::{
    calculate_allowances, calculate_basic_pay, calculate_overtime_pay, calculate_professional_tax,
    calculate_provident_fund, calculate_state_insurance, calculate_working_days,
    classify_attendance,
};

/// Largest monthly amount, in rupees, accepted for any salary component or advance.
///
/// Keeps every product in the pipeline well inside `Decimal`'s range.
pub const MAX_MONTHLY_AMOUNT: i64 = 1_000_000_000_000;

fn check_amounts(employee: &Employee, advance: Decimal) -> PayrollResult<()> {
    let amounts = [
        ("basic_salary", employee.basic_salary),
        ("hra", employee.hra),
        ("conveyance", employee.conveyance),
        ("other_allowances", employee.other_allowances),
        ("advance", advance),
    ];
    let limit = Decimal::from(MAX_MONTHLY_AMOUNT);
    for (field, amount) in amounts {
        if amount.abs() > limit {
            return Err(PayrollError::CalculationError {
                message: format!(
                    "{} of ₹{} for employee '{}' exceeds the ₹{} limit",
                    field, amount, employee.id, limit
                ),
            });
        }
    }
    Ok(())
}

/// Calculates one employee's payroll line for the record's month.
///
/// `advance` is the salary-advance recovery for the month, supplied by the
/// caller from the loan ledger or the employee's flat advance.
///
/// # Errors
///
/// - [`PayrollError::AttendanceMismatch`] if the record belongs to another employee
/// - [`PayrollError::AttendanceLengthMismatch`] if the record does not have one
///   mark per calendar day
/// - [`PayrollError::CalculationError`] if a salary component or the advance
///   exceeds [`MAX_MONTHLY_AMOUNT`]
///
/// # Examples
///
/// ```
/// use hospital_payroll::calculation::calculate_payroll;
/// use hospital_payroll::config::PayrollPolicy;
/// use hospital_payroll::models::{AttendanceRecord, Employee, EmployeeStatus};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "EMP001".to_string(),
///     name: "Asha Rao".to_string(),
///     department: "Nursing".to_string(),
///     basic_salary: Decimal::from(30000),
///     hra: Decimal::ZERO,
///     conveyance: Decimal::ZERO,
///     other_allowances: Decimal::ZERO,
///     has_pf: true,
///     has_esic: true,
///     has_pt: true,
///     advance: Decimal::ZERO,
///     status: EmployeeStatus::Active,
/// };
/// let mut marks = vec!["P"; 26];
/// marks.extend(["OFF"; 4]);
/// let record = AttendanceRecord::new("EMP001", "2025-06".parse().unwrap(), marks);
///
/// let line = calculate_payroll(&employee, &record, Decimal::ZERO, &PayrollPolicy::default()).unwrap();
/// assert_eq!(line.earnings.gross_salary, Decimal::from(45600));
/// assert_eq!(line.net_pay, Decimal::from(43600));
/// ```
pub fn calculate_payroll(
    employee: &Employee,
    record: &AttendanceRecord,
    advance: Decimal,
    policy: &PayrollPolicy,
) -> PayrollResult<PayrollLine> {
    if record.employee_id != employee.id {
        return Err(PayrollError::AttendanceMismatch {
            message: format!(
                "record for '{}' supplied for employee '{}'",
                record.employee_id, employee.id
            ),
        });
    }
    record.validate()?;
    check_amounts(employee, advance)?;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let classification = classify_attendance(&record.marks, step_number);
    let breakdown = classification.breakdown;
    steps.push(classification.audit_step);
    step_number += 1;

    for unrecognized in &classification.unrecognized {
        warnings.push(AuditWarning {
            code: "UNCLASSIFIED_ATTENDANCE_MARK".to_string(),
            message: format!(
                "Day {} mark '{}' is not a recognized attendance code and was not paid",
                unrecognized.day, unrecognized.mark
            ),
            severity: "medium".to_string(),
        });
    }

    let days = calculate_working_days(
        &breakdown,
        record.month.days_in_month(),
        &policy.attendance,
        step_number,
    );
    let working_days = days.working_days;
    steps.push(days.audit_step);
    step_number += 1;

    if working_days.excess_off > 0 {
        warnings.push(AuditWarning {
            code: "EXCESS_OFF_DAYS".to_string(),
            message: format!(
                "{} off days beyond the monthly allowance of {} are unpaid",
                working_days.excess_off, policy.attendance.paid_offs_per_month
            ),
            severity: "low".to_string(),
        });
    }

    let basic_pay = calculate_basic_pay(employee.basic_salary, &working_days, step_number);
    let daily_rate = basic_pay.daily_rate;
    let basic = basic_pay.basic;
    steps.push(basic_pay.audit_step);
    step_number += 1;

    let allowances = calculate_allowances(
        employee,
        basic,
        &working_days,
        &policy.allowances,
        step_number,
    );
    steps.push(allowances.audit_step);
    step_number += 1;

    let overtime = calculate_overtime_pay(
        working_days.overtime_days,
        daily_rate,
        &policy.overtime,
        step_number,
    );
    steps.push(overtime.audit_step);
    step_number += 1;

    let basic_salary_components =
        basic + allowances.hra + allowances.conveyance + allowances.other_allowances;
    let gross_salary = basic_salary_components + overtime.amount;
    let earnings = Earnings {
        basic,
        hra: allowances.hra,
        conveyance: allowances.conveyance,
        other_allowances: allowances.other_allowances,
        overtime_amount: overtime.amount,
        basic_salary_components,
        gross_salary,
    };

    let pf = calculate_provident_fund(employee, basic, &policy.deductions, step_number);
    steps.push(pf.audit_step);
    step_number += 1;

    let esic = calculate_state_insurance(
        employee,
        basic_salary_components,
        &policy.deductions,
        step_number,
    );
    steps.push(esic.audit_step);
    step_number += 1;

    let pt = calculate_professional_tax(employee, gross_salary, &policy.deductions, step_number);
    steps.push(pt.audit_step);
    step_number += 1;

    steps.push(AuditStep {
        step_number,
        rule_id: "advance_recovery".to_string(),
        rule_name: "Salary Advance Recovery".to_string(),
        input: serde_json::json!({
            "advance": advance.to_string(),
        }),
        output: serde_json::json!({
            "advance": advance.to_string(),
        }),
        reasoning: format!("Advance recovery of ₹{} for {}", advance, record.month),
    });

    let total = pf.amount + esic.amount + pt.amount + advance;
    let deductions = Deductions {
        pf: pf.amount,
        esic: esic.amount,
        pt: pt.amount,
        advance,
        total,
    };
    let net_pay = gross_salary - total;

    debug!(
        employee_id = %employee.id,
        month = %record.month,
        gross_salary = %gross_salary,
        net_pay = %net_pay,
        "Payroll line calculated"
    );

    Ok(PayrollLine {
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        department: employee.department.clone(),
        month: record.month,
        attendance: breakdown,
        working_days,
        daily_rate,
        earnings,
        deductions,
        net_pay,
        audit_trace: AuditTrace { steps, warnings },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeStatus, PayrollMonth};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn month(s: &str) -> PayrollMonth {
        s.parse().unwrap()
    }

    fn create_test_employee(basic_salary: &str) -> Employee {
        Employee {
            id: "EMP001".to_string(),
            name: "Asha Rao".to_string(),
            department: "Nursing".to_string(),
            basic_salary: dec(basic_salary),
            hra: Decimal::ZERO,
            conveyance: Decimal::ZERO,
            other_allowances: Decimal::ZERO,
            has_pf: true,
            has_esic: true,
            has_pt: true,
            advance: Decimal::ZERO,
            status: EmployeeStatus::Active,
        }
    }

    fn july_marks() -> Vec<&'static str> {
        let mut marks = vec!["OFF"; 4];
        marks.push("A");
        marks.extend(vec!["P+OT"; 3]);
        marks.extend(vec!["P"; 23]);
        marks
    }

    /// PAY-001: full month, all flags set
    #[test]
    fn test_pay_001_full_month_all_flags() {
        let employee = create_test_employee("30000");
        let record = AttendanceRecord::new("EMP001", month("2025-06"), vec!["P"; 30]);
        let line =
            calculate_payroll(&employee, &record, Decimal::ZERO, &PayrollPolicy::default())
                .unwrap();

        // 30 P days with the full off allowance unused pays 34 base days.
        assert_eq!(line.working_days.base_working_days, 34);
        assert_eq!(line.daily_rate, dec("1000"));
        assert_eq!(line.earnings.basic, dec("34000"));
        assert_eq!(line.earnings.hra, dec("13600"));
        assert_eq!(line.earnings.conveyance, dec("1600"));
        assert_eq!(line.earnings.other_allowances, dec("2000"));
        assert_eq!(line.deductions.pf, dec("1800"));
        assert_eq!(line.deductions.esic, Decimal::ZERO);
        assert_eq!(line.deductions.pt, dec("200"));
    }

    /// PAY-002: four offs in a 30-day month pay exactly the monthly basic
    #[test]
    fn test_pay_002_month_with_allowance_used() {
        let employee = create_test_employee("30000");
        let mut marks = vec!["P"; 26];
        marks.extend(vec!["OFF"; 4]);
        let record = AttendanceRecord::new("EMP001", month("2025-06"), marks);
        let line =
            calculate_payroll(&employee, &record, Decimal::ZERO, &PayrollPolicy::default())
                .unwrap();

        assert_eq!(line.earnings.basic, dec("30000"));
        assert_eq!(line.earnings.hra, dec("12000"));
        assert_eq!(line.earnings.conveyance, dec("1600"));
        assert_eq!(line.earnings.other_allowances, dec("2000"));
        assert_eq!(line.earnings.overtime_amount, Decimal::ZERO);
        assert_eq!(line.earnings.gross_salary, dec("45600"));
        assert_eq!(line.deductions.pf, dec("1800"));
        assert_eq!(line.deductions.esic, Decimal::ZERO);
        assert_eq!(line.deductions.pt, dec("200"));
        assert_eq!(line.deductions.total, dec("2000"));
        assert_eq!(line.net_pay, dec("43600"));
    }

    /// PAY-003: July with offs, an absence and P+OT days
    #[test]
    fn test_pay_003_july_with_overtime() {
        let employee = create_test_employee("31000");
        let record = AttendanceRecord::new("EMP001", month("2025-07"), july_marks());
        let line =
            calculate_payroll(&employee, &record, Decimal::ZERO, &PayrollPolicy::default())
                .unwrap();

        assert_eq!(line.working_days.base_working_days, 30);
        assert_eq!(line.working_days.overtime_days, 3);
        assert_eq!(line.working_days.working_days, 33);
        assert_eq!(line.daily_rate, dec("1000"));
        assert_eq!(line.earnings.basic, dec("30000"));
        assert_eq!(line.earnings.overtime_amount, dec("4500"));
        assert_eq!(
            line.earnings.gross_salary,
            line.earnings.basic_salary_components + dec("4500")
        );
    }

    /// PAY-004: every statutory flag off means net equals gross
    #[test]
    fn test_pay_004_no_statutory_deductions() {
        let mut employee = create_test_employee("30000");
        employee.has_pf = false;
        employee.has_esic = false;
        employee.has_pt = false;
        let mut marks = vec!["P"; 26];
        marks.extend(vec!["OFF"; 4]);
        let record = AttendanceRecord::new("EMP001", month("2025-06"), marks);
        let line =
            calculate_payroll(&employee, &record, Decimal::ZERO, &PayrollPolicy::default())
                .unwrap();

        assert_eq!(line.deductions.pf, Decimal::ZERO);
        assert_eq!(line.deductions.esic, Decimal::ZERO);
        assert_eq!(line.deductions.pt, Decimal::ZERO);
        assert_eq!(line.net_pay, line.earnings.gross_salary);
    }

    /// PAY-005: advance flows into deductions and net pay
    #[test]
    fn test_pay_005_advance_deducted() {
        let employee = create_test_employee("30000");
        let mut marks = vec!["P"; 26];
        marks.extend(vec!["OFF"; 4]);
        let record = AttendanceRecord::new("EMP001", month("2025-06"), marks);
        let line =
            calculate_payroll(&employee, &record, dec("2000"), &PayrollPolicy::default()).unwrap();

        assert_eq!(line.deductions.advance, dec("2000"));
        assert_eq!(line.deductions.total, dec("4000"));
        assert_eq!(line.net_pay, dec("41600"));
    }

    /// PAY-006: low earner is covered by state insurance
    #[test]
    fn test_pay_006_low_earner_pays_esic() {
        let employee = create_test_employee("10000");
        let mut marks = vec!["P"; 26];
        marks.extend(vec!["OFF"; 4]);
        let record = AttendanceRecord::new("EMP001", month("2025-06"), marks);
        let line =
            calculate_payroll(&employee, &record, Decimal::ZERO, &PayrollPolicy::default())
                .unwrap();

        // 10000 + 4000 + 1600 + 2000 = 17600; 17600 * 0.0075 = 132
        assert_eq!(line.earnings.basic_salary_components, dec("17600"));
        assert_eq!(line.deductions.esic, dec("132"));
        assert_eq!(line.deductions.pf, dec("1200"));
    }

    /// PAY-007: wrong employee on the record is rejected
    #[test]
    fn test_pay_007_record_for_other_employee() {
        let employee = create_test_employee("30000");
        let record = AttendanceRecord::new("EMP002", month("2025-06"), vec!["P"; 30]);
        let result =
            calculate_payroll(&employee, &record, Decimal::ZERO, &PayrollPolicy::default());
        assert!(matches!(result, Err(PayrollError::AttendanceMismatch { .. })));
    }

    /// PAY-008: short record is rejected
    #[test]
    fn test_pay_008_short_record() {
        let employee = create_test_employee("30000");
        let record = AttendanceRecord::new("EMP001", month("2025-02"), vec!["P"; 27]);
        let result =
            calculate_payroll(&employee, &record, Decimal::ZERO, &PayrollPolicy::default());
        assert!(matches!(
            result,
            Err(PayrollError::AttendanceLengthMismatch {
                expected: 28,
                actual: 27,
                ..
            })
        ));
    }

    /// PAY-009: warnings for unrecognized marks and excess offs
    #[test]
    fn test_pay_009_warnings() {
        let employee = create_test_employee("30000");
        let mut marks = vec!["P"; 23];
        marks.extend(vec!["OFF"; 6]);
        marks.push("Leave");
        let record = AttendanceRecord::new("EMP001", month("2025-06"), marks);
        let line =
            calculate_payroll(&employee, &record, Decimal::ZERO, &PayrollPolicy::default())
                .unwrap();

        let codes: Vec<&str> = line
            .audit_trace
            .warnings
            .iter()
            .map(|w| w.code.as_str())
            .collect();
        assert!(codes.contains(&"UNCLASSIFIED_ATTENDANCE_MARK"));
        assert!(codes.contains(&"EXCESS_OFF_DAYS"));
        assert_eq!(line.attendance.unclassified, 1);
        assert_eq!(line.working_days.base_working_days, 27);
    }

    /// PAY-010: audit steps are numbered in order
    #[test]
    fn test_pay_010_audit_steps_sequential() {
        let employee = create_test_employee("30000");
        let record = AttendanceRecord::new("EMP001", month("2025-06"), vec!["P"; 30]);
        let line =
            calculate_payroll(&employee, &record, Decimal::ZERO, &PayrollPolicy::default())
                .unwrap();

        assert_eq!(line.audit_trace.steps.len(), 9);
        for (index, step) in line.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, index as u32 + 1);
        }
        assert_eq!(line.audit_trace.steps[0].rule_id, "attendance_classification");
        assert_eq!(line.audit_trace.steps[8].rule_id, "advance_recovery");
    }

    /// PAY-011: out-of-range amounts are rejected instead of overflowing
    #[test]
    fn test_pay_011_rejects_out_of_range_amounts() {
        let marks = vec!["P"; 30];
        let record = AttendanceRecord::new("EMP001", month("2025-06"), marks);

        let huge_salary = create_test_employee(&Decimal::MAX.to_string());
        let result =
            calculate_payroll(&huge_salary, &record, Decimal::ZERO, &PayrollPolicy::default());
        assert!(matches!(
            result,
            Err(PayrollError::CalculationError { ref message }) if message.contains("basic_salary")
        ));

        let mut huge_hra = create_test_employee("30000");
        huge_hra.hra = Decimal::MIN;
        let result =
            calculate_payroll(&huge_hra, &record, Decimal::ZERO, &PayrollPolicy::default());
        assert!(matches!(result, Err(PayrollError::CalculationError { .. })));

        let employee = create_test_employee("30000");
        let result = calculate_payroll(&employee, &record, Decimal::MAX, &PayrollPolicy::default());
        assert!(matches!(result, Err(PayrollError::CalculationError { .. })));

        let at_limit = create_test_employee(&MAX_MONTHLY_AMOUNT.to_string());
        assert!(
            calculate_payroll(&at_limit, &record, Decimal::ZERO, &PayrollPolicy::default()).is_ok()
        );
    }
}
