//! The payroll run orchestrator.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation;
use crate::config::PayrollPolicy;
use crate::error::{PayrollError, PayrollResult};
use crate::ledger::{AdvanceReport, LoanAction, LoanLedger, LoanSummary};
use crate::models::{AttendanceRecord, Employee, Loan, PayrollLine, PayrollMonth};

use super::integrity::{IntegrityIssue, check_roster};
use super::run::{PayrollRun, RunStatus};

/// Where each employee's monthly advance recovery comes from.
#[derive(Debug)]
pub enum AdvanceSource {
    /// Loans in the ledger, amortized when a run is finalized.
    Ledger(LoanLedger),
    /// The flat `advance` field on each employee record.
    EmployeeField,
}

/// Owns the roster, attendance, advance source and runs for the payroll.
///
/// Lines are always derived from the stored attendance and the current loan
/// state, never from a previous line. Loan deductions are applied at most
/// once per employee and month, when a run is finalized.
#[derive(Debug)]
pub struct PayrollRunner {
    policy: PayrollPolicy,
    roster: Vec<Employee>,
    attendance: HashMap<(PayrollMonth, String), AttendanceRecord>,
    advances: AdvanceSource,
    runs: BTreeMap<PayrollMonth, PayrollRun>,
    /// Advance actually committed per (employee, month).
    committed: HashMap<(String, PayrollMonth), Decimal>,
}

impl PayrollRunner {
    /// Creates a runner with an empty roster.
    pub fn new(policy: PayrollPolicy, advances: AdvanceSource) -> Self {
        Self {
            policy,
            roster: Vec::new(),
            attendance: HashMap::new(),
            advances,
            runs: BTreeMap::new(),
            committed: HashMap::new(),
        }
    }

    /// The policy lines are calculated with.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }

    /// The current roster.
    pub fn roster(&self) -> &[Employee] {
        &self.roster
    }

    /// The loan ledger, if advances come from one.
    pub fn ledger(&self) -> Option<&LoanLedger> {
        match &self.advances {
            AdvanceSource::Ledger(ledger) => Some(ledger),
            AdvanceSource::EmployeeField => None,
        }
    }

    fn ledger_mut(&mut self) -> PayrollResult<&mut LoanLedger> {
        match &mut self.advances {
            AdvanceSource::Ledger(ledger) => Ok(ledger),
            AdvanceSource::EmployeeField => Err(PayrollError::LedgerNotConfigured),
        }
    }

    /// Replaces the roster.
    pub fn set_roster(&mut self, roster: Vec<Employee>) {
        info!(employees = roster.len(), "Roster replaced");
        self.roster = roster;
    }

    /// Looks up an employee by id.
    pub fn employee(&self, employee_id: &str) -> PayrollResult<&Employee> {
        self.roster
            .iter()
            .find(|e| e.id == employee_id)
            .ok_or_else(|| PayrollError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    /// Stores an employee's marks for a month, replacing earlier marks.
    ///
    /// # Errors
    ///
    /// [`PayrollError::AttendanceLengthMismatch`] unless there is exactly
    /// one mark per calendar day.
    pub fn record_attendance(&mut self, record: AttendanceRecord) -> PayrollResult<()> {
        record.validate()?;
        debug!(
            employee_id = %record.employee_id,
            month = %record.month,
            "Attendance recorded"
        );
        self.attendance
            .insert((record.month, record.employee_id.clone()), record);
        Ok(())
    }

    /// The stored marks for an employee and month.
    pub fn attendance_for(
        &self,
        month: PayrollMonth,
        employee_id: &str,
    ) -> Option<&AttendanceRecord> {
        self.attendance.get(&(month, employee_id.to_string()))
    }

    /// The run for a month, if one has been previewed or finalized.
    pub fn run(&self, month: PayrollMonth) -> Option<&PayrollRun> {
        self.runs.get(&month)
    }

    /// The advance to charge `employee` in `month`, without touching the ledger.
    fn advance_for(&self, employee: &Employee, month: PayrollMonth) -> Decimal {
        match &self.advances {
            AdvanceSource::Ledger(ledger) => self
                .committed
                .get(&(employee.id.clone(), month))
                .copied()
                .unwrap_or_else(|| ledger.monthly_deduction(&employee.id, month)),
            AdvanceSource::EmployeeField => employee.advance,
        }
    }

    /// Calculates one employee's line from explicit inputs.
    ///
    /// The advance comes from the configured source and nothing is stored or
    /// applied.
    ///
    /// # Errors
    ///
    /// [`PayrollError::AttendanceMismatch`] if the record is for another
    /// month or employee, and any error from the calculation itself.
    pub fn calculate_payroll(
        &self,
        employee: &Employee,
        record: &AttendanceRecord,
        month: PayrollMonth,
    ) -> PayrollResult<PayrollLine> {
        if record.month != month {
            return Err(PayrollError::AttendanceMismatch {
                message: format!("record for {} supplied for {}", record.month, month),
            });
        }
        let advance = self.advance_for(employee, month);
        calculation::calculate_payroll(employee, record, advance, &self.policy)
    }

    fn derive_line(&self, employee: &Employee, month: PayrollMonth) -> PayrollResult<PayrollLine> {
        let record = self.attendance_for(month, &employee.id).ok_or_else(|| {
            PayrollError::AttendanceMissing {
                employee_id: employee.id.clone(),
                month: month.to_string(),
            }
        })?;
        self.calculate_payroll(employee, record, month)
    }

    /// Fails on the first employee id listed twice.
    fn ensure_unique_ids(&self) -> PayrollResult<()> {
        let mut seen = HashSet::new();
        match self.roster.iter().find(|e| !seen.insert(e.id.as_str())) {
            Some(duplicate) => Err(PayrollError::DuplicateEmployee {
                employee_id: duplicate.id.clone(),
            }),
            None => Ok(()),
        }
    }

    fn derive_lines(&self, month: PayrollMonth) -> PayrollResult<Vec<PayrollLine>> {
        self.ensure_unique_ids()?;
        self.roster
            .iter()
            .filter(|e| e.is_active())
            .map(|e| self.derive_line(e, month))
            .collect()
    }

    /// Calculates a draft run for every active employee.
    ///
    /// The ledger is only read, so previewing any number of times gives the
    /// same lines. A finalized run for the month is left in place and a
    /// fresh draft is returned alongside it.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::DuplicateEmployee`] if an id is on the roster twice
    /// - [`PayrollError::AttendanceMissing`] if an active employee has no marks
    pub fn preview_run(&mut self, month: PayrollMonth) -> PayrollResult<PayrollRun> {
        let run = PayrollRun::draft(month, self.derive_lines(month)?);
        info!(
            month = %month,
            employees = run.totals.employee_count,
            total_net = %run.totals.total_net,
            "Payroll previewed"
        );

        if !self.runs.get(&month).is_some_and(PayrollRun::is_finalized) {
            self.runs.insert(month, run.clone());
        }
        Ok(run)
    }

    /// Applies the ledger deduction for one employee and month unless it
    /// has already been committed.
    fn commit_advance(&mut self, employee: &Employee, month: PayrollMonth) -> PayrollResult<()> {
        let key = (employee.id.clone(), month);
        if self.committed.contains_key(&key) {
            debug!(employee_id = %employee.id, month = %month, "Advance already committed");
            return Ok(());
        }

        let amount = match &mut self.advances {
            AdvanceSource::Ledger(ledger) => ledger.apply_deduction(&employee.id, month)?.total,
            AdvanceSource::EmployeeField => employee.advance,
        };
        self.committed.insert(key, amount);
        Ok(())
    }

    /// Finalizes the month: applies each active employee's loan deduction
    /// exactly once and stores the run as finalized.
    ///
    /// Finalizing again is safe; employees already committed are skipped.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::DuplicateEmployee`] or [`PayrollError::AttendanceMissing`]
    ///   before any deduction is applied
    /// - [`PayrollError::Persistence`] if the loan store fails; employees
    ///   committed before the failure stay committed
    pub fn finalize_run(&mut self, month: PayrollMonth) -> PayrollResult<PayrollRun> {
        // Surface missing attendance before the ledger is touched.
        self.derive_lines(month)?;

        let active: Vec<Employee> = self
            .roster
            .iter()
            .filter(|e| e.is_active())
            .cloned()
            .collect();
        for employee in &active {
            if let Err(err) = self.commit_advance(employee, month) {
                warn!(
                    employee_id = %employee.id,
                    month = %month,
                    error = %err,
                    "Finalization stopped"
                );
                return Err(err);
            }
        }

        let mut run = PayrollRun::draft(month, self.derive_lines(month)?);
        run.status = RunStatus::Finalized;
        run.finalized_at = Some(
            self.runs
                .get(&month)
                .and_then(|r| r.finalized_at)
                .unwrap_or_else(Utc::now),
        );

        info!(
            month = %month,
            employees = run.totals.employee_count,
            total_advance = %run.totals.total_advance,
            total_net = %run.totals.total_net,
            "Payroll finalized"
        );
        self.runs.insert(month, run.clone());
        Ok(run)
    }

    /// Replaces the roster and the month's attendance, then previews and
    /// finalizes the month.
    ///
    /// `attendance_by_employee` maps employee ids to one mark per day.
    pub fn run_payroll(
        &mut self,
        roster: Vec<Employee>,
        attendance_by_employee: HashMap<String, Vec<String>>,
        month: PayrollMonth,
    ) -> PayrollResult<Vec<PayrollLine>> {
        let records: Vec<AttendanceRecord> = attendance_by_employee
            .into_iter()
            .map(|(employee_id, marks)| AttendanceRecord::new(employee_id, month, marks))
            .collect();
        for record in &records {
            record.validate()?;
        }

        self.set_roster(roster);
        self.attendance.retain(|(m, _), _| *m != month);
        for record in records {
            self.record_attendance(record)?;
        }

        self.preview_run(month)?;
        Ok(self.finalize_run(month)?.lines)
    }

    /// Re-derives one employee's line from stored attendance and current
    /// loan state and replaces it in the month's run.
    ///
    /// With [`AdvanceSource::EmployeeField`], `advance_override` first
    /// replaces the employee's flat advance. With a ledger, advances are
    /// changed through [`PayrollRunner::modify_loan`] instead.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::EmployeeNotFound`] for an unknown id
    /// - [`PayrollError::DuplicateEmployee`] if an id is on the roster twice
    /// - [`PayrollError::EmployeeInactive`] for an employee not on payroll
    /// - [`PayrollError::AdvanceManagedByLedger`] for an override with a ledger
    /// - [`PayrollError::RunNotFound`] if the month has no run
    /// - [`PayrollError::AttendanceMissing`] if the employee has no marks
    pub fn recalculate_one(
        &mut self,
        month: PayrollMonth,
        employee_id: &str,
        advance_override: Option<Decimal>,
    ) -> PayrollResult<PayrollLine> {
        self.ensure_unique_ids()?;
        if !self.employee(employee_id)?.is_active() {
            return Err(PayrollError::EmployeeInactive {
                employee_id: employee_id.to_string(),
            });
        }
        if !self.runs.contains_key(&month) {
            return Err(PayrollError::RunNotFound {
                month: month.to_string(),
            });
        }

        if let Some(advance) = advance_override {
            if let AdvanceSource::Ledger(_) = self.advances {
                return Err(PayrollError::AdvanceManagedByLedger {
                    employee_id: employee_id.to_string(),
                });
            }
            for employee in self.roster.iter_mut().filter(|e| e.id == employee_id) {
                employee.advance = advance;
            }
        }

        let employee = self.employee(employee_id)?.clone();
        let finalized = self.runs.get(&month).is_some_and(PayrollRun::is_finalized);
        // Validate before committing so a missing record cannot leave a deduction behind.
        self.derive_line(&employee, month)?;
        if finalized {
            self.commit_advance(&employee, month)?;
        }
        let line = self.derive_line(&employee, month)?;

        if let Some(run) = self.runs.get_mut(&month) {
            run.upsert_line(line.clone());
        }
        info!(
            employee_id,
            month = %month,
            net_pay = %line.net_pay,
            "Employee payroll recalculated"
        );
        Ok(line)
    }

    /// Reports roster and attendance problems for the month.
    pub fn check_data_integrity(&self, month: PayrollMonth) -> Vec<IntegrityIssue> {
        check_roster(&self.roster, month, |employee_id| {
            self.attendance_for(month, employee_id).is_some()
        })
    }

    /// Creates a loan for a roster employee.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::EmployeeNotFound`] for an unknown employee
    /// - [`PayrollError::LedgerNotConfigured`] without a ledger
    /// - any error from [`LoanLedger::create_loan`]
    pub fn create_loan(
        &mut self,
        employee_id: &str,
        principal: Decimal,
        installment_count: u32,
        start_month: PayrollMonth,
    ) -> PayrollResult<Loan> {
        self.employee(employee_id)?;
        self.ledger_mut()?
            .create_loan(employee_id, principal, installment_count, start_month)
    }

    /// Modifies a loan. See [`LoanLedger::modify_loan`].
    pub fn modify_loan(&mut self, loan_id: &str, action: LoanAction) -> PayrollResult<bool> {
        self.ledger_mut()?.modify_loan(loan_id, action)
    }

    /// An employee's loan summary for `month`.
    pub fn loan_summary(
        &self,
        employee_id: &str,
        month: PayrollMonth,
    ) -> PayrollResult<LoanSummary> {
        self.employee(employee_id)?;
        let ledger = self.ledger().ok_or(PayrollError::LedgerNotConfigured)?;
        Ok(ledger.summary(employee_id, month))
    }

    /// The advance report for the current roster.
    pub fn advance_report(&self, month: PayrollMonth) -> PayrollResult<AdvanceReport> {
        let ledger = self.ledger().ok_or(PayrollError::LedgerNotConfigured)?;
        Ok(ledger.advance_report(&self.roster, month))
    }
}
