//! The loan ledger: creation, monthly deductions and modifications.

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult, PersistenceError};
use crate::models::{
    CompletionType, DeductionType, Employee, Loan, LoanHistoryEntry, LoanStatus, PayrollMonth,
    installment_for, installments_remaining,
};

use super::persistence::{InMemoryLoanStore, LoanPersistence};
use super::report::{AdvanceReport, EmployeeAdvanceSummary, LoanSummary};

/// A change requested on an existing loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LoanAction {
    /// Stop recovering the loan.
    Cancel,
    /// Deduct the full remaining principal in `for_month`.
    RequestSettlement {
        /// The month the settlement is taken in.
        for_month: PayrollMonth,
    },
    /// Replace the next installment with a one-off amount.
    OverrideNextInstallment {
        /// The one-off amount.
        amount: Decimal,
    },
    /// Correct the installment amount and/or the remaining principal.
    Adjust {
        /// New fixed installment.
        #[serde(default)]
        installment_amount: Option<Decimal>,
        /// New remaining principal; may not exceed the current one.
        #[serde(default)]
        remaining_principal: Option<Decimal>,
    },
}

/// One loan's share of an applied monthly deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDeduction {
    /// The loan deducted from.
    pub loan_id: String,
    /// Amount deducted.
    pub amount: Decimal,
    /// Remaining principal after the deduction.
    pub remaining_after: Decimal,
    /// How the amount was chosen.
    pub deduction_type: DeductionType,
}

/// The result of applying an employee's monthly deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionApplication {
    /// The employee deducted from.
    pub employee_id: String,
    /// The payroll month.
    pub month: PayrollMonth,
    /// Sum of every loan's deduction.
    pub total: Decimal,
    /// Per-loan breakdown.
    pub details: Vec<LoanDeduction>,
}

/// Owns every employee's loans and all loan state transitions.
///
/// Mutations are staged on a copy of the employee's loans, written through
/// [`LoanPersistence`], and only then made visible. A failed write leaves the
/// ledger exactly as it was.
pub struct LoanLedger {
    store: Box<dyn LoanPersistence>,
    loans: HashMap<String, Vec<Loan>>,
}

impl fmt::Debug for LoanLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoanLedger")
            .field("persistent", &self.store.is_persistent())
            .field("employees", &self.loans.len())
            .finish()
    }
}

impl Default for LoanLedger {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl LoanLedger {
    /// Opens a ledger over `store`, loading the loans it already holds.
    pub fn open<S: LoanPersistence + 'static>(store: S) -> Result<Self, PersistenceError> {
        let loans = store.load()?;
        info!(
            employees = loans.len(),
            persistent = store.is_persistent(),
            "Loan ledger opened"
        );
        Ok(Self {
            store: Box::new(store),
            loans,
        })
    }

    /// An empty ledger backed by an [`InMemoryLoanStore`].
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(InMemoryLoanStore::new()),
            loans: HashMap::new(),
        }
    }

    /// Every loan of an employee, in creation order.
    pub fn loans_for(&self, employee_id: &str) -> &[Loan] {
        self.loans
            .get(employee_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Looks up a loan by id.
    pub fn find_loan(&self, loan_id: &str) -> Option<&Loan> {
        self.loans.values().flatten().find(|l| l.id == loan_id)
    }

    /// The employee's loans with status `active`.
    pub fn active_loans(&self, employee_id: &str) -> Vec<&Loan> {
        self.loans_for(employee_id)
            .iter()
            .filter(|l| l.is_active())
            .collect()
    }

    /// Creates an active loan recovered in `installment_count` installments
    /// of `ceil(principal / installment_count)` from `start_month` on.
    ///
    /// # Errors
    ///
    /// [`PayrollError::InvalidLoan`] for a non-positive principal or zero
    /// installments; [`PayrollError::Persistence`] if the store rejects it.
    pub fn create_loan(
        &mut self,
        employee_id: &str,
        principal: Decimal,
        installment_count: u32,
        start_month: PayrollMonth,
    ) -> PayrollResult<Loan> {
        if principal <= Decimal::ZERO {
            return Err(PayrollError::InvalidLoan {
                field: "principal".to_string(),
                message: format!("must be positive, got {}", principal),
            });
        }
        if installment_count == 0 {
            return Err(PayrollError::InvalidLoan {
                field: "installment_count".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let installment_amount = installment_for(principal, installment_count);
        let loan = Loan {
            id: Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            principal,
            installment_count,
            installment_amount,
            remaining_principal: principal,
            remaining_installments: installment_count,
            start_month,
            status: LoanStatus::Active,
            next_deduction_override: None,
            settlement_month: None,
            completion_type: None,
            created_at: Utc::now(),
            history: Vec::new(),
        };

        let created = loan.clone();
        self.commit(employee_id, move |loans| {
            loans.push(loan);
            Ok(())
        })?;

        info!(
            employee_id,
            loan_id = %created.id,
            principal = %principal,
            installment_amount = %installment_amount,
            start_month = %start_month,
            "Loan created"
        );
        Ok(created)
    }

    /// The advance the ledger would deduct from the employee in `month`.
    ///
    /// Read-only; calling it any number of times returns the same amount.
    pub fn monthly_deduction(&self, employee_id: &str, month: PayrollMonth) -> Decimal {
        self.loans_for(employee_id)
            .iter()
            .filter_map(|loan| loan.planned_deduction(month))
            .map(|(amount, _)| amount)
            .sum()
    }

    /// Applies the employee's deduction for `month` to every eligible loan.
    ///
    /// Each application reduces the remaining principal, appends a history
    /// entry, consumes a one-off override or a due settlement, and completes
    /// the loan at zero. Calling it twice for one month deducts twice; the
    /// payroll runner guarantees a single call per employee and month.
    pub fn apply_deduction(
        &mut self,
        employee_id: &str,
        month: PayrollMonth,
    ) -> PayrollResult<DeductionApplication> {
        let applied_at = Utc::now();

        let details = self.commit(employee_id, |loans| {
            let mut details = Vec::new();
            for loan in loans.iter_mut() {
                let Some((amount, deduction_type)) = loan.planned_deduction(month) else {
                    continue;
                };

                loan.remaining_principal -= amount;
                loan.remaining_installments =
                    installments_remaining(loan.remaining_principal, loan.installment_amount);
                loan.next_deduction_override = match deduction_type {
                    DeductionType::Regular => loan.next_deduction_override,
                    DeductionType::Modified | DeductionType::Settlement => None,
                };
                loan.history.push(LoanHistoryEntry {
                    month,
                    amount,
                    remaining_after: loan.remaining_principal,
                    deduction_type,
                    applied_at,
                });

                if loan.remaining_principal <= Decimal::ZERO {
                    loan.status = LoanStatus::Completed;
                    loan.completion_type = Some(match deduction_type {
                        DeductionType::Settlement => CompletionType::EarlySettlement,
                        DeductionType::Regular | DeductionType::Modified => {
                            CompletionType::Regular
                        }
                    });
                }
                if deduction_type == DeductionType::Settlement {
                    loan.settlement_month = None;
                }

                details.push(LoanDeduction {
                    loan_id: loan.id.clone(),
                    amount,
                    remaining_after: loan.remaining_principal,
                    deduction_type,
                });
            }
            Ok(details)
        })?;

        let total: Decimal = details.iter().map(|d| d.amount).sum();
        if !details.is_empty() {
            info!(
                employee_id,
                month = %month,
                total = %total,
                loans = details.len(),
                "Advance deduction applied"
            );
        }

        Ok(DeductionApplication {
            employee_id: employee_id.to_string(),
            month,
            total,
            details,
        })
    }

    /// Applies `action` to a loan.
    ///
    /// Returns `Ok(false)` without changing anything when the action does not
    /// apply: the loan is no longer active, or a settlement is requested on a
    /// loan with nothing left to recover.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::LoanNotFound`] for an unknown id
    /// - [`PayrollError::InvalidLoan`] for a non-positive override or
    ///   installment, or a remaining principal that is negative or larger
    ///   than the current one
    /// - [`PayrollError::Persistence`] if the store rejects the change
    pub fn modify_loan(&mut self, loan_id: &str, action: LoanAction) -> PayrollResult<bool> {
        let loan = self
            .find_loan(loan_id)
            .ok_or_else(|| PayrollError::LoanNotFound {
                loan_id: loan_id.to_string(),
            })?;

        if !loan.is_active() {
            debug!(loan_id, status = ?loan.status, "Ignoring action on inactive loan");
            return Ok(false);
        }
        if matches!(action, LoanAction::RequestSettlement { .. })
            && loan.remaining_principal <= Decimal::ZERO
        {
            return Ok(false);
        }
        validate_action(loan, &action)?;

        let employee_id = loan.employee_id.clone();
        self.commit(&employee_id, |loans| {
            let Some(loan) = loans.iter_mut().find(|l| l.id == loan_id) else {
                return Err(PayrollError::LoanNotFound {
                    loan_id: loan_id.to_string(),
                });
            };
            apply_action(loan, &action);
            Ok(())
        })?;

        info!(employee_id = %employee_id, loan_id, action = ?action, "Loan modified");
        Ok(true)
    }

    /// Counts and totals of the employee's loans, with the deduction due in `month`.
    pub fn summary(&self, employee_id: &str, month: PayrollMonth) -> LoanSummary {
        LoanSummary::from_loans(
            self.loans_for(employee_id),
            self.monthly_deduction(employee_id, month),
        )
    }

    /// Summaries of every roster employee with an active or completed loan.
    ///
    /// Loans of employees missing from the roster are left out.
    pub fn advance_report(&self, roster: &[Employee], month: PayrollMonth) -> AdvanceReport {
        let mut report = AdvanceReport::new(month);
        for employee in roster {
            let summary = self.summary(&employee.id, month);
            if summary.has_reportable_loans() {
                report.push(EmployeeAdvanceSummary {
                    employee_id: employee.id.clone(),
                    employee_name: employee.name.clone(),
                    department: employee.department.clone(),
                    summary,
                });
            }
        }
        report
    }

    /// Stages `mutate` on a copy of the employee's loans and persists the
    /// result before swapping it in. Unchanged loans are not written.
    fn commit<T>(
        &mut self,
        employee_id: &str,
        mutate: impl FnOnce(&mut Vec<Loan>) -> PayrollResult<T>,
    ) -> PayrollResult<T> {
        let current = self.loans_for(employee_id);
        let mut staged = current.to_vec();
        let outcome = mutate(&mut staged)?;

        if staged.as_slice() == current {
            return Ok(outcome);
        }

        if let Err(err) = self.store.persist(employee_id, &staged) {
            warn!(employee_id, error = %err, "Loan change rolled back");
            return Err(err.for_employee(employee_id));
        }
        self.loans.insert(employee_id.to_string(), staged);
        Ok(outcome)
    }
}

fn validate_action(loan: &Loan, action: &LoanAction) -> PayrollResult<()> {
    match action {
        LoanAction::Cancel | LoanAction::RequestSettlement { .. } => Ok(()),
        LoanAction::OverrideNextInstallment { amount } => {
            if *amount <= Decimal::ZERO {
                return Err(PayrollError::InvalidLoan {
                    field: "amount".to_string(),
                    message: format!("override must be positive, got {}", amount),
                });
            }
            Ok(())
        }
        LoanAction::Adjust {
            installment_amount,
            remaining_principal,
        } => {
            if installment_amount.is_none() && remaining_principal.is_none() {
                return Err(PayrollError::InvalidLoan {
                    field: "adjust".to_string(),
                    message: "nothing to adjust".to_string(),
                });
            }
            if let Some(amount) = installment_amount {
                if *amount <= Decimal::ZERO {
                    return Err(PayrollError::InvalidLoan {
                        field: "installment_amount".to_string(),
                        message: format!("must be positive, got {}", amount),
                    });
                }
            }
            if let Some(remaining) = remaining_principal {
                if *remaining < Decimal::ZERO || *remaining > loan.remaining_principal {
                    return Err(PayrollError::InvalidLoan {
                        field: "remaining_principal".to_string(),
                        message: format!(
                            "must be between 0 and {}, got {}",
                            loan.remaining_principal, remaining
                        ),
                    });
                }
            }
            Ok(())
        }
    }
}

fn apply_action(loan: &mut Loan, action: &LoanAction) {
    match action {
        LoanAction::Cancel => {
            loan.status = LoanStatus::Cancelled;
            loan.next_deduction_override = None;
            loan.settlement_month = None;
        }
        LoanAction::RequestSettlement { for_month } => {
            loan.settlement_month = Some(*for_month);
        }
        LoanAction::OverrideNextInstallment { amount } => {
            loan.next_deduction_override = Some(*amount);
        }
        LoanAction::Adjust {
            installment_amount,
            remaining_principal,
        } => {
            if let Some(amount) = installment_amount {
                loan.installment_amount = *amount;
            }
            if let Some(remaining) = remaining_principal {
                loan.remaining_principal = *remaining;
            }
            loan.remaining_installments =
                installments_remaining(loan.remaining_principal, loan.installment_amount);

            if loan.remaining_principal.is_zero() {
                loan.status = LoanStatus::Completed;
                loan.completion_type = Some(CompletionType::Adjustment);
                loan.next_deduction_override = None;
                loan.settlement_month = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn month(s: &str) -> PayrollMonth {
        s.parse().unwrap()
    }

    /// A store whose writes can be made to fail.
    #[derive(Clone, Default)]
    struct FlakyStore {
        failing: Arc<AtomicBool>,
    }

    impl LoanPersistence for FlakyStore {
        fn is_persistent(&self) -> bool {
            true
        }

        fn load(&self) -> Result<HashMap<String, Vec<Loan>>, PersistenceError> {
            Ok(HashMap::new())
        }

        fn persist(&self, _employee_id: &str, _loans: &[Loan]) -> Result<(), PersistenceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PersistenceError::Unavailable {
                    message: "disk full".to_string(),
                });
            }
            Ok(())
        }
    }

    fn ledger_with_loan(principal: &str, installments: u32) -> (LoanLedger, String) {
        let mut ledger = LoanLedger::in_memory();
        let loan = ledger
            .create_loan("EMP001", dec(principal), installments, month("2025-04"))
            .unwrap();
        (ledger, loan.id)
    }

    /// LL-001: installment is the principal split evenly, rounded up
    #[test]
    fn test_ll_001_create_loan() {
        let mut ledger = LoanLedger::in_memory();
        let loan = ledger
            .create_loan("EMP001", dec("10000"), 3, month("2025-04"))
            .unwrap();

        assert_eq!(loan.installment_amount, dec("3334"));
        assert_eq!(loan.remaining_principal, dec("10000"));
        assert_eq!(loan.remaining_installments, 3);
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(ledger.active_loans("EMP001").len(), 1);
    }

    /// LL-002: invalid loan parameters are rejected
    #[test]
    fn test_ll_002_create_loan_rejects_bad_input() {
        let mut ledger = LoanLedger::in_memory();
        assert!(matches!(
            ledger.create_loan("EMP001", Decimal::ZERO, 3, month("2025-04")),
            Err(PayrollError::InvalidLoan { .. })
        ));
        assert!(matches!(
            ledger.create_loan("EMP001", dec("1000"), 0, month("2025-04")),
            Err(PayrollError::InvalidLoan { .. })
        ));
        assert!(ledger.loans_for("EMP001").is_empty());
    }

    /// LL-003: nothing is deducted before the start month
    #[test]
    fn test_ll_003_no_deduction_before_start() {
        let (mut ledger, _) = ledger_with_loan("12000", 6);
        assert_eq!(ledger.monthly_deduction("EMP001", month("2025-03")), Decimal::ZERO);

        let applied = ledger.apply_deduction("EMP001", month("2025-03")).unwrap();
        assert_eq!(applied.total, Decimal::ZERO);
        assert!(applied.details.is_empty());
    }

    /// LL-004: regular installments, then settlement
    #[test]
    fn test_ll_004_installments_then_settlement() {
        let (mut ledger, loan_id) = ledger_with_loan("12000", 6);

        for m in ["2025-04", "2025-05", "2025-06"] {
            let applied = ledger.apply_deduction("EMP001", month(m)).unwrap();
            assert_eq!(applied.total, dec("2000"));
        }

        let loan = ledger.find_loan(&loan_id).unwrap();
        assert_eq!(loan.remaining_principal, dec("6000"));
        assert_eq!(loan.remaining_installments, 3);
        assert_eq!(loan.status, LoanStatus::Active);

        let changed = ledger
            .modify_loan(
                &loan_id,
                LoanAction::RequestSettlement {
                    for_month: month("2025-07"),
                },
            )
            .unwrap();
        assert!(changed);
        assert_eq!(ledger.monthly_deduction("EMP001", month("2025-07")), dec("6000"));

        let applied = ledger.apply_deduction("EMP001", month("2025-07")).unwrap();
        assert_eq!(applied.total, dec("6000"));
        assert_eq!(applied.details[0].deduction_type, DeductionType::Settlement);

        let loan = ledger.find_loan(&loan_id).unwrap();
        assert_eq!(loan.remaining_principal, Decimal::ZERO);
        assert_eq!(loan.status, LoanStatus::Completed);
        assert_eq!(loan.completion_type, Some(CompletionType::EarlySettlement));
        assert_eq!(loan.settlement_month, None);
        assert_eq!(loan.history.len(), 4);
    }

    /// LL-005: monthly deduction is read-only
    #[test]
    fn test_ll_005_monthly_deduction_is_idempotent() {
        let (mut ledger, loan_id) = ledger_with_loan("12000", 6);
        ledger
            .modify_loan(
                &loan_id,
                LoanAction::OverrideNextInstallment {
                    amount: dec("500"),
                },
            )
            .unwrap();

        let first = ledger.monthly_deduction("EMP001", month("2025-04"));
        let second = ledger.monthly_deduction("EMP001", month("2025-04"));
        assert_eq!(first, dec("500"));
        assert_eq!(first, second);
        assert_eq!(
            ledger.find_loan(&loan_id).unwrap().next_deduction_override,
            Some(dec("500"))
        );
    }

    /// LL-006: override is consumed by one application
    #[test]
    fn test_ll_006_override_consumed_once() {
        let (mut ledger, loan_id) = ledger_with_loan("12000", 6);
        ledger
            .modify_loan(
                &loan_id,
                LoanAction::OverrideNextInstallment {
                    amount: dec("500"),
                },
            )
            .unwrap();

        let applied = ledger.apply_deduction("EMP001", month("2025-04")).unwrap();
        assert_eq!(applied.total, dec("500"));
        assert_eq!(applied.details[0].deduction_type, DeductionType::Modified);

        let applied = ledger.apply_deduction("EMP001", month("2025-05")).unwrap();
        assert_eq!(applied.total, dec("2000"));
        assert_eq!(applied.details[0].deduction_type, DeductionType::Regular);
    }

    /// LL-007: the last installment is capped at the remaining principal
    #[test]
    fn test_ll_007_final_installment_capped() {
        let (mut ledger, loan_id) = ledger_with_loan("10000", 3);
        for m in ["2025-04", "2025-05"] {
            ledger.apply_deduction("EMP001", month(m)).unwrap();
        }
        let applied = ledger.apply_deduction("EMP001", month("2025-06")).unwrap();
        assert_eq!(applied.total, dec("3332"));

        let loan = ledger.find_loan(&loan_id).unwrap();
        assert_eq!(loan.status, LoanStatus::Completed);
        assert_eq!(loan.completion_type, Some(CompletionType::Regular));

        let applied = ledger.apply_deduction("EMP001", month("2025-07")).unwrap();
        assert_eq!(applied.total, Decimal::ZERO);
    }

    /// LL-008: multiple loans amortize independently
    #[test]
    fn test_ll_008_multiple_loans() {
        let mut ledger = LoanLedger::in_memory();
        ledger
            .create_loan("EMP001", dec("6000"), 3, month("2025-04"))
            .unwrap();
        ledger
            .create_loan("EMP001", dec("1000"), 1, month("2025-05"))
            .unwrap();

        assert_eq!(ledger.monthly_deduction("EMP001", month("2025-04")), dec("2000"));
        assert_eq!(ledger.monthly_deduction("EMP001", month("2025-05")), dec("3000"));

        let applied = ledger.apply_deduction("EMP001", month("2025-05")).unwrap();
        assert_eq!(applied.details.len(), 2);
        assert_eq!(applied.total, dec("3000"));
    }

    /// LL-009: actions on inactive loans are no-ops
    #[test]
    fn test_ll_009_cancelled_loan_is_inert() {
        let (mut ledger, loan_id) = ledger_with_loan("12000", 6);
        assert!(ledger.modify_loan(&loan_id, LoanAction::Cancel).unwrap());

        assert_eq!(ledger.monthly_deduction("EMP001", month("2025-04")), Decimal::ZERO);
        assert!(!ledger.modify_loan(&loan_id, LoanAction::Cancel).unwrap());
        assert!(
            !ledger
                .modify_loan(
                    &loan_id,
                    LoanAction::RequestSettlement {
                        for_month: month("2025-04")
                    }
                )
                .unwrap()
        );
        assert!(ledger.active_loans("EMP001").is_empty());
    }

    /// LL-010: unknown loan id
    #[test]
    fn test_ll_010_unknown_loan() {
        let mut ledger = LoanLedger::in_memory();
        assert!(matches!(
            ledger.modify_loan("missing", LoanAction::Cancel),
            Err(PayrollError::LoanNotFound { .. })
        ));
    }

    /// LL-011: adjusting the installment recomputes remaining installments
    #[test]
    fn test_ll_011_adjust_installment() {
        let (mut ledger, loan_id) = ledger_with_loan("12000", 6);
        ledger
            .modify_loan(
                &loan_id,
                LoanAction::Adjust {
                    installment_amount: Some(dec("5000")),
                    remaining_principal: None,
                },
            )
            .unwrap();

        let loan = ledger.find_loan(&loan_id).unwrap();
        assert_eq!(loan.installment_amount, dec("5000"));
        assert_eq!(loan.remaining_installments, 3);
    }

    /// LL-012: remaining principal may only go down
    #[test]
    fn test_ll_012_adjust_rejects_increase() {
        let (mut ledger, loan_id) = ledger_with_loan("12000", 6);
        let result = ledger.modify_loan(
            &loan_id,
            LoanAction::Adjust {
                installment_amount: None,
                remaining_principal: Some(dec("13000")),
            },
        );
        assert!(matches!(result, Err(PayrollError::InvalidLoan { .. })));
        assert_eq!(
            ledger.find_loan(&loan_id).unwrap().remaining_principal,
            dec("12000")
        );
    }

    /// LL-013: adjusting to zero completes the loan
    #[test]
    fn test_ll_013_adjust_to_zero_completes() {
        let (mut ledger, loan_id) = ledger_with_loan("12000", 6);
        ledger
            .modify_loan(
                &loan_id,
                LoanAction::Adjust {
                    installment_amount: None,
                    remaining_principal: Some(Decimal::ZERO),
                },
            )
            .unwrap();

        let loan = ledger.find_loan(&loan_id).unwrap();
        assert_eq!(loan.status, LoanStatus::Completed);
        assert_eq!(loan.completion_type, Some(CompletionType::Adjustment));
    }

    /// LL-014: non-positive override is rejected
    #[test]
    fn test_ll_014_override_must_be_positive() {
        let (mut ledger, loan_id) = ledger_with_loan("12000", 6);
        let result = ledger.modify_loan(
            &loan_id,
            LoanAction::OverrideNextInstallment {
                amount: Decimal::ZERO,
            },
        );
        assert!(matches!(result, Err(PayrollError::InvalidLoan { .. })));
    }

    /// LL-015: a failed write rolls the deduction back
    #[test]
    fn test_ll_015_persistence_failure_rolls_back() {
        let store = FlakyStore::default();
        let failing = Arc::clone(&store.failing);
        let mut ledger = LoanLedger::open(store).unwrap();
        let loan = ledger
            .create_loan("EMP001", dec("12000"), 6, month("2025-04"))
            .unwrap();

        failing.store(true, Ordering::SeqCst);
        let result = ledger.apply_deduction("EMP001", month("2025-04"));
        assert!(matches!(result, Err(PayrollError::Persistence { .. })));

        let unchanged = ledger.find_loan(&loan.id).unwrap();
        assert_eq!(unchanged.remaining_principal, dec("12000"));
        assert!(unchanged.history.is_empty());

        failing.store(false, Ordering::SeqCst);
        let applied = ledger.apply_deduction("EMP001", month("2025-04")).unwrap();
        assert_eq!(applied.total, dec("2000"));
    }

    /// LL-016: a failed write discards a new loan
    #[test]
    fn test_ll_016_persistence_failure_discards_new_loan() {
        let store = FlakyStore::default();
        store.failing.store(true, Ordering::SeqCst);
        let mut ledger = LoanLedger::open(store).unwrap();

        let result = ledger.create_loan("EMP001", dec("12000"), 6, month("2025-04"));
        assert!(matches!(result, Err(PayrollError::Persistence { .. })));
        assert!(ledger.loans_for("EMP001").is_empty());
    }

    /// LL-017: summary totals
    #[test]
    fn test_ll_017_summary() {
        let mut ledger = LoanLedger::in_memory();
        ledger
            .create_loan("EMP001", dec("1000"), 1, month("2025-04"))
            .unwrap();
        ledger
            .create_loan("EMP001", dec("6000"), 3, month("2025-04"))
            .unwrap();
        ledger.apply_deduction("EMP001", month("2025-04")).unwrap();

        let summary = ledger.summary("EMP001", month("2025-05"));
        assert_eq!(summary.active_loans, 1);
        assert_eq!(summary.completed_loans, 1);
        assert_eq!(summary.total_active_amount, dec("4000"));
        assert_eq!(summary.total_completed_amount, dec("1000"));
        assert_eq!(summary.current_month_deduction, dec("2000"));
        assert_eq!(summary.loans.len(), 2);
    }

    /// LL-018: action payloads deserialize from tagged JSON
    #[test]
    fn test_ll_018_action_deserialization() {
        let action: LoanAction = serde_json::from_str(
            r#"{"action": "request_settlement", "for_month": "2025-07"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            LoanAction::RequestSettlement {
                for_month: month("2025-07")
            }
        );

        let action: LoanAction =
            serde_json::from_str(r#"{"action": "adjust", "installment_amount": "1500"}"#).unwrap();
        assert_eq!(
            action,
            LoanAction::Adjust {
                installment_amount: Some(dec("1500")),
                remaining_principal: None,
            }
        );
    }
}
