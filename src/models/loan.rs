//! Salary-advance loan records.
//!
//! A [`Loan`] is amortized from pay in fixed installments. The ledger in
//! [`crate::ledger`] owns every state transition; the types here only describe
//! the records and the per-month arithmetic they support.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::PayrollMonth;

/// Lifecycle state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Still being recovered from pay.
    Active,
    /// Remaining principal reached zero.
    Completed,
    /// Stopped by an explicit cancellation.
    Cancelled,
}

/// How a deduction amount was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionType {
    /// The fixed installment.
    Regular,
    /// A one-off override of the next installment.
    Modified,
    /// Full payoff of the remaining principal.
    Settlement,
}

/// How a loan reached `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionType {
    /// Paid down by installments.
    Regular,
    /// Paid off by a requested settlement.
    EarlySettlement,
    /// Remaining principal corrected to zero.
    Adjustment,
}

/// One applied deduction in a loan's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanHistoryEntry {
    /// The payroll month the deduction was taken in.
    pub month: PayrollMonth,
    /// Amount deducted.
    pub amount: Decimal,
    /// Remaining principal after the deduction.
    pub remaining_after: Decimal,
    /// How the amount was chosen.
    pub deduction_type: DeductionType,
    /// When the deduction was applied.
    pub applied_at: DateTime<Utc>,
}

/// A salary advance recovered in installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique loan identifier.
    pub id: String,
    /// The borrowing employee.
    pub employee_id: String,
    /// Amount advanced.
    pub principal: Decimal,
    /// Number of installments agreed at creation.
    pub installment_count: u32,
    /// Fixed installment, `ceil(principal / installment_count)`.
    pub installment_amount: Decimal,
    /// Principal still to recover.
    pub remaining_principal: Decimal,
    /// Installments still to take at the current installment amount.
    pub remaining_installments: u32,
    /// First month a deduction may be taken.
    pub start_month: PayrollMonth,
    /// Lifecycle state.
    pub status: LoanStatus,
    /// One-off amount for the next deduction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_deduction_override: Option<Decimal>,
    /// Month in which the remaining principal is to be settled in full.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_month: Option<PayrollMonth>,
    /// Set once the loan is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_type: Option<CompletionType>,
    /// When the loan was created.
    pub created_at: DateTime<Utc>,
    /// Applied deductions, oldest first.
    #[serde(default)]
    pub history: Vec<LoanHistoryEntry>,
}

impl Loan {
    /// Returns true while the loan is being recovered.
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// True iff `month` is on or after the start month and principal remains.
    ///
    /// Status is checked separately by [`Loan::planned_deduction`].
    pub fn is_eligible_this_month(&self, month: PayrollMonth) -> bool {
        month >= self.start_month && self.remaining_principal > Decimal::ZERO
    }

    /// True if a settlement has been requested for `month` or an earlier month.
    pub fn settlement_due(&self, month: PayrollMonth) -> bool {
        self.settlement_month.is_some_and(|m| m <= month)
    }

    /// The amount and type this loan would deduct in `month`, without mutating it.
    ///
    /// Precedence: settlement, then one-off override, then the regular
    /// installment. Returns `None` for inactive or ineligible loans.
    pub fn planned_deduction(&self, month: PayrollMonth) -> Option<(Decimal, DeductionType)> {
        if !self.is_active() || !self.is_eligible_this_month(month) {
            return None;
        }

        if self.settlement_due(month) {
            return Some((self.remaining_principal, DeductionType::Settlement));
        }

        if self.settlement_month.is_none() {
            if let Some(amount) = self.next_deduction_override {
                return Some((amount.min(self.remaining_principal), DeductionType::Modified));
            }
        }

        Some((
            self.installment_amount.min(self.remaining_principal),
            DeductionType::Regular,
        ))
    }
}

/// Installment amount for a principal split into `installments` parts, rounded up.
pub fn installment_for(principal: Decimal, installments: u32) -> Decimal {
    if installments == 0 {
        return principal.ceil();
    }
    (principal / Decimal::from(installments)).ceil()
}

/// Installments needed to recover `remaining` at `installment_amount` each, rounded up.
pub fn installments_remaining(remaining: Decimal, installment_amount: Decimal) -> u32 {
    if remaining <= Decimal::ZERO || installment_amount <= Decimal::ZERO {
        return 0;
    }
    (remaining / installment_amount)
        .ceil()
        .to_u32()
        .unwrap_or(u32::MAX)
}
