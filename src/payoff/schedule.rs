//! Output structures for payoff simulations

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::engine::Strategy;

/// One debt's movement within one simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtMonthRow {
    pub month: u32,
    pub debt_id: u64,
    pub opening_balance: f64,
    pub interest: f64,
    pub payment: f64,
    pub closing_balance: f64,
    /// Whether this debt received the extra-payment pool
    pub targeted: bool,
}

/// Aggregate view of one simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    pub month: u32,

    /// Extra budget plus rolled-over minimums available this month
    pub extra_pool: f64,

    /// Debt at the head of the strategy order
    pub target_debt_id: Option<u64>,

    pub interest: f64,
    pub payment: f64,

    /// Outstanding balance across all debts at month end
    pub total_balance: f64,

    /// Rows for the debts that were open at the start of the month
    pub debts: Vec<DebtMonthRow>,
}

impl MonthRow {
    pub fn new(month: u32, extra_pool: f64, target_debt_id: Option<u64>) -> Self {
        Self {
            month,
            extra_pool,
            target_debt_id,
            interest: 0.0,
            payment: 0.0,
            total_balance: 0.0,
            debts: Vec::new(),
        }
    }

    /// Add a debt row and roll its amounts into the month totals
    pub fn add_debt_row(&mut self, row: DebtMonthRow) {
        self.interest += row.interest;
        self.payment += row.payment;
        self.debts.push(row);
    }
}

/// When a single debt was cleared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffEntry {
    pub debt_id: u64,
    pub name: String,
    /// `None` when the debt was still open at the month cap
    pub payoff_month: Option<u32>,
    pub interest_paid: f64,
}

/// Complete simulation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub strategy: Strategy,

    /// Last simulated month
    pub months_to_payoff: u32,

    pub total_interest_paid: f64,

    /// Sum of all payments applied
    pub total_paid: f64,

    /// Whether every debt reached zero before the month cap
    pub converged: bool,

    /// Balance left outstanding at the end of the run (zero when converged)
    pub remaining_balance: f64,

    /// Payoff order, ascending by payoff month; unpaid debts last in input order
    pub schedule: Vec<PayoffEntry>,

    /// Month-by-month ledger, empty unless detailed output was requested
    pub timeline: Vec<MonthRow>,
}

impl SimulationResult {
    /// Date the last debt is cleared when the first payment falls one month after `start`.
    /// `None` if the run did not converge.
    pub fn payoff_date(&self, start: NaiveDate) -> Option<NaiveDate> {
        if !self.converged {
            return None;
        }
        start.checked_add_months(Months::new(self.months_to_payoff))
    }

    /// Years and leftover months until debt freedom, for display
    pub fn duration_years_months(&self) -> (u32, u32) {
        (self.months_to_payoff / 12, self.months_to_payoff % 12)
    }

    pub fn entry(&self, debt_id: u64) -> Option<&PayoffEntry> {
        self.schedule.iter().find(|e| e.debt_id == debt_id)
    }

    /// Debt ids in payoff order
    pub fn payoff_order(&self) -> Vec<u64> {
        self.schedule.iter().map(|e| e.debt_id).collect()
    }
}
