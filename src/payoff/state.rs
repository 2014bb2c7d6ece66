//! Working state owned by a single simulation run

use crate::debt::Debt;

/// Running figures for one debt during a simulation
#[derive(Debug, Clone)]
pub struct DebtState {
    /// Position of the debt in the caller's input list
    pub index: usize,

    pub debt_id: u64,

    /// Annual percentage rate copied from the input
    pub annual_rate: f64,

    /// Monthly minimum copied from the input
    pub min_payment: f64,

    /// Outstanding balance, never negative
    pub remaining_balance: f64,

    /// First month the balance reached zero
    pub payoff_month: Option<u32>,

    /// Interest accrued so far
    pub interest_accrued: f64,

    /// Payments applied so far
    pub total_paid: f64,
}

impl DebtState {
    pub fn is_open(&self) -> bool {
        self.remaining_balance > 0.0
    }

    /// Accrue one month of interest onto the balance and return the amount
    pub fn accrue_interest(&mut self) -> f64 {
        let interest = self.remaining_balance * (self.annual_rate / 100.0 / 12.0);
        self.remaining_balance += interest;
        self.interest_accrued += interest;
        interest
    }

    /// Apply a payment capped at the balance owed; any surplus is discarded.
    /// Returns the amount actually applied.
    pub fn apply_payment(&mut self, payment: f64, month: u32) -> f64 {
        let applied = payment.min(self.remaining_balance).max(0.0);
        self.remaining_balance -= applied;
        self.total_paid += applied;

        if self.remaining_balance <= 0.0 {
            self.remaining_balance = 0.0;
            if self.payoff_month.is_none() {
                self.payoff_month = Some(month);
            }
        }

        applied
    }
}

/// State of all debts at a point in the simulation
#[derive(Debug, Clone)]
pub struct PayoffState {
    /// Last simulated month (0 before the first month)
    pub month: u32,

    /// One entry per input debt, in input order
    pub debts: Vec<DebtState>,
}

impl PayoffState {
    /// Initialize working copies from the input debts
    pub fn from_debts(debts: &[Debt]) -> Self {
        Self {
            month: 0,
            debts: debts
                .iter()
                .enumerate()
                .map(|(index, debt)| DebtState {
                    index,
                    debt_id: debt.id,
                    annual_rate: debt.annual_rate,
                    min_payment: debt.min_payment,
                    remaining_balance: debt.balance,
                    payoff_month: None,
                    interest_accrued: 0.0,
                    total_paid: 0.0,
                })
                .collect(),
        }
    }

    pub fn advance_month(&mut self) {
        self.month += 1;
    }

    pub fn any_open(&self) -> bool {
        self.debts.iter().any(DebtState::is_open)
    }

    /// Sum of minimum payments freed by debts already paid off
    pub fn freed_minimums(&self) -> f64 {
        self.debts
            .iter()
            .filter(|d| !d.is_open())
            .map(|d| d.min_payment)
            .sum()
    }

    pub fn total_balance(&self) -> f64 {
        self.debts.iter().map(|d| d.remaining_balance).sum()
    }

    pub fn total_interest(&self) -> f64 {
        self.debts.iter().map(|d| d.interest_accrued).sum()
    }

    pub fn total_paid(&self) -> f64 {
        self.debts.iter().map(|d| d.total_paid).sum()
    }
}
