//! Summary metrics across a list of debts

use serde::Serialize;

use crate::debt::{total_extra_payment, Debt};

/// Headline figures shown above the payoff strategies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioMetrics {
    pub debt_count: usize,
    pub total_outstanding: f64,
    pub total_min_payment: f64,
    /// Extra amounts pledged per debt, added to the monthly pool
    pub total_extra_payment: f64,
    /// Balance-weighted average APR
    pub weighted_rate: f64,
    /// Interest all debts accrue in their first month
    pub first_month_interest: f64,
    /// Debts whose minimum does not cover their first month's interest
    pub uncovered_debts: Vec<u64>,
    /// Debts whose stated installments left disagree with their minimum's projection
    pub tenure_mismatches: Vec<u64>,
}

impl PortfolioMetrics {
    pub fn from_debts(debts: &[Debt]) -> Self {
        let total_outstanding: f64 = debts.iter().map(|d| d.balance).sum();
        let total_min_payment: f64 = debts.iter().map(|d| d.min_payment).sum();
        let weighted_rate = if total_outstanding > 0.0 {
            debts.iter().map(|d| d.balance * d.annual_rate).sum::<f64>() / total_outstanding
        } else {
            0.0
        };

        Self {
            debt_count: debts.len(),
            total_outstanding,
            total_min_payment,
            total_extra_payment: total_extra_payment(debts),
            weighted_rate,
            first_month_interest: debts.iter().map(Debt::monthly_interest).sum(),
            uncovered_debts: debts
                .iter()
                .filter(|d| !d.covers_interest())
                .map(|d| d.id)
                .collect(),
            tenure_mismatches: debts
                .iter()
                .filter(|d| !d.tenure_consistent())
                .map(|d| d.id)
                .collect(),
        }
    }
}
