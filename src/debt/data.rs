//! Debt data structures matching the debt manager form

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::payoff::months_to_repay;

/// Category of a debt, as offered by the debt manager form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DebtType {
    #[serde(rename = "Home Loan")]
    HomeLoan,
    #[serde(rename = "Car Loan")]
    CarLoan,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Education Loan")]
    EducationLoan,
    #[serde(rename = "Personal Loan")]
    PersonalLoan,
    #[default]
    Other,
}

impl DebtType {
    /// Parse the form label; unknown labels fall back to `Other`
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Home Loan" => DebtType::HomeLoan,
            "Car Loan" => DebtType::CarLoan,
            "Credit Card" => DebtType::CreditCard,
            "Education Loan" => DebtType::EducationLoan,
            "Personal Loan" => DebtType::PersonalLoan,
            _ => DebtType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DebtType::HomeLoan => "Home Loan",
            DebtType::CarLoan => "Car Loan",
            DebtType::CreditCard => "Credit Card",
            DebtType::EducationLoan => "Education Loan",
            DebtType::PersonalLoan => "Personal Loan",
            DebtType::Other => "Other",
        }
    }
}

/// A single outstanding debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    /// Identifier, unique within one simulation run
    pub id: u64,

    /// Display label
    pub name: String,

    /// Category from the debt manager form
    #[serde(default)]
    pub debt_type: DebtType,

    /// Outstanding principal
    pub balance: f64,

    /// Annual percentage rate (18.9 means 18.9% APR)
    pub annual_rate: f64,

    /// Contractual minimum monthly payment
    pub min_payment: f64,

    /// Extra amount pledged alongside this debt; it joins the shared monthly pool
    #[serde(default)]
    pub extra_payment: f64,

    /// Remaining installments as stated by the lender (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emis_left: Option<u32>,
}

impl Debt {
    /// Create a new debt of type `Other`
    pub fn new(id: u64, name: impl Into<String>, balance: f64, annual_rate: f64, min_payment: f64) -> Self {
        Self {
            id,
            name: name.into(),
            debt_type: DebtType::Other,
            balance,
            annual_rate,
            min_payment,
            extra_payment: 0.0,
            emis_left: None,
        }
    }

    pub fn with_type(mut self, debt_type: DebtType) -> Self {
        self.debt_type = debt_type;
        self
    }

    pub fn with_extra_payment(mut self, extra_payment: f64) -> Self {
        self.extra_payment = extra_payment;
        self
    }

    pub fn with_emis_left(mut self, emis_left: u32) -> Self {
        self.emis_left = Some(emis_left);
        self
    }

    /// Monthly periodic rate as a decimal (APR / 100 / 12)
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 100.0 / 12.0
    }

    /// Interest accrued on the starting balance in one month
    pub fn monthly_interest(&self) -> f64 {
        self.balance * self.monthly_rate()
    }

    /// Whether the minimum payment at least matches the first month's interest.
    /// A debt that fails this only shrinks while it is receiving the extra pool.
    pub fn covers_interest(&self) -> bool {
        self.min_payment >= self.monthly_interest()
    }

    /// Months the minimum alone needs to clear the balance, None if it never does
    pub fn projected_months(&self) -> Option<u32> {
        months_to_repay(self.balance, self.annual_rate, self.min_payment)
    }

    /// False when the stated remaining installments disagree with the projection
    pub fn tenure_consistent(&self) -> bool {
        match self.emis_left {
            Some(stated) => self.projected_months() == Some(stated),
            None => true,
        }
    }

    /// Check this debt's numeric fields
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.balance.is_finite() || self.balance <= 0.0 {
            return Err(ValidationError::InvalidBalance { id: self.id, value: self.balance });
        }
        if !self.annual_rate.is_finite() || self.annual_rate < 0.0 {
            return Err(ValidationError::InvalidRate { id: self.id, value: self.annual_rate });
        }
        if !self.min_payment.is_finite() || self.min_payment < 0.0 {
            return Err(ValidationError::InvalidMinPayment { id: self.id, value: self.min_payment });
        }
        if !self.extra_payment.is_finite() || self.extra_payment < 0.0 {
            return Err(ValidationError::InvalidDebtExtraPayment { id: self.id, value: self.extra_payment });
        }
        Ok(())
    }
}

/// Sum of the extra amounts pledged across all debts
pub fn total_extra_payment(debts: &[Debt]) -> f64 {
    debts.iter().map(|d| d.extra_payment).sum()
}

/// Validate a whole debt list: non-empty, unique ids, every debt well formed.
/// The first violation found is reported.
pub fn validate_debts(debts: &[Debt]) -> Result<(), ValidationError> {
    if debts.is_empty() {
        return Err(ValidationError::EmptyDebtList);
    }

    let mut seen = HashSet::with_capacity(debts.len());
    for debt in debts {
        if !seen.insert(debt.id) {
            return Err(ValidationError::DuplicateId(debt.id));
        }
        debt.validate()?;
    }

    Ok(())
}
