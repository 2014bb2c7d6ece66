//! Error types for debt input validation and loading

use thiserror::Error;

/// Malformed simulation input, raised before any month is simulated
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("debts: at least one debt is required")]
    EmptyDebtList,

    #[error("id: debt id {0} appears more than once")]
    DuplicateId(u64),

    #[error("balance: debt {id} must have a positive, finite balance (got {value})")]
    InvalidBalance { id: u64, value: f64 },

    #[error("annual_rate: debt {id} must have a non-negative, finite rate (got {value})")]
    InvalidRate { id: u64, value: f64 },

    #[error("min_payment: debt {id} must have a non-negative, finite minimum payment (got {value})")]
    InvalidMinPayment { id: u64, value: f64 },

    #[error("extra_payment: debt {id} must have a non-negative, finite extra payment (got {value})")]
    InvalidDebtExtraPayment { id: u64, value: f64 },

    #[error("extra_monthly_payment: must be non-negative and finite (got {0})")]
    InvalidExtraPayment(f64),

    #[error("max_months: must be at least 1")]
    InvalidMaxMonths,

    #[error("strategy: unsupported value '{0}' (expected 'avalanche' or 'snowball')")]
    UnknownStrategy(String),
}

/// Failure while reading debts from an external source
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read debts: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed debt JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field}: debt {index} has a non-numeric value '{value}'")]
    InvalidNumber {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
