//! Debt data structures and form loading

mod data;
pub mod loader;

pub use data::{Debt, DebtType, total_extra_payment, validate_debts};
pub use loader::{load_debts, load_debts_from_reader, load_debts_from_str, load_debts_from_value, NumberField};
