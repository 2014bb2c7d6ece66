//! Payoff simulation engine for Avalanche and Snowball strategies

mod state;
mod engine;
mod schedule;
pub mod emi;

pub use state::{DebtState, PayoffState};
pub use engine::{simulate, PayoffEngine, SimulationConfig, Strategy, DEFAULT_MAX_MONTHS};
pub use schedule::{DebtMonthRow, MonthRow, PayoffEntry, SimulationResult};
pub use emi::{emi, months_to_repay};
