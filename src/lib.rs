//! Debt Payoff - Month-by-month amortization simulator for debt repayment plans
//!
//! This library provides:
//! - Avalanche (highest rate first) and Snowball (smallest balance first) simulation
//! - Rollover of paid-off minimums into the extra-payment pool
//! - Per-debt payoff schedules, interest totals and convergence reporting
//! - Portfolio metrics and multi-scenario strategy comparison

pub mod debt;
pub mod error;
pub mod payoff;
pub mod portfolio;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use debt::{Debt, DebtType};
pub use error::{LoadError, ValidationError};
pub use payoff::{simulate, PayoffEngine, SimulationConfig, SimulationResult, Strategy};
pub use portfolio::PortfolioMetrics;
pub use scenario::{ScenarioRunner, StrategyComparison};
