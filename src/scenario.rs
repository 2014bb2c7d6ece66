//! Scenario runner for comparing payoff plans
//!
//! Validates a debt list once, then runs any number of configurations
//! against it without re-checking the input.

use rayon::prelude::*;
use serde::Serialize;

use crate::debt::{validate_debts, Debt};
use crate::error::ValidationError;
use crate::payoff::{PayoffEngine, SimulationConfig, SimulationResult, Strategy};

/// Avalanche and Snowball results side by side
#[derive(Debug, Clone, Serialize)]
pub struct StrategyComparison {
    pub avalanche: SimulationResult,
    pub snowball: SimulationResult,
    /// Snowball interest minus Avalanche interest
    pub interest_saved: f64,
    /// Snowball months minus Avalanche months
    pub months_saved: i64,
    /// Lower interest wins, then fewer months, then Avalanche
    pub recommended: Strategy,
}

impl StrategyComparison {
    pub fn new(avalanche: SimulationResult, snowball: SimulationResult) -> Self {
        let interest_saved = snowball.total_interest_paid - avalanche.total_interest_paid;
        let months_saved = snowball.months_to_payoff as i64 - avalanche.months_to_payoff as i64;

        let recommended = if interest_saved < 0.0 {
            Strategy::Snowball
        } else if interest_saved > 0.0 || months_saved >= 0 {
            Strategy::Avalanche
        } else {
            Strategy::Snowball
        };

        Self {
            avalanche,
            snowball,
            interest_saved,
            months_saved,
            recommended,
        }
    }

    pub fn recommended_result(&self) -> &SimulationResult {
        match self.recommended {
            Strategy::Avalanche => &self.avalanche,
            Strategy::Snowball => &self.snowball,
        }
    }
}

/// Pre-validated scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(debts)?;
///
/// let comparison = runner.compare(&SimulationConfig::new(Strategy::Avalanche, 250.0))?;
/// for extra in [0.0, 100.0, 250.0] {
///     let result = runner.run(&SimulationConfig::new(Strategy::Avalanche, extra))?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    debts: Vec<Debt>,
}

impl ScenarioRunner {
    /// Create a runner, rejecting an invalid debt list up front
    pub fn new(debts: Vec<Debt>) -> Result<Self, ValidationError> {
        validate_debts(&debts)?;
        Ok(Self { debts })
    }

    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    /// Run a single simulation with the given config
    pub fn run(&self, config: &SimulationConfig) -> Result<SimulationResult, ValidationError> {
        config.validate()?;
        Ok(PayoffEngine::new(config.clone()).run(&self.debts))
    }

    /// Run both strategies from the same base config; its `strategy` is ignored
    pub fn compare(&self, base: &SimulationConfig) -> Result<StrategyComparison, ValidationError> {
        let avalanche = self.run(&SimulationConfig { strategy: Strategy::Avalanche, ..base.clone() })?;
        let snowball = self.run(&SimulationConfig { strategy: Strategy::Snowball, ..base.clone() })?;

        let comparison = StrategyComparison::new(avalanche, snowball);
        log::info!(
            "compared strategies for {} debts: {} recommended, {:.2} interest difference",
            self.debts.len(),
            comparison.recommended,
            comparison.interest_saved
        );
        Ok(comparison)
    }

    /// Run many configs in parallel; results keep the order of `configs`
    pub fn run_scenarios(&self, configs: &[SimulationConfig]) -> Vec<Result<SimulationResult, ValidationError>> {
        log::info!("running {} scenarios over {} debts", configs.len(), self.debts.len());
        configs.par_iter().map(|config| self.run(config)).collect()
    }

    /// One run per extra-payment amount, all with `strategy`
    pub fn extra_payment_sweep(
        &self,
        strategy: Strategy,
        extras: &[f64],
    ) -> Vec<Result<SimulationResult, ValidationError>> {
        let configs: Vec<SimulationConfig> = extras
            .iter()
            .map(|&extra| SimulationConfig {
                detailed_output: false,
                ..SimulationConfig::new(strategy, extra)
            })
            .collect();
        self.run_scenarios(&configs)
    }
}
