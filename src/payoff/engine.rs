//! Core month-by-month payoff engine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::debt::{validate_debts, Debt};
use crate::error::ValidationError;
use super::state::{DebtState, PayoffState};
use super::schedule::{DebtMonthRow, MonthRow, PayoffEntry, SimulationResult};

/// Safety cap on simulated months (50 years)
pub const DEFAULT_MAX_MONTHS: u32 = 600;

/// Ordering that decides which open debt receives the extra-payment pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest annual rate first
    Avalanche,
    /// Smallest remaining balance first
    Snowball,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Avalanche, Strategy::Snowball];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Avalanche => "avalanche",
            Strategy::Snowball => "snowball",
        }
    }

    /// Input positions of the open debts, head first.
    /// Stable: ties keep input order.
    pub fn order(&self, debts: &[DebtState]) -> Vec<usize> {
        let mut open: Vec<&DebtState> = debts.iter().filter(|d| d.is_open()).collect();

        match self {
            Strategy::Avalanche => open.sort_by(|a, b| b.annual_rate.total_cmp(&a.annual_rate)),
            Strategy::Snowball => {
                open.sort_by(|a, b| a.remaining_balance.total_cmp(&b.remaining_balance))
            }
        }

        open.into_iter().map(|d| d.index).collect()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avalanche" => Ok(Strategy::Avalanche),
            "snowball" => Ok(Strategy::Snowball),
            _ => Err(ValidationError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Budget above the minimums, applied to the targeted debt each month
    pub extra_monthly_payment: f64,

    pub strategy: Strategy,

    /// Month cap guaranteeing termination
    pub max_months: u32,

    /// Add the minimums of paid-off debts to the extra pool from the following month
    pub rollover: bool,

    /// Record the month-by-month ledger on the result
    pub detailed_output: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            extra_monthly_payment: 0.0,
            strategy: Strategy::Avalanche,
            max_months: DEFAULT_MAX_MONTHS,
            rollover: true,
            detailed_output: true,
        }
    }
}

impl SimulationConfig {
    pub fn new(strategy: Strategy, extra_monthly_payment: f64) -> Self {
        Self {
            strategy,
            extra_monthly_payment,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.extra_monthly_payment.is_finite() || self.extra_monthly_payment < 0.0 {
            return Err(ValidationError::InvalidExtraPayment(self.extra_monthly_payment));
        }
        if self.max_months == 0 {
            return Err(ValidationError::InvalidMaxMonths);
        }
        Ok(())
    }
}

/// Main payoff engine
#[derive(Debug, Clone)]
pub struct PayoffEngine {
    config: SimulationConfig,
}

impl PayoffEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Validate the inputs, then simulate until every debt is cleared or the cap is hit
    pub fn simulate(&self, debts: &[Debt]) -> Result<SimulationResult, ValidationError> {
        validate_debts(debts)?;
        self.config.validate()?;
        Ok(self.run(debts))
    }

    /// Simulation loop; callers must have validated `debts` and the config
    pub(crate) fn run(&self, debts: &[Debt]) -> SimulationResult {
        let mut state = PayoffState::from_debts(debts);
        let mut timeline = Vec::new();

        while state.any_open() && state.month < self.config.max_months {
            state.advance_month();

            let row = self.simulate_month(&mut state);
            if self.config.detailed_output {
                timeline.push(row);
            }
        }

        self.build_result(debts, &state, timeline)
    }

    /// Pool, target, interest and payments for the current month
    fn simulate_month(&self, state: &mut PayoffState) -> MonthRow {
        let month = state.month;

        // Minimums freed in earlier months join the pool; this month's payoffs wait a month
        let rolled_over = if self.config.rollover { state.freed_minimums() } else { 0.0 };
        let extra_pool = self.config.extra_monthly_payment + rolled_over;

        let target = self.config.strategy.order(&state.debts).first().copied();
        let target_debt_id = target.map(|i| state.debts[i].debt_id);
        let mut row = MonthRow::new(month, extra_pool, target_debt_id);

        for debt in state.debts.iter_mut().filter(|d| d.is_open()) {
            let opening_balance = debt.remaining_balance;
            let interest = debt.accrue_interest();

            let targeted = target == Some(debt.index);
            let payment = if targeted { debt.min_payment + extra_pool } else { debt.min_payment };
            let applied = debt.apply_payment(payment, month);

            if debt.payoff_month == Some(month) {
                log::debug!("debt {} paid off in month {}", debt.debt_id, month);
            }

            row.add_debt_row(DebtMonthRow {
                month,
                debt_id: debt.debt_id,
                opening_balance,
                interest,
                payment: applied,
                closing_balance: debt.remaining_balance,
                targeted,
            });
        }

        row.total_balance = state.total_balance();
        row
    }

    fn build_result(&self, debts: &[Debt], state: &PayoffState, timeline: Vec<MonthRow>) -> SimulationResult {
        let mut schedule: Vec<PayoffEntry> = state
            .debts
            .iter()
            .zip(debts)
            .map(|(s, d)| PayoffEntry {
                debt_id: s.debt_id,
                name: d.name.clone(),
                payoff_month: s.payoff_month,
                interest_paid: s.interest_accrued,
            })
            .collect();
        // Stable: same-month payoffs and unpaid debts keep input order
        schedule.sort_by_key(|e| (e.payoff_month.is_none(), e.payoff_month));

        let converged = !state.any_open();
        let remaining_balance = state.total_balance();
        if !converged {
            log::warn!(
                "{} payoff did not converge within {} months; {:.2} still outstanding",
                self.config.strategy,
                self.config.max_months,
                remaining_balance
            );
        }

        SimulationResult {
            strategy: self.config.strategy,
            months_to_payoff: state.month,
            total_interest_paid: state.total_interest(),
            total_paid: state.total_paid(),
            converged,
            remaining_balance,
            schedule,
            timeline,
        }
    }
}

/// Simulate `debts` under `config`
pub fn simulate(debts: &[Debt], config: &SimulationConfig) -> Result<SimulationResult, ValidationError> {
    PayoffEngine::new(config.clone()).simulate(debts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::emi::months_to_repay;
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use proptest::collection::vec;

    fn two_debts() -> Vec<Debt> {
        vec![
            Debt::new(1, "A", 1000.0, 20.0, 50.0),
            Debt::new(2, "B", 500.0, 10.0, 50.0),
        ]
    }

    fn config(strategy: Strategy, extra: f64) -> SimulationConfig {
        SimulationConfig::new(strategy, extra)
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("avalanche".parse::<Strategy>(), Ok(Strategy::Avalanche));
        assert_eq!(" Snowball ".parse::<Strategy>(), Ok(Strategy::Snowball));
        assert_eq!(
            "highest-first".parse::<Strategy>(),
            Err(ValidationError::UnknownStrategy("highest-first".to_string()))
        );
        assert_eq!(Strategy::Snowball.to_string(), "snowball");
    }

    #[test]
    fn test_avalanche_targets_highest_rate_first() {
        let result = simulate(&two_debts(), &config(Strategy::Avalanche, 100.0)).unwrap();

        assert!(result.converged);
        assert_eq!(result.timeline[0].target_debt_id, Some(1));
        assert_eq!(result.payoff_order(), vec![1, 2]);
        assert_eq!(result.entry(1).unwrap().payoff_month, Some(8));
        assert_eq!(result.entry(2).unwrap().payoff_month, Some(9));
        assert_eq!(result.months_to_payoff, 9);
    }

    #[test]
    fn test_snowball_targets_smallest_balance_first() {
        let result = simulate(&two_debts(), &config(Strategy::Snowball, 100.0)).unwrap();

        assert!(result.converged);
        assert_eq!(result.timeline[0].target_debt_id, Some(2));
        assert_eq!(result.payoff_order(), vec![2, 1]);
        assert_eq!(result.entry(2).unwrap().payoff_month, Some(4));
    }

    #[test]
    fn test_avalanche_pays_less_interest_than_snowball() {
        let avalanche = simulate(&two_debts(), &config(Strategy::Avalanche, 100.0)).unwrap();
        let snowball = simulate(&two_debts(), &config(Strategy::Snowball, 100.0)).unwrap();
        assert!(avalanche.total_interest_paid < snowball.total_interest_paid);
    }

    #[test]
    fn test_single_debt_scenario() {
        let debts = vec![Debt::new(1, "Personal loan", 56_679.0, 18.0, 5000.0)];
        let result = simulate(&debts, &config(Strategy::Avalanche, 0.0)).unwrap();

        assert!(result.converged);
        assert!((12..=13).contains(&result.months_to_payoff), "got {}", result.months_to_payoff);
        assert!(result.total_interest_paid > 0.0);
        let payoff_month = result.schedule[0].payoff_month.unwrap();
        assert!(payoff_month <= result.months_to_payoff);
        assert_relative_eq!(result.total_paid, 56_679.0 + result.total_interest_paid, max_relative = 1e-9);
    }

    #[test]
    fn test_single_debt_matches_closed_form_tenure() {
        let cases = [(56_679.0, 18.0, 5000.0), (250_000.0, 9.5, 5200.0), (1200.0, 0.0, 100.0)];
        for (balance, rate, payment) in cases {
            let debts = vec![Debt::new(1, "Loan", balance, rate, payment)];
            let result = simulate(&debts, &SimulationConfig::default()).unwrap();
            assert_eq!(Some(result.months_to_payoff), months_to_repay(balance, rate, payment));
        }
    }

    #[test]
    fn test_non_convergent_debt_stops_at_cap() {
        let debts = vec![Debt::new(1, "Payday", 100_000.0, 36.0, 10.0)];
        let result = simulate(&debts, &SimulationConfig::default()).unwrap();

        assert!(!result.converged);
        assert_eq!(result.months_to_payoff, DEFAULT_MAX_MONTHS);
        assert_eq!(result.timeline.len(), DEFAULT_MAX_MONTHS as usize);
        assert!(result.remaining_balance > 100_000.0);
        assert!(result.remaining_balance.is_finite());
        assert_eq!(result.schedule[0].payoff_month, None);
        assert!(result.timeline.iter().all(|m| m.total_balance >= 0.0));
    }

    #[test]
    fn test_custom_cap_is_respected() {
        let debts = vec![Debt::new(1, "Slow", 10_000.0, 12.0, 100.0)];
        let cfg = SimulationConfig { max_months: 24, ..Default::default() };
        let result = simulate(&debts, &cfg).unwrap();
        assert!(!result.converged);
        assert_eq!(result.months_to_payoff, 24);
    }

    #[test]
    fn test_rollover_starts_the_following_month() {
        // B clears in month 1; its 40 joins the pool from month 2
        let debts = vec![
            Debt::new(1, "A", 1000.0, 0.0, 100.0),
            Debt::new(2, "B", 30.0, 0.0, 40.0),
        ];
        let result = simulate(&debts, &config(Strategy::Snowball, 0.0)).unwrap();

        assert_eq!(result.entry(2).unwrap().payoff_month, Some(1));
        assert_eq!(result.timeline[0].extra_pool, 0.0);
        assert_eq!(result.timeline[1].extra_pool, 40.0);
        // Surplus in month 1 was discarded, not redirected to A
        assert_eq!(result.timeline[0].debts[0].payment, 100.0);
        assert_eq!(result.timeline[0].debts[1].payment, 30.0);
        assert_eq!(result.timeline[1].debts[0].payment, 140.0);
    }

    #[test]
    fn test_rollover_accelerates_payoff() {
        let debts = vec![
            Debt::new(1, "Card", 3000.0, 22.0, 90.0),
            Debt::new(2, "Store card", 600.0, 25.0, 40.0),
            Debt::new(3, "Car", 8000.0, 7.0, 220.0),
        ];

        for strategy in Strategy::ALL {
            let with_rollover = simulate(&debts, &config(strategy, 150.0)).unwrap();
            let without = simulate(
                &debts,
                &SimulationConfig { rollover: false, ..config(strategy, 150.0) },
            )
            .unwrap();

            assert!(with_rollover.months_to_payoff <= without.months_to_payoff);
            assert!(with_rollover.months_to_payoff < without.months_to_payoff, "{}", strategy);
            assert!(with_rollover.total_interest_paid < without.total_interest_paid);
        }
    }

    #[test]
    fn test_zero_extra_without_payoffs_keeps_pool_empty() {
        let debts = vec![
            Debt::new(1, "A", 5000.0, 10.0, 100.0),
            Debt::new(2, "B", 5000.0, 10.0, 100.0),
        ];
        let cfg = SimulationConfig { max_months: 12, ..Default::default() };
        let result = simulate(&debts, &cfg).unwrap();
        assert!(result.timeline.iter().all(|m| m.extra_pool == 0.0));
    }

    #[test]
    fn test_same_month_payoffs_share_month_and_roll_over_together() {
        let debts = vec![
            Debt::new(1, "A", 100.0, 0.0, 100.0),
            Debt::new(2, "B", 100.0, 0.0, 100.0),
            Debt::new(3, "C", 1000.0, 0.0, 50.0),
        ];
        let result = simulate(&debts, &config(Strategy::Avalanche, 0.0)).unwrap();

        assert_eq!(result.entry(1).unwrap().payoff_month, Some(1));
        assert_eq!(result.entry(2).unwrap().payoff_month, Some(1));
        assert_eq!(result.timeline[1].extra_pool, 200.0);
        // Month 1: C 1000 -> 950. Month 2: C pays 250 -> 700, then 450, 200, 0.
        assert_eq!(result.entry(3).unwrap().payoff_month, Some(5));
        assert_eq!(result.payoff_order(), vec![1, 2, 3]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let debts = vec![
            Debt::new(5, "First", 800.0, 15.0, 30.0),
            Debt::new(3, "Second", 800.0, 15.0, 30.0),
        ];
        for strategy in Strategy::ALL {
            let result = simulate(&debts, &config(strategy, 200.0)).unwrap();
            assert_eq!(result.timeline[0].target_debt_id, Some(5));
            assert_eq!(result.payoff_order(), vec![5, 3]);
        }
    }

    #[test]
    fn test_unpaid_debts_sort_last_in_input_order() {
        let debts = vec![
            Debt::new(1, "Stuck A", 50_000.0, 30.0, 10.0),
            Debt::new(2, "Small", 100.0, 0.0, 100.0),
            Debt::new(3, "Stuck B", 50_000.0, 30.0, 10.0),
        ];
        let cfg = SimulationConfig { max_months: 6, ..Default::default() };
        let result = simulate(&debts, &cfg).unwrap();

        assert!(!result.converged);
        assert_eq!(result.payoff_order(), vec![2, 1, 3]);
        assert_eq!(result.schedule[1].payoff_month, None);
        assert_eq!(result.schedule[2].payoff_month, None);
    }

    #[test]
    fn test_invalid_input_fails_before_simulating() {
        assert_eq!(
            simulate(&[], &SimulationConfig::default()),
            Err(ValidationError::EmptyDebtList)
        );

        let negative = vec![Debt::new(4, "Bad", -1.0, 5.0, 10.0)];
        assert_eq!(
            simulate(&negative, &SimulationConfig::default()),
            Err(ValidationError::InvalidBalance { id: 4, value: -1.0 })
        );

        assert_eq!(
            simulate(&two_debts(), &config(Strategy::Avalanche, -5.0)),
            Err(ValidationError::InvalidExtraPayment(-5.0))
        );

        let no_months = SimulationConfig { max_months: 0, ..Default::default() };
        assert_eq!(simulate(&two_debts(), &no_months), Err(ValidationError::InvalidMaxMonths));
    }

    #[test]
    fn test_detailed_output_off_skips_timeline() {
        let cfg = SimulationConfig { detailed_output: false, ..config(Strategy::Avalanche, 100.0) };
        let brief = simulate(&two_debts(), &cfg).unwrap();
        let full = simulate(&two_debts(), &config(Strategy::Avalanche, 100.0)).unwrap();

        assert!(brief.timeline.is_empty());
        assert_eq!(brief.months_to_payoff, full.months_to_payoff);
        assert_eq!(brief.total_interest_paid, full.total_interest_paid);
        assert_eq!(brief.schedule, full.schedule);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_balance_non_increasing_when_minimums_cover_interest(
            raw in vec((100u32..50_000, 0u32..3000, 1u32..500), 1..5),
            extra in 0u32..1000,
            snowball in proptest::bool::ANY,
        ) {
            let debts: Vec<Debt> = raw
                .iter()
                .enumerate()
                .map(|(i, &(balance, rate_bp, cushion))| {
                    let balance = balance as f64;
                    let rate = rate_bp as f64 / 100.0;
                    let min_payment = balance * rate / 1200.0 + cushion as f64;
                    Debt::new(i as u64 + 1, format!("Debt {}", i + 1), balance, rate, min_payment)
                })
                .collect();
            let strategy = if snowball { Strategy::Snowball } else { Strategy::Avalanche };
            let result = simulate(&debts, &config(strategy, extra as f64)).unwrap();

            let mut previous: f64 = debts.iter().map(|d| d.balance).sum();
            for month in &result.timeline {
                prop_assert!(month.total_balance <= previous + 1e-9 * previous.max(1.0));
                previous = month.total_balance;
            }
        }

        #[test]
        fn prop_interest_matches_ledger_and_runs_are_deterministic(
            raw in vec((100u32..20_000, 0u32..4000, 0u32..400), 1..5),
            extra in 0u32..500,
            snowball in proptest::bool::ANY,
        ) {
            let debts: Vec<Debt> = raw
                .iter()
                .enumerate()
                .map(|(i, &(balance, rate_bp, min_payment))| {
                    Debt::new(i as u64 + 1, format!("Debt {}", i + 1), balance as f64, rate_bp as f64 / 100.0, min_payment as f64)
                })
                .collect();
            let strategy = if snowball { Strategy::Snowball } else { Strategy::Avalanche };
            let cfg = SimulationConfig { max_months: 240, ..config(strategy, extra as f64) };

            let first = simulate(&debts, &cfg).unwrap();
            let second = simulate(&debts, &cfg).unwrap();
            prop_assert_eq!(&first, &second);

            let ledger_interest: f64 = first.timeline.iter().map(|m| m.interest).sum();
            let tolerance = 1e-9 * first.total_interest_paid.abs().max(1.0);
            prop_assert!((ledger_interest - first.total_interest_paid).abs() <= tolerance);

            let per_debt: f64 = first.schedule.iter().map(|e| e.interest_paid).sum();
            prop_assert!((per_debt - first.total_interest_paid).abs() <= tolerance);

            for month in &first.timeline {
                for row in &month.debts {
                    prop_assert!(row.closing_balance >= 0.0);
                }
            }
        }
    }
}
