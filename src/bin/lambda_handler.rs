//! AWS Lambda handler for the debt payoff calculator
//!
//! Accepts the debt manager form as JSON and returns the payoff simulation,
//! or the Avalanche/Snowball comparison when `compare` is set.

use debt_payoff::{
    debt::{load_debts_from_value, NumberField},
    payoff::DEFAULT_MAX_MONTHS,
    PortfolioMetrics, ScenarioRunner, SimulationConfig, SimulationResult, Strategy, StrategyComparison,
    ValidationError,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input from the calculator form
#[derive(Debug, Deserialize)]
pub struct PayoffRequest {
    /// Debt records, numbers or form strings
    pub debts: Value,

    /// Extra monthly budget, a number or form text (default: 0)
    #[serde(default, alias = "extraMonthlyPayment", alias = "extraPayment")]
    pub extra_monthly_payment: Option<NumberField>,

    /// "avalanche" or "snowball" (default: avalanche)
    #[serde(default)]
    pub strategy: Option<String>,

    /// Month cap (default: 600)
    #[serde(default = "default_max_months", alias = "maxMonths")]
    pub max_months: u32,

    /// Roll paid-off minimums into the pool (default: true)
    #[serde(default = "default_rollover")]
    pub rollover: bool,

    /// Run both strategies
    #[serde(default)]
    pub compare: bool,

    /// Include the month-by-month ledger
    #[serde(default, alias = "detailedOutput")]
    pub detailed_output: bool,
}

fn default_max_months() -> u32 { DEFAULT_MAX_MONTHS }
fn default_rollover() -> bool { true }

impl PayoffRequest {
    /// Request-level budget; blank form text means none
    fn extra_budget(&self) -> anyhow::Result<f64> {
        let extra = match &self.extra_monthly_payment {
            Some(field) => field
                .value()
                .map_err(|raw| anyhow::anyhow!("extra_monthly_payment: non-numeric value '{}'", raw))?
                .unwrap_or(0.0),
            None => 0.0,
        };
        if !extra.is_finite() || extra < 0.0 {
            return Err(ValidationError::InvalidExtraPayment(extra).into());
        }
        Ok(extra)
    }
}

/// Output to the calculator form
#[derive(Debug, Default, Serialize)]
pub struct PayoffResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PortfolioMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SimulationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<StrategyComparison>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PayoffResponse {
    fn error(message: String) -> Self {
        Self {
            error: Some(message),
            ..Default::default()
        }
    }
}

/// Run the request; any input problem comes back as an error message
fn process(payload: Value) -> anyhow::Result<PayoffResponse> {
    let request: PayoffRequest = serde_json::from_value(payload)?;

    let strategy = match request.strategy.as_deref() {
        Some(s) => s.parse::<Strategy>()?,
        None => Strategy::Avalanche,
    };
    let extra_budget = request.extra_budget()?;

    let debts = load_debts_from_value(request.debts)?;
    let metrics = PortfolioMetrics::from_debts(&debts);
    let runner = ScenarioRunner::new(debts)?;

    // Extra amounts pledged on individual debts join the request budget
    let config = SimulationConfig {
        extra_monthly_payment: extra_budget + metrics.total_extra_payment,
        strategy,
        max_months: request.max_months,
        rollover: request.rollover,
        detailed_output: request.detailed_output,
    };

    let mut response = PayoffResponse {
        metrics: Some(metrics),
        ..Default::default()
    };

    if request.compare {
        let mut comparison = runner.compare(&config)?;
        if !request.detailed_output {
            comparison.avalanche.timeline.clear();
            comparison.snowball.timeline.clear();
        }
        response.comparison = Some(comparison);
    } else {
        response.result = Some(runner.run(&config)?);
    }

    Ok(response)
}

/// Lambda handler function
async fn handler(event: LambdaEvent<Value>) -> Result<PayoffResponse, Error> {
    let start = std::time::Instant::now();

    let mut response = match process(event.payload) {
        Ok(response) => response,
        Err(e) => {
            log::warn!("rejected payoff request: {}", e);
            PayoffResponse::error(e.to_string())
        }
    };
    response.execution_time_ms = start.elapsed().as_millis() as u64;

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form_debts() -> Value {
        json!([
            {"name": "Card", "type": "Credit Card", "principal": "1000", "interestRate": "20", "minPayment": "50"},
            {"name": "Loan", "type": "Personal Loan", "principal": "500", "interestRate": "10", "emi": "50"}
        ])
    }

    #[test]
    fn test_single_strategy_request() {
        let response = process(json!({
            "debts": form_debts(),
            "extraMonthlyPayment": 100,
            "strategy": "snowball"
        }))
        .unwrap();

        let result = response.result.expect("single result");
        assert_eq!(result.strategy, Strategy::Snowball);
        assert_eq!(result.payoff_order(), vec![2, 1]);
        assert!(result.timeline.is_empty());
        assert!(response.comparison.is_none());
        assert_eq!(response.metrics.unwrap().debt_count, 2);
    }

    #[test]
    fn test_compare_request() {
        let response = process(json!({ "debts": form_debts(), "extra_monthly_payment": 100, "compare": true })).unwrap();

        let comparison = response.comparison.expect("comparison");
        assert_eq!(comparison.recommended, Strategy::Avalanche);
        assert!(comparison.avalanche.timeline.is_empty());
        assert!(response.result.is_none());
    }

    #[test]
    fn test_invalid_requests_report_errors() {
        let err = process(json!({ "debts": [], "strategy": "avalanche" })).unwrap_err();
        assert!(err.to_string().contains("debts"));

        let err = process(json!({ "debts": form_debts(), "strategy": "random" })).unwrap_err();
        assert!(err.to_string().starts_with("strategy:"));

        let err = process(json!({ "debts": form_debts(), "extra_monthly_payment": -10 })).unwrap_err();
        assert!(err.to_string().starts_with("extra_monthly_payment:"));

        let err = process(json!({ "debts": form_debts(), "extraMonthlyPayment": "lots" })).unwrap_err();
        assert_eq!(err.to_string(), "extra_monthly_payment: non-numeric value 'lots'");
    }

    fn single_card(extra: Value) -> Value {
        json!([{"principal": "1000", "interestRate": "20", "emi": "50", "extraPayment": extra}])
    }

    fn months(response: PayoffResponse) -> u32 {
        response.result.expect("single result").months_to_payoff
    }

    #[test]
    fn test_extra_budget_accepts_form_text() {
        let as_text = process(json!({ "debts": form_debts(), "extraMonthlyPayment": "100" })).unwrap();
        let as_number = process(json!({ "debts": form_debts(), "extraMonthlyPayment": 100 })).unwrap();
        assert_eq!(as_text.result, as_number.result);

        let blank = process(json!({ "debts": form_debts(), "extraMonthlyPayment": " " })).unwrap();
        let absent = process(json!({ "debts": form_debts() })).unwrap();
        assert_eq!(blank.result, absent.result);
    }

    #[test]
    fn test_pledged_debt_extra_shortens_the_plan() {
        let without = months(process(json!({ "debts": single_card(json!("")) })).unwrap());
        let pledged = process(json!({ "debts": single_card(json!("500")) })).unwrap();
        assert_eq!(pledged.metrics.as_ref().unwrap().total_extra_payment, 500.0);
        let pledged = months(pledged);

        // Same as sending the pledge as the request budget
        let budget = months(process(json!({ "debts": single_card(json!("")), "extraMonthlyPayment": 500 })).unwrap());

        assert!(pledged < without);
        assert_eq!(pledged, budget);
        assert_eq!(pledged, 2);
    }

    #[test]
    fn test_compare_passes_rollover_through() {
        let debts = json!([
            {"name": "A", "balance": 200, "annual_rate": 0, "min_payment": 50},
            {"name": "B", "balance": 1000, "annual_rate": 0, "min_payment": 50}
        ]);
        let response = process(json!({ "debts": debts, "compare": true, "rollover": false })).unwrap();

        let comparison = response.comparison.expect("comparison");
        assert_eq!(comparison.avalanche.months_to_payoff, 20);
        assert_eq!(comparison.snowball.months_to_payoff, 20);
    }
}
