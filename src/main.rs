//! Debt Payoff CLI
//!
//! Command-line interface for running payoff simulations

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use debt_payoff::{
    debt::{load_debts, total_extra_payment},
    payoff::DEFAULT_MAX_MONTHS,
    report::{to_json, write_ledger_csv_file},
    Debt, DebtType, PortfolioMetrics, ScenarioRunner, SimulationConfig, SimulationResult, Strategy,
};

#[derive(Debug, Parser)]
#[command(name = "debt_payoff", version, about = "Simulate a debt payoff plan")]
struct Cli {
    /// JSON file with the debts to simulate (a demo portfolio is used when omitted)
    #[arg(short, long)]
    debts: Option<PathBuf>,

    /// Extra amount paid each month on top of the minimums
    #[arg(short, long, default_value_t = 0.0)]
    extra: f64,

    /// Ordering strategy: avalanche or snowball
    #[arg(short, long, default_value = "avalanche")]
    strategy: Strategy,

    /// Safety cap on simulated months
    #[arg(long, default_value_t = DEFAULT_MAX_MONTHS)]
    max_months: u32,

    /// Do not roll paid-off minimums into the extra pool
    #[arg(long)]
    no_rollover: bool,

    /// Run both strategies and print the comparison
    #[arg(long)]
    compare: bool,

    /// Write the monthly ledger to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Month the plan starts (YYYY-MM-DD), used to report a debt-free date
    #[arg(long)]
    start_date: Option<NaiveDate>,
}

fn demo_debts() -> Vec<Debt> {
    vec![
        Debt::new(1, "Credit card", 85_000.0, 36.0, 4_250.0).with_type(DebtType::CreditCard),
        Debt::new(2, "Personal loan", 56_679.0, 18.0, 5_000.0).with_type(DebtType::PersonalLoan),
        Debt::new(3, "Car loan", 320_000.0, 9.5, 8_500.0).with_type(DebtType::CarLoan),
    ]
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let debts = match &cli.debts {
        Some(path) => load_debts(path).with_context(|| format!("loading {}", path.display()))?,
        None => demo_debts(),
    };
    let runner = ScenarioRunner::new(debts)?;

    // Per-debt pledges join the budget given on the command line
    let config = SimulationConfig {
        extra_monthly_payment: cli.extra + total_extra_payment(runner.debts()),
        strategy: cli.strategy,
        max_months: cli.max_months,
        rollover: !cli.no_rollover,
        detailed_output: true,
    };

    if cli.compare {
        let comparison = runner.compare(&config)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
            return Ok(());
        }

        print_metrics(&PortfolioMetrics::from_debts(runner.debts()));
        for result in [&comparison.avalanche, &comparison.snowball] {
            print_result(result, cli.start_date);
        }
        println!("\nRecommended: {}", comparison.recommended);
        println!("  Interest difference (snowball - avalanche): {:.2}", comparison.interest_saved);
        println!("  Month difference (snowball - avalanche):    {}", comparison.months_saved);

        if let Some(path) = &cli.csv {
            write_ledger_csv_file(path, comparison.recommended_result())
                .with_context(|| format!("writing {}", path.display()))?;
            println!("\nLedger for {} written to: {}", comparison.recommended, path.display());
        }
        return Ok(());
    }

    let result = runner.run(&config)?;

    if let Some(path) = &cli.csv {
        write_ledger_csv_file(path, &result).with_context(|| format!("writing {}", path.display()))?;
    }

    if cli.json {
        println!("{}", to_json(&result)?);
        return Ok(());
    }

    print_metrics(&PortfolioMetrics::from_debts(runner.debts()));
    print_result(&result, cli.start_date);
    print_milestones(&result);

    if let Some(path) = &cli.csv {
        println!("\nLedger written to: {}", path.display());
    }

    Ok(())
}

fn print_metrics(metrics: &PortfolioMetrics) {
    println!("Portfolio");
    println!("  Debts:             {}", metrics.debt_count);
    println!("  Total outstanding: {:.2}", metrics.total_outstanding);
    println!("  Total minimums:    {:.2}", metrics.total_min_payment);
    if metrics.total_extra_payment > 0.0 {
        println!("  Pledged extra:     {:.2}", metrics.total_extra_payment);
    }
    println!("  Weighted rate:     {:.2}%", metrics.weighted_rate);
    println!("  First-month interest: {:.2}", metrics.first_month_interest);
    if !metrics.uncovered_debts.is_empty() {
        println!("  Minimums below monthly interest: {:?}", metrics.uncovered_debts);
    }
    if !metrics.tenure_mismatches.is_empty() {
        println!("  Stated installments differ from projection: {:?}", metrics.tenure_mismatches);
    }
}

fn print_result(result: &SimulationResult, start_date: Option<NaiveDate>) {
    let (years, months) = result.duration_years_months();

    println!("\n{} ({} months, {}y {}m)", result.strategy, result.months_to_payoff, years, months);
    println!("{:>12} {:<24} {:>12} {:>14}", "Debt", "Name", "Paid month", "Interest");
    println!("{}", "-".repeat(65));
    for entry in &result.schedule {
        let month = entry
            .payoff_month
            .map(|m| m.to_string())
            .unwrap_or_else(|| "never".to_string());
        println!("{:>12} {:<24} {:>12} {:>14.2}", entry.debt_id, entry.name, month, entry.interest_paid);
    }

    println!("  Total interest: {:.2}", result.total_interest_paid);
    println!("  Total paid:     {:.2}", result.total_paid);

    if !result.converged {
        println!(
            "  WARNING: not paid off within {} months; {:.2} still outstanding at current payments",
            result.months_to_payoff, result.remaining_balance
        );
    } else if let Some(date) = start_date.and_then(|start| result.payoff_date(start)) {
        println!("  Debt-free by:   {}", date.format("%B %Y"));
    }
}

fn print_milestones(result: &SimulationResult) {
    println!("\nMilestones:");
    for &m in &[1, 6, 12, 24, 36, 60, 120] {
        if let Some(row) = result.timeline.get(m - 1) {
            println!(
                "  Month {:>3}: Pool={:.2} Interest={:.2} Paid={:.2} Balance={:.2}",
                m, row.extra_pool, row.interest, row.payment, row.total_balance
            );
        }
    }
}
