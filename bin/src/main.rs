//! CLI for the fd-valuation engine.
//!
//! Reads JSON request files, runs the cost of capital, historical metrics or
//! valuation pipeline and prints a plain-text report, or JSON with `--json`.

mod request;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fd_valuation::{
    CreditSpreadTable, FinancialSeries, ValuationResult, compute_historical_metrics, compute_wacc,
    historical::{MetricAverages, PeriodMetrics},
    value_company,
};
use request::{ValueRequest, WaccRequest, read_request};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fd-valuation")]
#[command(about = "Discounted cash flow valuation and cost of capital", long_about = None)]
#[command(version)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the credit spread table
    Spreads,
    /// Synthetic credit rating for an interest coverage ratio
    Rating {
        /// EBIT / interest expense
        #[arg(long, allow_negative_numbers = true)]
        coverage: f64,
    },
    /// Compute the WACC band from a request file
    Wacc {
        /// Path to the JSON request
        request: PathBuf,
    },
    /// Compute per-period metrics and averages from a statement series
    Historical {
        /// Path to the JSON series
        series: PathBuf,
    },
    /// Project cash flows and value the company from a request file
    Value {
        /// Path to the JSON request
        request: PathBuf,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Spreads => show_spreads(cli.json),
        Commands::Rating { coverage } => show_rating(*coverage, cli.json),
        Commands::Wacc { request } => show_wacc(&read_request(request)?, cli.json),
        Commands::Historical { series } => show_historical(&read_request(series)?, cli.json),
        Commands::Value { request } => show_valuation(&read_request(request)?, cli.json),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a decimal rate as a percentage, `n/a` when undefined.
fn pct(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.2}%", value * 100.0)
    }
}

fn show_spreads(json: bool) -> Result<()> {
    let entries = CreditSpreadTable::entries();
    if json {
        return print_json(&entries);
    }

    println!("{:<10} {:>12} {:>12} {:>8}", "Rating", "Coverage >", "Coverage <", "Spread");
    for entry in entries {
        println!(
            "{:<10} {:>12} {:>12} {:>8}",
            entry.rating,
            entry.min_coverage,
            entry.max_coverage,
            pct(entry.spread)
        );
    }
    Ok(())
}

fn show_rating(coverage: f64, json: bool) -> Result<()> {
    let entry = CreditSpreadTable::rating_for_interest_coverage(coverage)?;
    if json {
        return print_json(entry);
    }

    println!("Interest coverage {coverage}: {} (spread {})", entry.rating, pct(entry.spread));
    Ok(())
}

fn show_wacc(request: &WaccRequest, json: bool) -> Result<()> {
    let inputs = request.cost_of_capital_inputs()?;
    let result = compute_wacc(&request.capital_structure, &inputs)?;
    if json {
        return print_json(&result);
    }

    println!("Credit rating: {}", inputs.credit_rating);
    println!(
        "Beta: {:.3} [{:.3}, {:.3}], r² {:.3}",
        inputs.beta.point_estimate, inputs.beta.lower_ci, inputs.beta.upper_ci, inputs.beta.r_squared
    );
    println!("Equity weight: {}", pct(result.equity_weight));
    println!("Debt weight: {}", pct(result.debt_weight));
    println!(
        "Cost of debt: {} pre-tax, {} after tax",
        pct(result.cost_of_debt),
        pct(result.after_tax_cost_of_debt)
    );
    println!("\n{:<6} {:>14} {:>10}", "", "Cost of equity", "WACC");
    for (scenario, wacc) in result.wacc.iter() {
        println!(
            "{:<6} {:>14} {:>10}",
            scenario.to_string(),
            pct(*result.cost_of_equity.get(scenario)),
            pct(*wacc)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct HistoricalReport<'a> {
    periods: &'a [PeriodMetrics],
    averages: MetricAverages,
}

fn show_historical(series: &FinancialSeries, json: bool) -> Result<()> {
    let metrics = compute_historical_metrics(series)?;
    let averages = metrics.averages();
    if json {
        return print_json(&HistoricalReport {
            periods: &metrics.periods,
            averages,
        });
    }

    println!(
        "{:<12} {:>12} {:>10} {:>10} {:>10} {:>12}",
        "Period", "Revenue", "Growth", "EBIT %", "Gross %", "Reinvest %"
    );
    for period in &metrics.periods {
        println!(
            "{:<12} {:>12.1} {:>10} {:>10} {:>10} {:>12}",
            period.period_end.to_string(),
            period.revenue,
            pct(period.revenue_growth),
            pct(period.ebit_margin),
            pct(period.gross_margin),
            pct(period.reinvestment_rate)
        );
    }
    println!(
        "{:<12} {:>12} {:>10} {:>10} {:>10} {:>12}",
        "Average",
        "",
        pct(averages.revenue_growth),
        pct(averages.ebit_margin),
        pct(averages.gross_margin),
        pct(averages.reinvestment_rate)
    );
    Ok(())
}

#[derive(Serialize)]
struct ValuationReport<'a> {
    dates: Option<&'a [NaiveDate]>,
    upside: Option<f64>,
    valuation: &'a ValuationResult,
}

fn show_valuation(request: &ValueRequest, json: bool) -> Result<()> {
    let plan = request.plan()?;
    let result = value_company(&plan.inputs)?;
    let upside = plan.current_price.and_then(|price| result.upside(price));

    if json {
        return print_json(&ValuationReport {
            dates: plan.dates.as_deref(),
            upside,
            valuation: &result,
        });
    }

    println!(
        "{:<12} {:>12} {:>12} {:>12} {:>12}",
        "Year", "Revenue", "EBIT", "NOPAT", "FCF"
    );
    for year in &result.forecast {
        let label = plan
            .dates
            .as_ref()
            .and_then(|dates| dates.get(year.year - 1))
            .map_or_else(|| year.year.to_string(), NaiveDate::to_string);
        println!(
            "{:<12} {:>12.1} {:>12.1} {:>12.1} {:>12.1}",
            label, year.revenue, year.ebit, year.nopat, year.fcf
        );
    }

    println!(
        "\n{:<6} {:>8} {:>14} {:>14} {:>14} {:>10} {:>8}",
        "", "WACC", "PV explicit", "PV terminal", "Equity", "Price", "TV %"
    );
    for (scenario, valuation) in result.scenarios.iter() {
        println!(
            "{:<6} {:>8} {:>14.1} {:>14.1} {:>14.1} {:>10.2} {:>8}",
            scenario.to_string(),
            pct(valuation.wacc),
            valuation.pv_explicit_fcf,
            valuation.pv_terminal_value,
            valuation.equity_value,
            valuation.implied_share_price,
            pct(valuation.terminal_value_share())
        );
    }

    let (low, high) = result.price_range();
    println!("\nImplied share price range: {low:.2} - {high:.2}");
    if let Some(upside) = upside {
        println!("Upside vs current price: {}", pct(upside));
    }
    Ok(())
}
