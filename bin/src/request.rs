//! JSON request files accepted by the CLI.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use fd_valuation::{
    BetaEstimate, CapitalStructureInput, CostOfCapitalInputs, CreditSpreadTable, FinancialSeries,
    ProjectionMode, ScenarioSet, ValuationInputs, capital::BetaRegressionConfig,
    compute_historical_metrics, estimate_beta, historical::QuarterlyRevenue, ltm_revenue, net_debt,
    project, projection_dates,
};
use serde::{Deserialize, de::DeserializeOwned};
use std::{fs, path::Path};

/// Read and parse a JSON request file.
pub(crate) fn read_request<T: DeserializeOwned>(path: &Path) -> Result<T> {
    tracing::debug!(path = %path.display(), "reading request");
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Beta given directly or estimated from prices.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BetaSource {
    Estimate(BetaEstimate),
    Regression {
        stock_prices: Vec<f64>,
        index_prices: Vec<f64>,
        /// Risk-free rate per return period
        #[serde(default)]
        period_risk_free_rate: f64,
        #[serde(default)]
        config: BetaRegressionConfig,
    },
}

impl BetaSource {
    fn resolve(&self) -> Result<BetaEstimate> {
        match self {
            Self::Estimate(estimate) => {
                estimate.validate()?;
                Ok(*estimate)
            }
            Self::Regression {
                stock_prices,
                index_prices,
                period_risk_free_rate,
                config,
            } => estimate_beta(stock_prices, index_prices, *period_risk_free_rate, config)
                .context("beta regression failed"),
        }
    }
}

/// Request for the `wacc` subcommand.
#[derive(Debug, Deserialize)]
pub(crate) struct WaccRequest {
    pub(crate) capital_structure: CapitalStructureInput,
    risk_free_rate: f64,
    equity_risk_premium: f64,
    marginal_tax_rate: f64,
    beta: BetaSource,
    /// Rating label; takes precedence over `interest_coverage`
    credit_rating: Option<String>,
    interest_coverage: Option<f64>,
}

impl WaccRequest {
    /// Resolve beta and the credit rating into cost of capital inputs.
    pub(crate) fn cost_of_capital_inputs(&self) -> Result<CostOfCapitalInputs> {
        let credit_rating = match (&self.credit_rating, self.interest_coverage) {
            (Some(rating), _) => rating.clone(),
            (None, Some(coverage)) => CreditSpreadTable::rating_for_interest_coverage(coverage)?
                .rating
                .to_string(),
            (None, None) => bail!("request needs either credit_rating or interest_coverage"),
        };

        Ok(CostOfCapitalInputs {
            risk_free_rate: self.risk_free_rate,
            beta: self.beta.resolve()?,
            equity_risk_premium: self.equity_risk_premium,
            credit_rating,
            marginal_tax_rate: self.marginal_tax_rate,
        })
    }
}

/// Request for the `value` subcommand.
#[derive(Debug, Deserialize)]
pub(crate) struct ValueRequest {
    /// Base-year revenue; falls back to LTM revenue from `quarterly_revenue`
    starting_revenue: Option<f64>,
    #[serde(default)]
    quarterly_revenue: Vec<QuarterlyRevenue>,
    /// Explicit assumptions; falls back to flat historical averages of `history`
    projection: Option<ProjectionMode>,
    history: Option<FinancialSeries>,
    years: usize,
    wacc: ScenarioSet<f64>,
    terminal_growth_rate: f64,
    tax_rate: f64,
    #[serde(default)]
    total_debt: f64,
    #[serde(default)]
    total_cash: f64,
    shares_outstanding: f64,
    current_price: Option<f64>,
    last_period_end: Option<NaiveDate>,
}

/// Resolved valuation inputs with the reporting extras.
#[derive(Debug)]
pub(crate) struct ValuationPlan {
    pub(crate) inputs: ValuationInputs,
    pub(crate) dates: Option<Vec<NaiveDate>>,
    pub(crate) current_price: Option<f64>,
}

impl ValueRequest {
    /// Build the projection and the valuation inputs.
    pub(crate) fn plan(&self) -> Result<ValuationPlan> {
        let ltm = match self.quarterly_revenue.as_slice() {
            [] => None,
            quarters => Some(ltm_revenue(quarters)?),
        };
        let starting_revenue = match (self.starting_revenue, ltm) {
            (Some(revenue), _) => revenue,
            (None, Some(ltm)) => ltm.revenue,
            (None, None) => bail!("request needs either starting_revenue or quarterly_revenue"),
        };

        let mode = match (&self.projection, &self.history) {
            (Some(mode), _) => mode.clone(),
            (None, Some(history)) => {
                let averages = compute_historical_metrics(history)?.averages();
                ProjectionMode::from_averages(&averages)
                    .context("historical averages cannot seed the projection")?
            }
            (None, None) => bail!("request needs either projection or history"),
        };
        let assumptions = project(starting_revenue, &mode, self.years)?;

        // The forecast starts after the base period: explicit date, then LTM, then history.
        let last_period_end = self
            .last_period_end
            .or(ltm.map(|ltm| ltm.period_end))
            .or_else(|| self.history.as_ref().map(|h| h.latest().period_end));
        let dates = last_period_end
            .map(|end| projection_dates(end, self.years))
            .transpose()?;

        Ok(ValuationPlan {
            inputs: ValuationInputs {
                starting_revenue,
                assumptions,
                wacc: self.wacc,
                terminal_growth_rate: self.terminal_growth_rate,
                tax_rate: self.tax_rate,
                net_debt: net_debt(self.total_debt, self.total_cash),
                shares_outstanding: self.shares_outstanding,
            },
            dates,
            current_price: self.current_price,
        })
    }
}
