//! Historical growth, margin, working capital and reinvestment metrics.
//!
//! Per period t (oldest first):
//! ```text
//! growth_x_t          = (x_t - x_{t-1}) / x_{t-1}        x ∈ {revenue, ebit}
//! margin_x_t          = x_t / revenue_t                  x ∈ {gross profit, ebit, ebitda}
//! NWC_t               = (current assets - cash) - (current liabilities - current debt)
//! reinvestment_t      = capex_t - D&A_t + (NWC_t - NWC_{t-1})
//! NOPAT_t             = ebit_t × (1 - tax_rate_t)
//! reinvestment_rate_t = reinvestment_t / NOPAT_t
//! ```
//! Values that have no meaning for a period (the first period's growth,
//! a zero denominator, a non-positive NOPAT) are reported as `NaN`.

use crate::{Result, historical::FinancialSeries};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Metrics for a single fiscal period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    /// Fiscal period end
    pub period_end: NaiveDate,
    /// Total revenue
    pub revenue: f64,
    /// Earnings before interest and taxes
    pub ebit: f64,
    /// Year-over-year revenue growth
    pub revenue_growth: f64,
    /// Year-over-year EBIT growth
    pub ebit_growth: f64,
    /// Gross profit / revenue
    pub gross_margin: f64,
    /// EBIT / revenue
    pub ebit_margin: f64,
    /// EBITDA / revenue
    pub ebitda_margin: f64,
    /// Effective tax rate
    pub tax_rate: f64,
    /// Non-cash net working capital
    pub nwc: f64,
    /// Change in NWC from the prior period
    pub change_in_nwc: f64,
    /// Capex net of D&A plus the change in NWC
    pub reinvestment: f64,
    /// Net operating profit after tax
    pub nopat: f64,
    /// Reinvestment / NOPAT
    pub reinvestment_rate: f64,
}

/// Per-period metrics for a whole series, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMetricsResult {
    /// One entry per input period
    pub periods: Vec<PeriodMetrics>,
}

impl HistoricalMetricsResult {
    /// Metrics of the most recent period.
    pub fn latest(&self) -> Option<&PeriodMetrics> {
        self.periods.last()
    }
}

/// `numerator / denominator`, or NaN when the denominator is zero.
fn ratio(numerator: Expr, denominator: Expr) -> Expr {
    when(denominator.clone().eq(lit(0.0)))
        .then(lit(f64::NAN))
        .otherwise(numerator / denominator)
}

/// Period-over-period percentage change of a column.
fn pct_change(column: &str) -> Expr {
    let prior = col(column).shift(lit(1));
    ratio(col(column) - prior.clone(), prior)
}

/// Build the lazy query that adds every metric column to a series frame.
pub fn metrics_query(frame: LazyFrame) -> LazyFrame {
    frame
        .with_columns([
            pct_change("revenue").alias("revenue_growth"),
            pct_change("ebit").alias("ebit_growth"),
            ratio(col("gross_profit"), col("revenue")).alias("gross_margin"),
            ratio(col("ebit"), col("revenue")).alias("ebit_margin"),
            ratio(col("ebitda"), col("revenue")).alias("ebitda_margin"),
            ((col("current_assets") - col("cash"))
                - (col("current_liabilities") - col("current_debt")))
            .alias("nwc"),
            (col("ebit") * (lit(1.0) - col("tax_rate"))).alias("nopat"),
        ])
        .with_column((col("nwc") - col("nwc").shift(lit(1))).alias("change_in_nwc"))
        .with_column(
            (col("capex") - col("depreciation_amortization") + col("change_in_nwc"))
                .alias("reinvestment"),
        )
        .with_column(
            when(col("nopat").lt_eq(lit(0.0)))
                .then(lit(f64::NAN))
                .otherwise(col("reinvestment") / col("nopat"))
                .alias("reinvestment_rate"),
        )
}

/// Read a float column, mapping nulls to NaN.
fn float_column(frame: &DataFrame, name: &str) -> Result<Vec<f64>> {
    Ok(frame
        .column(name)?
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect())
}

/// Compute growth rates, margins, NWC and reinvestment for every period.
///
/// Undefined ratios are `NaN`; this never fails on benign data such as a
/// loss-making year.
///
/// # Errors
/// Only [`crate::ValuationError::Polars`] if the underlying query fails.
pub fn compute_historical_metrics(series: &FinancialSeries) -> Result<HistoricalMetricsResult> {
    let frame = metrics_query(series.to_frame()?.lazy()).collect()?;

    let revenue = float_column(&frame, "revenue")?;
    let ebit = float_column(&frame, "ebit")?;
    let revenue_growth = float_column(&frame, "revenue_growth")?;
    let ebit_growth = float_column(&frame, "ebit_growth")?;
    let gross_margin = float_column(&frame, "gross_margin")?;
    let ebit_margin = float_column(&frame, "ebit_margin")?;
    let ebitda_margin = float_column(&frame, "ebitda_margin")?;
    let tax_rate = float_column(&frame, "tax_rate")?;
    let nwc = float_column(&frame, "nwc")?;
    let change_in_nwc = float_column(&frame, "change_in_nwc")?;
    let reinvestment = float_column(&frame, "reinvestment")?;
    let nopat = float_column(&frame, "nopat")?;
    let reinvestment_rate = float_column(&frame, "reinvestment_rate")?;

    let periods = series
        .periods()
        .iter()
        .enumerate()
        .map(|(i, period)| PeriodMetrics {
            period_end: period.period_end,
            revenue: revenue[i],
            ebit: ebit[i],
            revenue_growth: revenue_growth[i],
            ebit_growth: ebit_growth[i],
            gross_margin: gross_margin[i],
            ebit_margin: ebit_margin[i],
            ebitda_margin: ebitda_margin[i],
            tax_rate: tax_rate[i],
            nwc: nwc[i],
            change_in_nwc: change_in_nwc[i],
            reinvestment: reinvestment[i],
            nopat: nopat[i],
            reinvestment_rate: reinvestment_rate[i],
        })
        .collect();

    Ok(HistoricalMetricsResult { periods })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::historical::{FinancialPeriod, series::tests::period};
    use approx::assert_relative_eq;

    fn series(periods: Vec<FinancialPeriod>) -> FinancialSeries {
        FinancialSeries::new(periods).unwrap()
    }

    #[test]
    fn test_growth_rates() {
        let result = compute_historical_metrics(&series(vec![
            period(2022, 100.0, 20.0),
            period(2023, 110.0, 25.0),
            period(2024, 99.0, 20.0),
        ]))
        .unwrap();

        let p = &result.periods;
        assert!(p[0].revenue_growth.is_nan());
        assert!(p[0].ebit_growth.is_nan());
        assert_relative_eq!(p[1].revenue_growth, 0.10, epsilon = 1e-12);
        assert_relative_eq!(p[1].ebit_growth, 0.25, epsilon = 1e-12);
        assert_relative_eq!(p[2].revenue_growth, -0.10, epsilon = 1e-12);
        assert_relative_eq!(p[2].ebit_growth, -0.20, epsilon = 1e-12);
    }

    #[test]
    fn test_growth_from_zero_is_nan() {
        let result = compute_historical_metrics(&series(vec![
            period(2023, 100.0, 0.0),
            period(2024, 120.0, 15.0),
        ]))
        .unwrap();

        assert!(result.periods[1].ebit_growth.is_nan());
        assert_relative_eq!(result.periods[1].revenue_growth, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_margins() {
        let result = compute_historical_metrics(&series(vec![
            period(2023, 200.0, 40.0),
            period(2024, 0.0, 15.0),
        ]))
        .unwrap();

        let first = &result.periods[0];
        assert_relative_eq!(first.gross_margin, 0.6, epsilon = 1e-12);
        assert_relative_eq!(first.ebit_margin, 0.2, epsilon = 1e-12);
        assert_relative_eq!(first.ebitda_margin, 0.25, epsilon = 1e-12);

        let zero_revenue = &result.periods[1];
        assert!(zero_revenue.gross_margin.is_nan());
        assert!(zero_revenue.ebit_margin.is_nan());
        assert!(zero_revenue.ebitda_margin.is_nan());
    }

    #[test]
    fn test_working_capital_and_reinvestment() {
        let mut second = period(2024, 120.0, 50.0);
        second.current_assets = 260.0;
        second.cash = 60.0;
        second.current_liabilities = 140.0;
        second.current_debt = 30.0;
        second.capex = 45.0;
        second.depreciation_amortization = 15.0;
        second.tax_rate = 0.25;

        let result = compute_historical_metrics(&series(vec![period(2023, 100.0, 20.0), second]))
            .unwrap();

        let first = &result.periods[0];
        // (200 - 50) - (120 - 20)
        assert_relative_eq!(first.nwc, 50.0);
        assert!(first.change_in_nwc.is_nan());
        assert!(first.reinvestment.is_nan());
        assert!(first.reinvestment_rate.is_nan());
        assert_relative_eq!(first.nopat, 16.0, epsilon = 1e-12);

        let latest = result.latest().unwrap();
        // (260 - 60) - (140 - 30) = 90
        assert_relative_eq!(latest.nwc, 90.0);
        assert_relative_eq!(latest.change_in_nwc, 40.0);
        // 45 - 15 + 40
        assert_relative_eq!(latest.reinvestment, 70.0);
        assert_relative_eq!(latest.nopat, 37.5, epsilon = 1e-12);
        assert_relative_eq!(latest.reinvestment_rate, 70.0 / 37.5, epsilon = 1e-12);
    }

    #[test]
    fn test_reinvestment_rate_undefined_for_non_positive_nopat() {
        let result = compute_historical_metrics(&series(vec![
            period(2022, 100.0, 20.0),
            period(2023, 90.0, -5.0),
            period(2024, 95.0, 0.0),
        ]))
        .unwrap();

        assert!(result.periods[1].nopat < 0.0);
        assert!(result.periods[1].reinvestment_rate.is_nan());
        assert!(result.periods[2].reinvestment_rate.is_nan());
        assert!(!result.periods[1].reinvestment.is_nan());
    }

    #[test]
    fn test_one_row_per_period() {
        let input = series(vec![
            period(2021, 80.0, 10.0),
            period(2022, 100.0, 20.0),
            period(2023, 110.0, 25.0),
            period(2024, 121.0, 30.0),
        ]);
        let result = compute_historical_metrics(&input).unwrap();

        assert_eq!(result.periods.len(), input.len());
        for (metrics, period) in result.periods.iter().zip(input.periods()) {
            assert_eq!(metrics.period_end, period.period_end);
            assert_eq!(metrics.revenue, period.revenue);
        }
    }
}
