//! Multi-year financial statement series.

use crate::{Result, ValuationError};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One fiscal period of income statement, balance sheet and cash flow items.
///
/// Missing line items may be given as `NaN`; they propagate into the
/// affected metrics as undefined values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialPeriod {
    /// Fiscal period end
    pub period_end: NaiveDate,
    /// Total revenue
    pub revenue: f64,
    /// Earnings before interest and taxes
    pub ebit: f64,
    /// EBIT plus depreciation and amortization
    pub ebitda: f64,
    /// Revenue less cost of goods sold
    pub gross_profit: f64,
    /// Capital expenditure as a positive outflow
    pub capex: f64,
    /// Depreciation and amortization
    pub depreciation_amortization: f64,
    /// Total current assets
    pub current_assets: f64,
    /// Total current liabilities
    pub current_liabilities: f64,
    /// Cash, equivalents and short-term investments
    pub cash: f64,
    /// Current debt and capital lease obligations
    pub current_debt: f64,
    /// Effective tax rate (decimal)
    pub tax_rate: f64,
}

/// Periods ordered strictly by `period_end`, at least two of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FinancialPeriod>", into = "Vec<FinancialPeriod>")]
pub struct FinancialSeries {
    periods: Vec<FinancialPeriod>,
}

/// Two periods are the minimum for a growth rate.
pub const MIN_PERIODS: usize = 2;

impl FinancialSeries {
    /// Validate and wrap a list of periods.
    ///
    /// # Errors
    /// - [`ValuationError::InsufficientData`] with fewer than two periods
    /// - [`ValuationError::InvalidInput`] if period ends are not strictly increasing
    pub fn new(periods: Vec<FinancialPeriod>) -> Result<Self> {
        if periods.len() < MIN_PERIODS {
            return Err(ValuationError::InsufficientData {
                required: MIN_PERIODS,
                available: periods.len(),
            });
        }

        if let Some(pair) = periods
            .windows(2)
            .find(|pair| pair[0].period_end >= pair[1].period_end)
        {
            return Err(ValuationError::InvalidInput(format!(
                "period ends must be strictly increasing: {} is followed by {}",
                pair[0].period_end, pair[1].period_end
            )));
        }

        Ok(Self { periods })
    }

    /// The periods, oldest first.
    pub fn periods(&self) -> &[FinancialPeriod] {
        &self.periods
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Always false for a validated series.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// The most recent period.
    pub fn latest(&self) -> &FinancialPeriod {
        &self.periods[self.periods.len() - 1]
    }

    fn values(&self, field: impl Fn(&FinancialPeriod) -> f64) -> Vec<f64> {
        self.periods.iter().map(field).collect()
    }

    /// One row per period, with a `date` column formatted as `YYYY-MM-DD`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let dates: Vec<String> = self
            .periods
            .iter()
            .map(|p| p.period_end.to_string())
            .collect();

        let frame = df![
            "date" => dates,
            "revenue" => self.values(|p| p.revenue),
            "ebit" => self.values(|p| p.ebit),
            "ebitda" => self.values(|p| p.ebitda),
            "gross_profit" => self.values(|p| p.gross_profit),
            "capex" => self.values(|p| p.capex),
            "depreciation_amortization" => self.values(|p| p.depreciation_amortization),
            "current_assets" => self.values(|p| p.current_assets),
            "current_liabilities" => self.values(|p| p.current_liabilities),
            "cash" => self.values(|p| p.cash),
            "current_debt" => self.values(|p| p.current_debt),
            "tax_rate" => self.values(|p| p.tax_rate)
        ]?;

        Ok(frame)
    }
}

impl TryFrom<Vec<FinancialPeriod>> for FinancialSeries {
    type Error = ValuationError;

    fn try_from(periods: Vec<FinancialPeriod>) -> Result<Self> {
        Self::new(periods)
    }
}

impl From<FinancialSeries> for Vec<FinancialPeriod> {
    fn from(series: FinancialSeries) -> Self {
        series.periods
    }
}
