//! Averages of historical metrics.
//!
//! Averages skip the first period, whose growth and reinvestment figures are
//! undefined by construction, and ignore `NaN` entries in the remaining
//! periods. A metric with no defined value left averages to `NaN`.

use crate::historical::{HistoricalMetricsResult, PeriodMetrics};
use serde::{Deserialize, Serialize};

/// Mean of each metric over the periods after the first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricAverages {
    /// Average revenue growth
    pub revenue_growth: f64,
    /// Average EBIT growth
    pub ebit_growth: f64,
    /// Average gross margin
    pub gross_margin: f64,
    /// Average EBIT margin
    pub ebit_margin: f64,
    /// Average EBITDA margin
    pub ebitda_margin: f64,
    /// Average effective tax rate
    pub tax_rate: f64,
    /// Average reinvestment rate
    pub reinvestment_rate: f64,
}

/// Arithmetic mean of the non-NaN values, or NaN if there are none.
pub fn nan_skip_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

impl HistoricalMetricsResult {
    /// Average each metric over every period but the first, skipping NaN.
    pub fn averages(&self) -> MetricAverages {
        let rest = self.periods.get(1..).unwrap_or_default();
        let mean = |field: fn(&PeriodMetrics) -> f64| nan_skip_mean(rest.iter().map(field));

        MetricAverages {
            revenue_growth: mean(|p| p.revenue_growth),
            ebit_growth: mean(|p| p.ebit_growth),
            gross_margin: mean(|p| p.gross_margin),
            ebit_margin: mean(|p| p.ebit_margin),
            ebitda_margin: mean(|p| p.ebitda_margin),
            tax_rate: mean(|p| p.tax_rate),
            reinvestment_rate: mean(|p| p.reinvestment_rate),
        }
    }
}
