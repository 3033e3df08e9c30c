//! Historical analysis - growth, margins, working capital and reinvestment
//!
//! Backward-looking ratios computed from a multi-year statement series. Their
//! averages are the usual starting point for projection assumptions.

pub mod ltm;
pub mod metrics;
pub mod series;
pub mod summary;

pub use ltm::{LtmRevenue, QuarterlyRevenue, ltm_revenue};
pub use metrics::{HistoricalMetricsResult, PeriodMetrics, compute_historical_metrics};
pub use series::{FinancialPeriod, FinancialSeries};
pub use summary::{MetricAverages, nan_skip_mean};
