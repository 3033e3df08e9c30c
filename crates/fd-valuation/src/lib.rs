#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuation/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod capital;
pub mod error;
pub mod historical;
pub mod projection;
pub mod scenario;
pub mod valuation;

// Re-export core types
pub use capital::{
    BetaEstimate, CapitalStructureInput, CostOfCapitalInputs, CostOfCapitalResult,
    CreditSpreadTable, compute_wacc, estimate_beta,
};
pub use error::{Result, ValuationError};
pub use historical::{
    FinancialPeriod, FinancialSeries, HistoricalMetricsResult, compute_historical_metrics,
    ltm_revenue,
};
pub use projection::{ProjectionAssumptions, ProjectionMode, project, projection_dates};
pub use scenario::{Scenario, ScenarioSet};
pub use valuation::{ValuationInputs, ValuationResult, net_debt, value_company};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
