//! Valuation - free cash flow forecast, discounting and terminal value
//!
//! The operating forecast is built once from the projection assumptions and
//! discounted at each scenario's WACC.

pub mod cash_flow;
pub mod engine;

pub use cash_flow::{
    OperatingForecast, ProjectedCashFlow, discount, discount_factor, forecast_operations,
};
pub use engine::{ScenarioValuation, ValuationInputs, ValuationResult, net_debt, value_company};
