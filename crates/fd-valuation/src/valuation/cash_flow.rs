//! Free cash flow projection and discounting.
//!
//! ```text
//! revenue_t = revenue_{t-1} × (1 + g_t)
//! EBIT_t    = revenue_t × margin_t
//! NOPAT_t   = EBIT_t × (1 - tax)
//! FCF_t     = NOPAT_t × (1 - reinvestment_rate_t)
//! PV_t      = FCF_t / (1 + WACC)^t
//! ```

use crate::projection::ProjectionAssumptions;
use serde::{Deserialize, Serialize};

/// Undiscounted operating projection for one forecast year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingForecast {
    /// Forecast year, starting at 1
    pub year: usize,
    /// Projected revenue
    pub revenue: f64,
    /// Projected EBIT
    pub ebit: f64,
    /// Projected NOPAT
    pub nopat: f64,
    /// Projected free cash flow
    pub fcf: f64,
}

/// A forecast year with its free cash flow discounted at one WACC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCashFlow {
    /// Forecast year, starting at 1
    pub year: usize,
    /// Projected revenue
    pub revenue: f64,
    /// Projected EBIT
    pub ebit: f64,
    /// Projected NOPAT
    pub nopat: f64,
    /// Projected free cash flow
    pub fcf: f64,
    /// Present value of `fcf`
    pub discounted_fcf: f64,
}

/// Roll revenue forward and derive EBIT, NOPAT and FCF for every year.
pub fn forecast_operations(
    starting_revenue: f64,
    assumptions: &ProjectionAssumptions,
    tax_rate: f64,
) -> Vec<OperatingForecast> {
    let mut revenue = starting_revenue;

    assumptions
        .years()
        .iter()
        .enumerate()
        .map(|(i, year)| {
            revenue *= 1.0 + year.growth_rate;
            let ebit = revenue * year.ebit_margin;
            let nopat = ebit * (1.0 - tax_rate);
            OperatingForecast {
                year: i + 1,
                revenue,
                ebit,
                nopat,
                fcf: nopat * (1.0 - year.reinvestment_rate),
            }
        })
        .collect()
}

/// Discount factor `1 / (1 + rate)^year`.
pub fn discount_factor(rate: f64, year: usize) -> f64 {
    let exponent = i32::try_from(year).unwrap_or(i32::MAX);
    1.0 / (1.0 + rate).powi(exponent)
}

/// Discount every forecast year at `wacc`.
pub fn discount(forecast: &[OperatingForecast], wacc: f64) -> Vec<ProjectedCashFlow> {
    forecast
        .iter()
        .map(|f| ProjectedCashFlow {
            year: f.year,
            revenue: f.revenue,
            ebit: f.ebit,
            nopat: f.nopat,
            fcf: f.fcf,
            discounted_fcf: f.fcf * discount_factor(wacc, f.year),
        })
        .collect()
}
