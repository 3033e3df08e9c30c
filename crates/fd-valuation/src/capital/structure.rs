//! Capital structure weights.
//!
//! Weights are computed from market values:
//! `w_E = E / (E + D)` and `w_D = 1 - w_E`.

use crate::{Result, ValuationError, error::ensure_finite};
use serde::{Deserialize, Serialize};

/// Market value of equity and book value of debt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructureInput {
    /// Market capitalization
    pub market_cap: f64,
    /// Total debt
    pub total_debt: f64,
}

/// Equity and debt weights of the capital structure.
///
/// The weights always sum to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructure {
    /// Share of equity in total capital
    pub equity_weight: f64,
    /// Share of debt in total capital
    pub debt_weight: f64,
}

impl CapitalStructure {
    /// Compute weights from market capitalization and total debt.
    ///
    /// # Errors
    /// [`ValuationError::InvalidInput`] if either input is negative or not
    /// finite, or if both are zero.
    pub fn from_input(input: &CapitalStructureInput) -> Result<Self> {
        ensure_finite("market_cap", input.market_cap)?;
        ensure_finite("total_debt", input.total_debt)?;

        if input.market_cap < 0.0 || input.total_debt < 0.0 {
            return Err(ValuationError::InvalidInput(format!(
                "market_cap and total_debt must be non-negative, got {} and {}",
                input.market_cap, input.total_debt
            )));
        }

        let total_capital = input.market_cap + input.total_debt;
        if total_capital == 0.0 {
            return Err(ValuationError::InvalidInput(
                "market_cap and total_debt are both zero".to_string(),
            ));
        }

        let equity_weight = input.market_cap / total_capital;
        Ok(Self {
            equity_weight,
            debt_weight: 1.0 - equity_weight,
        })
    }
}
