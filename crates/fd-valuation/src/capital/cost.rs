//! Weighted average cost of capital.
//!
//! ```text
//! k_E  = r_f + β × EMRP                    (CAPM)
//! k_D  = r_f + spread(rating)
//! WACC = w_E × k_E + w_D × k_D × (1 - t)
//! ```
//!
//! The cost of equity is evaluated at the lower confidence bound, the point
//! estimate and the upper confidence bound of beta, giving the low, mid and
//! high WACC scenarios.

use crate::{
    Result, ScenarioSet, ValuationError,
    capital::{BetaEstimate, CapitalStructure, CapitalStructureInput, CreditSpreadTable},
    error::ensure_finite,
};
use serde::{Deserialize, Serialize};

/// Market and firm inputs for the cost of capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOfCapitalInputs {
    /// Risk-free rate (decimal)
    pub risk_free_rate: f64,
    /// Regression beta with its confidence interval
    pub beta: BetaEstimate,
    /// Equity market risk premium (decimal)
    pub equity_risk_premium: f64,
    /// Credit rating label, matched exactly against the spread table
    pub credit_rating: String,
    /// Marginal tax rate (decimal)
    pub marginal_tax_rate: f64,
}

/// Cost of capital with its low/mid/high band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostOfCapitalResult {
    /// Share of equity in total capital
    pub equity_weight: f64,
    /// Share of debt in total capital
    pub debt_weight: f64,
    /// Credit spread for the rating
    pub credit_spread: f64,
    /// CAPM cost of equity per scenario
    pub cost_of_equity: ScenarioSet<f64>,
    /// Pre-tax cost of debt
    pub cost_of_debt: f64,
    /// Cost of debt after the tax shield
    pub after_tax_cost_of_debt: f64,
    /// WACC per scenario
    pub wacc: ScenarioSet<f64>,
}

/// CAPM cost of equity.
pub fn cost_of_equity(risk_free_rate: f64, beta: f64, equity_risk_premium: f64) -> f64 {
    risk_free_rate + beta * equity_risk_premium
}

/// Compute the WACC band for a capital structure and market inputs.
///
/// # Errors
/// - [`ValuationError::InvalidInput`] for an invalid capital structure,
///   non-finite rates, a negative risk premium, a tax rate outside `[0, 1]`
///   or a beta interval that does not bracket the point estimate
/// - [`ValuationError::UnknownRating`] if the rating is not in the table
pub fn compute_wacc(
    structure: &CapitalStructureInput,
    inputs: &CostOfCapitalInputs,
) -> Result<CostOfCapitalResult> {
    let weights = CapitalStructure::from_input(structure)?;

    ensure_finite("risk_free_rate", inputs.risk_free_rate)?;
    ensure_finite("equity_risk_premium", inputs.equity_risk_premium)?;
    ensure_finite("marginal_tax_rate", inputs.marginal_tax_rate)?;
    inputs.beta.validate()?;

    if inputs.equity_risk_premium < 0.0 {
        return Err(ValuationError::InvalidInput(format!(
            "equity_risk_premium must be non-negative, got {}",
            inputs.equity_risk_premium
        )));
    }
    if !(0.0..=1.0).contains(&inputs.marginal_tax_rate) {
        return Err(ValuationError::InvalidInput(format!(
            "marginal_tax_rate must lie in [0, 1], got {}",
            inputs.marginal_tax_rate
        )));
    }

    let credit_spread = CreditSpreadTable::lookup(&inputs.credit_rating)?;
    let cost_of_debt = inputs.risk_free_rate + credit_spread;
    let after_tax_cost_of_debt = cost_of_debt * (1.0 - inputs.marginal_tax_rate);

    let betas = ScenarioSet::new(
        inputs.beta.lower_ci,
        inputs.beta.point_estimate,
        inputs.beta.upper_ci,
    );
    let equity_costs = betas
        .map(|beta| cost_of_equity(inputs.risk_free_rate, *beta, inputs.equity_risk_premium));
    let wacc = equity_costs.map(|k_e| {
        weights.equity_weight * k_e + weights.debt_weight * after_tax_cost_of_debt
    });

    tracing::debug!(
        rating = %inputs.credit_rating,
        wacc_low = wacc.low,
        wacc_mid = wacc.mid,
        wacc_high = wacc.high,
        "computed cost of capital"
    );

    Ok(CostOfCapitalResult {
        equity_weight: weights.equity_weight,
        debt_weight: weights.debt_weight,
        credit_spread,
        cost_of_equity: equity_costs,
        cost_of_debt,
        after_tax_cost_of_debt,
        wacc,
    })
}
