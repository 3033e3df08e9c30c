//! Equity beta by ordinary least squares.
//!
//! Regresses the stock's excess returns on the index's excess returns:
//! ```text
//! R_s - r_f = α + β (R_m - r_f) + ε
//! ```
//! and reports the slope with a Student-t confidence interval. The interval
//! bounds drive the low/high cost-of-equity scenarios.

use crate::{Result, ValuationError, error::ensure_finite};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Regression output used by the cost of equity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaEstimate {
    /// OLS slope
    pub point_estimate: f64,
    /// Lower bound of the confidence interval
    pub lower_ci: f64,
    /// Upper bound of the confidence interval
    pub upper_ci: f64,
    /// Coefficient of determination
    pub r_squared: f64,
}

impl BetaEstimate {
    /// Build an estimate from externally computed values.
    ///
    /// # Errors
    /// [`ValuationError::InvalidInput`] if any bound is not finite or the
    /// interval does not bracket the point estimate.
    pub fn new(point_estimate: f64, lower_ci: f64, upper_ci: f64, r_squared: f64) -> Result<Self> {
        let estimate = Self {
            point_estimate,
            lower_ci,
            upper_ci,
            r_squared,
        };
        estimate.validate()?;
        Ok(estimate)
    }

    /// Check that the interval brackets the point estimate.
    ///
    /// # Errors
    /// [`ValuationError::InvalidInput`] if any bound is not finite or
    /// `lower_ci <= point_estimate <= upper_ci` does not hold.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("beta", self.point_estimate)?;
        ensure_finite("beta lower_ci", self.lower_ci)?;
        ensure_finite("beta upper_ci", self.upper_ci)?;

        if self.lower_ci <= self.point_estimate && self.point_estimate <= self.upper_ci {
            Ok(())
        } else {
            Err(ValuationError::InvalidInput(format!(
                "beta confidence interval [{}, {}] does not bracket {}",
                self.lower_ci, self.upper_ci, self.point_estimate
            )))
        }
    }
}

/// Configuration for the beta regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetaRegressionConfig {
    /// Two-sided confidence level of the interval (0.95 = 95%).
    pub confidence_level: f64,
}

impl Default for BetaRegressionConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

/// Minimum number of returns: two for the fit plus one residual degree of freedom.
const MIN_RETURNS: usize = 3;

/// Estimate beta from aligned stock and index price series.
///
/// `risk_free_rate` is expressed per return period (monthly prices take a
/// monthly rate) and is subtracted from both return series.
///
/// # Errors
/// - [`ValuationError::ShapeMismatch`] if the series differ in length
/// - [`ValuationError::InsufficientData`] with fewer than four prices
/// - [`ValuationError::InvalidInput`] on non-positive or non-finite prices,
///   a flat index, or a confidence level outside (0, 1)
pub fn estimate_beta(
    stock_prices: &[f64],
    index_prices: &[f64],
    risk_free_rate: f64,
    config: &BetaRegressionConfig,
) -> Result<BetaEstimate> {
    if stock_prices.len() != index_prices.len() {
        return Err(ValuationError::ShapeMismatch {
            assumption: "index_prices".to_string(),
            expected: stock_prices.len(),
            actual: index_prices.len(),
        });
    }
    ensure_finite("risk_free_rate", risk_free_rate)?;
    if !(config.confidence_level > 0.0 && config.confidence_level < 1.0) {
        return Err(ValuationError::InvalidInput(format!(
            "confidence_level must lie in (0, 1), got {}",
            config.confidence_level
        )));
    }

    let stock = excess_returns(stock_prices, risk_free_rate)?;
    let index = excess_returns(index_prices, risk_free_rate)?;
    let n = stock.len();
    if n < MIN_RETURNS {
        return Err(ValuationError::InsufficientData {
            required: MIN_RETURNS + 1,
            available: stock_prices.len(),
        });
    }

    let n_f = n as f64;
    let mean_x = index.iter().sum::<f64>() / n_f;
    let mean_y = stock.iter().sum::<f64>() / n_f;

    let (sxx, sxy, syy) = index
        .iter()
        .zip(&stock)
        .fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), (x, y)| {
            let dx = x - mean_x;
            let dy = y - mean_y;
            (sxx + dx * dx, sxy + dx * dy, syy + dy * dy)
        });

    if sxx == 0.0 {
        return Err(ValuationError::InvalidInput(
            "index returns have zero variance".to_string(),
        ));
    }

    let beta = sxy / sxx;
    let alpha = mean_y - beta * mean_x;
    let ssr: f64 = index
        .iter()
        .zip(&stock)
        .map(|(x, y)| {
            let residual = y - alpha - beta * x;
            residual * residual
        })
        .sum();

    let dof = n_f - 2.0;
    let std_error = (ssr / dof / sxx).sqrt();
    let t = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| ValuationError::Computation(e.to_string()))?;
    let critical = t.inverse_cdf(0.5 + config.confidence_level / 2.0);
    let half_width = critical * std_error;

    let r_squared = if syy == 0.0 { f64::NAN } else { 1.0 - ssr / syy };

    tracing::debug!(beta, half_width, r_squared, observations = n, "estimated beta");

    Ok(BetaEstimate {
        point_estimate: beta,
        lower_ci: beta - half_width,
        upper_ci: beta + half_width,
        r_squared,
    })
}

fn excess_returns(prices: &[f64], risk_free_rate: f64) -> Result<Vec<f64>> {
    for &price in prices {
        if !(price.is_finite() && price > 0.0) {
            return Err(ValuationError::InvalidInput(format!(
                "prices must be positive and finite, got {price}"
            )));
        }
    }

    Ok(prices
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0 - risk_free_rate)
        .collect())
}
