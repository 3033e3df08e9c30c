//! Error types for valuation computations.

use crate::Scenario;
use thiserror::Error;

/// Result type for valuation operations.
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Errors that can occur while computing cost of capital, historical
/// metrics, projections or valuations.
///
/// Ratios with a natural "undefined" reading (for example a reinvestment
/// rate when NOPAT is not positive) are reported as `f64::NAN` and never
/// surface as errors.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// Structurally invalid numeric input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Credit rating not present in the spread table
    #[error("Unknown credit rating: {0}")]
    UnknownRating(String),

    /// Explicit assumption series has the wrong length
    #[error("Shape mismatch for {assumption}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        /// Name of the offending assumption series
        assumption: String,
        /// Required number of values
        expected: usize,
        /// Supplied number of values
        actual: usize,
    },

    /// Terminal growth is not below the discount rate
    #[error(
        "Terminal growth {terminal_growth} must be below WACC {wacc} ({scenario} scenario)"
    )]
    InvalidTerminalGrowth {
        /// Scenario whose discount rate failed the check
        scenario: Scenario,
        /// Discount rate of that scenario
        wacc: f64,
        /// Requested terminal growth rate
        terminal_growth: f64,
    },

    /// Not enough observations for the computation
    #[error("Insufficient data: need {required} periods, got {available}")]
    InsufficientData {
        /// Required number of periods
        required: usize,
        /// Available number of periods
        available: usize,
    },

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Rejects non-finite values with [`ValuationError::InvalidInput`] naming the field.
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValuationError::InvalidInput(format!(
            "{name} must be finite, got {value}"
        )))
    }
}
