//! Last-twelve-months revenue from quarterly statements.

use crate::{Result, ValuationError, error::ensure_finite};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Quarters in a trailing twelve-month window.
pub const QUARTERS_PER_YEAR: usize = 4;

/// Revenue reported for one fiscal quarter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyRevenue {
    /// Quarter end
    pub period_end: NaiveDate,
    /// Revenue for the quarter
    pub revenue: f64,
}

/// Trailing twelve-month revenue and the date it is measured at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LtmRevenue {
    /// Sum of the last four quarters
    pub revenue: f64,
    /// End of the most recent quarter
    pub period_end: NaiveDate,
}

/// Sum the four most recent quarters.
///
/// # Errors
/// - [`ValuationError::InsufficientData`] with fewer than four quarters
/// - [`ValuationError::InvalidInput`] if quarter ends are not strictly
///   increasing or a revenue figure in the window is not finite
pub fn ltm_revenue(quarters: &[QuarterlyRevenue]) -> Result<LtmRevenue> {
    if quarters.len() < QUARTERS_PER_YEAR {
        return Err(ValuationError::InsufficientData {
            required: QUARTERS_PER_YEAR,
            available: quarters.len(),
        });
    }
    if quarters
        .windows(2)
        .any(|pair| pair[0].period_end >= pair[1].period_end)
    {
        return Err(ValuationError::InvalidInput(
            "quarter ends must be strictly increasing".to_string(),
        ));
    }

    let window = &quarters[quarters.len() - QUARTERS_PER_YEAR..];
    for quarter in window {
        ensure_finite("quarterly revenue", quarter.revenue)?;
    }

    Ok(LtmRevenue {
        revenue: window.iter().map(|q| q.revenue).sum(),
        period_end: window[QUARTERS_PER_YEAR - 1].period_end,
    })
}
