//! Credit spread lookup.
//!
//! Default spreads over the risk-free rate by synthetic credit rating, with
//! the interest coverage band each rating corresponds to. The values are the
//! Damodaran large-firm reference table.

use crate::{Result, ValuationError, error::ensure_finite};
use serde::Serialize;

/// A row of the credit spread table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditRating {
    /// Rating label, Moody's and S&P joined with a slash (e.g. `Baa2/BBB`)
    pub rating: &'static str,
    /// Lower bound of the interest coverage band
    pub min_coverage: f64,
    /// Upper bound of the interest coverage band
    pub max_coverage: f64,
    /// Default spread as a decimal (0.012 = 1.20%)
    pub spread: f64,
}

const fn entry(
    rating: &'static str,
    min_coverage: f64,
    max_coverage: f64,
    spread: f64,
) -> CreditRating {
    CreditRating {
        rating,
        min_coverage,
        max_coverage,
        spread,
    }
}

/// Ordered from the weakest to the strongest rating.
static SPREADS: [CreditRating; 15] = [
    entry("D2/D", -100_000.0, 0.199999, 0.19),
    entry("C2/C", 0.2, 0.649999, 0.155),
    entry("Ca2/CC", 0.65, 0.799999, 0.101),
    entry("Caa/CCC", 0.8, 1.249999, 0.0728),
    entry("B3/B-", 1.25, 1.499999, 0.0442),
    entry("B2/B", 1.5, 1.749999, 0.03),
    entry("B1/B+", 1.75, 1.999999, 0.0261),
    entry("Ba2/BB", 2.0, 2.2499999, 0.0183),
    entry("Ba1/BB+", 2.25, 2.49999, 0.0155),
    entry("Baa2/BBB", 2.5, 2.999999, 0.012),
    entry("A3/A-", 3.0, 4.249999, 0.0095),
    entry("A2/A", 4.25, 5.499999, 0.0085),
    entry("A1/A+", 5.5, 6.499999, 0.0077),
    entry("Aa2/AA", 6.5, 8.499999, 0.006),
    entry("Aaa/AAA", 8.5, 100_000.0, 0.0045),
];

/// Static credit spread table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditSpreadTable;

impl CreditSpreadTable {
    /// All rows, weakest rating first.
    pub fn entries() -> &'static [CreditRating] {
        &SPREADS
    }

    /// Spread for a rating label.
    ///
    /// The label must match exactly; no case folding or trimming is applied.
    ///
    /// # Errors
    /// [`ValuationError::UnknownRating`] if the label is not in the table.
    pub fn lookup(rating: &str) -> Result<f64> {
        SPREADS
            .iter()
            .find(|entry| entry.rating == rating)
            .map(|entry| entry.spread)
            .ok_or_else(|| ValuationError::UnknownRating(rating.to_string()))
    }

    /// Synthetic rating for an interest coverage ratio (EBIT / interest expense).
    ///
    /// Picks the strongest rating whose lower coverage bound does not exceed
    /// `coverage`, so values falling in the small gaps between published
    /// bands take the weaker rating.
    ///
    /// # Errors
    /// [`ValuationError::InvalidInput`] if `coverage` is not finite.
    pub fn rating_for_interest_coverage(coverage: f64) -> Result<&'static CreditRating> {
        ensure_finite("interest coverage", coverage)?;

        Ok(SPREADS
            .iter()
            .rev()
            .find(|entry| coverage >= entry.min_coverage)
            .unwrap_or(&SPREADS[0]))
    }
}
