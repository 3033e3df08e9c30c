//! Plausibility checks for forecast assumptions.
//!
//! Out-of-range values are legal inputs; they are reported so a caller can
//! surface them next to the valuation.

use crate::projection::ProjectionAssumptions;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Inclusive range considered plausible for an assumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lowest plausible value
    pub min: f64,
    /// Highest plausible value
    pub max: f64,
}

impl Range {
    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Plausible ranges for growth rates and EBIT margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlausibilityBounds {
    /// Revenue growth range (default -100% to 500%)
    pub growth: Range,
    /// EBIT margin range (default -100% to 100%)
    pub margin: Range,
}

impl Default for PlausibilityBounds {
    fn default() -> Self {
        Self {
            growth: Range {
                min: -1.0,
                max: 5.0,
            },
            margin: Range {
                min: -1.0,
                max: 1.0,
            },
        }
    }
}

/// Assumption kind a flag refers to.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlaggedAssumption {
    /// Revenue growth rate
    #[display("growth rate")]
    GrowthRate,
    /// EBIT margin
    #[display("EBIT margin")]
    EbitMargin,
}

/// An assumption value outside its plausible range.
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[display("year {year}: {assumption} {value} outside [{min}, {max}]")]
pub struct AssumptionFlag {
    /// Forecast year, starting at 1
    pub year: usize,
    /// Which assumption is out of range
    pub assumption: FlaggedAssumption,
    /// The offending value
    pub value: f64,
    /// Lower plausible bound
    pub min: f64,
    /// Upper plausible bound
    pub max: f64,
}

impl ProjectionAssumptions {
    /// List every growth rate or margin outside `bounds`, first year first.
    pub fn flags(&self, bounds: &PlausibilityBounds) -> Vec<AssumptionFlag> {
        let mut flags = Vec::new();

        for (i, year) in self.years().iter().enumerate() {
            let checks = [
                (FlaggedAssumption::GrowthRate, year.growth_rate, bounds.growth),
                (FlaggedAssumption::EbitMargin, year.ebit_margin, bounds.margin),
            ];
            for (assumption, value, range) in checks {
                if !range.contains(value) {
                    flags.push(AssumptionFlag {
                        year: i + 1,
                        assumption,
                        value,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
        }

        flags
    }
}
