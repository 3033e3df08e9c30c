//! Low/mid/high scenario bands.
//!
//! The cost of capital is reported as a band driven by the confidence
//! interval of the equity beta. Every downstream stage carries one value per
//! band so the valuation can be read as a sensitivity range.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One of the three discount-rate scenarios.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Lower confidence bound of beta - lowest discount rate
    Low,
    /// Point estimate
    Mid,
    /// Upper confidence bound of beta - highest discount rate
    High,
}

impl Scenario {
    /// All scenarios in ascending order of discount rate.
    pub const ALL: [Self; 3] = [Self::Low, Self::Mid, Self::High];
}

/// One value per [`Scenario`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSet<T> {
    /// Value for the low scenario
    pub low: T,
    /// Value for the mid scenario
    pub mid: T,
    /// Value for the high scenario
    pub high: T,
}

impl<T> ScenarioSet<T> {
    /// Create a set from its three members.
    pub const fn new(low: T, mid: T, high: T) -> Self {
        Self { low, mid, high }
    }

    /// Value for the given scenario.
    pub const fn get(&self, scenario: Scenario) -> &T {
        match scenario {
            Scenario::Low => &self.low,
            Scenario::Mid => &self.mid,
            Scenario::High => &self.high,
        }
    }

    /// Apply `f` to every member, keeping the scenario positions.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> ScenarioSet<U> {
        ScenarioSet {
            low: f(&self.low),
            mid: f(&self.mid),
            high: f(&self.high),
        }
    }

    /// Iterate over `(scenario, value)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (Scenario, &T)> {
        Scenario::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

impl ScenarioSet<f64> {
    /// Whether `low <= mid <= high`.
    pub fn is_ordered(&self) -> bool {
        self.low <= self.mid && self.mid <= self.high
    }
}
