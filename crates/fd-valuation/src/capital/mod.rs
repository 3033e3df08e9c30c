//! Cost of capital - capital structure weights, credit spreads, beta and WACC
//!
//! The weighted average cost of capital blends a CAPM cost of equity with an
//! after-tax cost of debt priced off a synthetic credit rating.

pub mod beta;
pub mod cost;
pub mod credit;
pub mod structure;

pub use beta::{BetaEstimate, BetaRegressionConfig, estimate_beta};
pub use cost::{CostOfCapitalInputs, CostOfCapitalResult, compute_wacc};
pub use credit::{CreditRating, CreditSpreadTable};
pub use structure::{CapitalStructure, CapitalStructureInput};
