//! Projection - forecast assumptions for the explicit DCF period
//!
//! Growth, EBIT margin and reinvestment assumptions are laid out year by year,
//! either interpolated between endpoints or given explicitly.

pub mod dates;
pub mod plausibility;
pub mod schedule;

pub use dates::projection_dates;
pub use plausibility::{AssumptionFlag, FlaggedAssumption, PlausibilityBounds, Range};
pub use schedule::{
    Endpoints, MAX_PROJECTION_YEARS, MIN_PROJECTION_YEARS, ProjectionAssumptions, ProjectionMode,
    YearAssumptions, interpolate, project,
};
