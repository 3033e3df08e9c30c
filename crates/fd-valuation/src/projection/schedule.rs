//! Assumption schedules for the explicit forecast period.
//!
//! Two ways to describe the N forecast years:
//!
//! - **Simple**: a start and end value per assumption, linearly interpolated
//!   across the period, both endpoints included.
//! - **Advanced**: one explicit value per year for each assumption.

use crate::{
    Result, ValuationError,
    error::ensure_finite,
    historical::MetricAverages,
    projection::PlausibilityBounds,
};
use serde::{Deserialize, Serialize};

/// Shortest supported forecast period, in years.
pub const MIN_PROJECTION_YEARS: usize = 5;

/// Longest supported forecast period, in years.
pub const MAX_PROJECTION_YEARS: usize = 15;

/// First and last value of a linearly interpolated assumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Value in the first forecast year
    pub start: f64,
    /// Value in the last forecast year
    pub end: f64,
}

impl Endpoints {
    /// Endpoints of a schedule that moves from `start` to `end`.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// A flat schedule.
    pub const fn constant(value: f64) -> Self {
        Self::new(value, value)
    }
}

/// How the forecast assumptions are specified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Linear interpolation between per-assumption endpoints
    Simple {
        /// Revenue growth endpoints
        growth_rate: Endpoints,
        /// EBIT margin endpoints
        ebit_margin: Endpoints,
        /// Reinvestment rate endpoints
        reinvestment_rate: Endpoints,
    },
    /// Explicit value per forecast year
    Advanced {
        /// Revenue growth per year
        growth_rate: Vec<f64>,
        /// EBIT margin per year
        ebit_margin: Vec<f64>,
        /// Reinvestment rate per year
        reinvestment_rate: Vec<f64>,
    },
}

impl ProjectionMode {
    /// Flat simple-mode schedule at the historical averages.
    ///
    /// # Errors
    /// [`ValuationError::InvalidInput`] if an average is undefined.
    pub fn from_averages(averages: &MetricAverages) -> Result<Self> {
        ensure_finite("average revenue growth", averages.revenue_growth)?;
        ensure_finite("average EBIT margin", averages.ebit_margin)?;
        ensure_finite("average reinvestment rate", averages.reinvestment_rate)?;

        Ok(Self::Simple {
            growth_rate: Endpoints::constant(averages.revenue_growth),
            ebit_margin: Endpoints::constant(averages.ebit_margin),
            reinvestment_rate: Endpoints::constant(averages.reinvestment_rate),
        })
    }
}

/// Assumptions for a single forecast year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearAssumptions {
    /// Revenue growth over the prior year
    pub growth_rate: f64,
    /// EBIT as a share of revenue
    pub ebit_margin: f64,
    /// Share of NOPAT reinvested; negative values release cash
    pub reinvestment_rate: f64,
}

/// Forecast assumptions, one entry per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<YearAssumptions>", into = "Vec<YearAssumptions>")]
pub struct ProjectionAssumptions {
    years: Vec<YearAssumptions>,
}

impl ProjectionAssumptions {
    /// Wrap explicit per-year assumptions.
    ///
    /// # Errors
    /// [`ValuationError::InvalidInput`] if `years` is empty or holds a
    /// non-finite value.
    pub fn new(years: Vec<YearAssumptions>) -> Result<Self> {
        if years.is_empty() {
            return Err(ValuationError::InvalidInput(
                "at least one forecast year is required".to_string(),
            ));
        }
        for year in &years {
            ensure_finite("growth_rate", year.growth_rate)?;
            ensure_finite("ebit_margin", year.ebit_margin)?;
            ensure_finite("reinvestment_rate", year.reinvestment_rate)?;
        }
        Ok(Self { years })
    }

    /// Per-year assumptions, first forecast year first.
    pub fn years(&self) -> &[YearAssumptions] {
        &self.years
    }

    /// Number of forecast years.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Always false for a validated schedule.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

impl TryFrom<Vec<YearAssumptions>> for ProjectionAssumptions {
    type Error = ValuationError;

    fn try_from(years: Vec<YearAssumptions>) -> Result<Self> {
        Self::new(years)
    }
}

impl From<ProjectionAssumptions> for Vec<YearAssumptions> {
    fn from(assumptions: ProjectionAssumptions) -> Self {
        assumptions.years
    }
}

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// The first value is exactly `start` and the last exactly `end`. A single
/// value is `start`.
pub fn interpolate(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let steps = (n - 1) as f64;
            let mut values: Vec<f64> = (0..n)
                .map(|t| start + (end - start) * (t as f64 / steps))
                .collect();
            values[n - 1] = end;
            values
        }
    }
}

fn explicit(name: &str, values: &[f64], years: usize) -> Result<Vec<f64>> {
    if values.len() != years {
        return Err(ValuationError::ShapeMismatch {
            assumption: name.to_string(),
            expected: years,
            actual: values.len(),
        });
    }
    Ok(values.to_vec())
}

/// Expand a projection mode into per-year assumptions.
///
/// `starting_revenue` is the base the schedule will be applied to; it is
/// validated here so a schedule is never produced for an unusable base.
/// Implausible growth rates and margins are logged, not rejected.
///
/// # Errors
/// - [`ValuationError::InvalidInput`] if `years` is outside
///   [`MIN_PROJECTION_YEARS`]..=[`MAX_PROJECTION_YEARS`], `starting_revenue`
///   is not positive and finite, or an assumption is not finite
/// - [`ValuationError::ShapeMismatch`] if an advanced-mode series does not
///   have exactly `years` values
pub fn project(
    starting_revenue: f64,
    mode: &ProjectionMode,
    years: usize,
) -> Result<ProjectionAssumptions> {
    if !(MIN_PROJECTION_YEARS..=MAX_PROJECTION_YEARS).contains(&years) {
        return Err(ValuationError::InvalidInput(format!(
            "projection period must be {MIN_PROJECTION_YEARS} to {MAX_PROJECTION_YEARS} years, got {years}"
        )));
    }
    ensure_finite("starting_revenue", starting_revenue)?;
    if starting_revenue <= 0.0 {
        return Err(ValuationError::InvalidInput(format!(
            "starting_revenue must be positive, got {starting_revenue}"
        )));
    }

    let (growth, margin, reinvestment) = match mode {
        ProjectionMode::Simple {
            growth_rate,
            ebit_margin,
            reinvestment_rate,
        } => (
            interpolate(growth_rate.start, growth_rate.end, years),
            interpolate(ebit_margin.start, ebit_margin.end, years),
            interpolate(reinvestment_rate.start, reinvestment_rate.end, years),
        ),
        ProjectionMode::Advanced {
            growth_rate,
            ebit_margin,
            reinvestment_rate,
        } => (
            explicit("growth_rate", growth_rate, years)?,
            explicit("ebit_margin", ebit_margin, years)?,
            explicit("reinvestment_rate", reinvestment_rate, years)?,
        ),
    };

    let assumptions = ProjectionAssumptions::new(
        growth
            .into_iter()
            .zip(margin)
            .zip(reinvestment)
            .map(|((growth_rate, ebit_margin), reinvestment_rate)| YearAssumptions {
                growth_rate,
                ebit_margin,
                reinvestment_rate,
            })
            .collect(),
    )?;

    for flag in assumptions.flags(&PlausibilityBounds::default()) {
        tracing::warn!(%flag, "implausible projection assumption");
    }

    Ok(assumptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn simple() -> ProjectionMode {
        ProjectionMode::Simple {
            growth_rate: Endpoints::new(0.15, 0.06),
            ebit_margin: Endpoints::constant(0.46),
            reinvestment_rate: Endpoints::new(0.40, 0.20),
        }
    }

    #[rstest]
    #[case(0.15, 0.06, 2)]
    #[case(0.15, 0.06, 10)]
    #[case(0.1, 0.7, 7)]
    #[case(-0.3, 0.123456789, 15)]
    #[case(0.0, 1.0, 3)]
    fn test_interpolation_endpoints_exact(#[case] start: f64, #[case] end: f64, #[case] n: usize) {
        let values = interpolate(start, end, n);
        assert_eq!(values.len(), n);
        assert_eq!(values[0], start);
        assert_eq!(values[n - 1], end);
    }

    #[test]
    fn test_interpolation_is_linear() {
        let values = interpolate(0.40, 0.20, 5);
        let expected = [0.40, 0.35, 0.30, 0.25, 0.20];
        for (value, expected) in values.iter().zip(expected) {
            assert_relative_eq!(*value, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_interpolation_degenerate_lengths() {
        assert!(interpolate(0.1, 0.2, 0).is_empty());
        assert_eq!(interpolate(0.1, 0.2, 1), vec![0.1]);
    }

    #[test]
    fn test_simple_mode() {
        let assumptions = project(1000.0, &simple(), 10).unwrap();
        let years = assumptions.years();

        assert_eq!(assumptions.len(), 10);
        assert_eq!(years[0].growth_rate, 0.15);
        assert_eq!(years[9].growth_rate, 0.06);
        assert_relative_eq!(years[3].growth_rate, 0.12, epsilon = 1e-12);
        assert!(years.iter().all(|y| y.ebit_margin == 0.46));
        assert_eq!(years[0].reinvestment_rate, 0.40);
        assert_eq!(years[9].reinvestment_rate, 0.20);
    }

    #[test]
    fn test_advanced_mode() {
        let mode = ProjectionMode::Advanced {
            growth_rate: vec![0.20, 0.15, 0.15, 0.15, 0.10],
            ebit_margin: vec![0.46; 5],
            reinvestment_rate: vec![0.40, 0.40, 0.30, -0.10, 0.20],
        };

        let assumptions = project(500.0, &mode, 5).unwrap();
        assert_eq!(assumptions.years()[0].growth_rate, 0.20);
        assert_eq!(assumptions.years()[3].reinvestment_rate, -0.10);
    }

    #[rstest]
    #[case(4, 5, 5, "growth_rate", 4)]
    #[case(5, 6, 5, "ebit_margin", 6)]
    #[case(5, 5, 3, "reinvestment_rate", 3)]
    fn test_advanced_mode_shape_mismatch(
        #[case] growth_len: usize,
        #[case] margin_len: usize,
        #[case] reinvestment_len: usize,
        #[case] expected_name: &str,
        #[case] expected_actual: usize,
    ) {
        let mode = ProjectionMode::Advanced {
            growth_rate: vec![0.1; growth_len],
            ebit_margin: vec![0.3; margin_len],
            reinvestment_rate: vec![0.2; reinvestment_len],
        };

        match project(100.0, &mode, 5) {
            Err(ValuationError::ShapeMismatch {
                assumption,
                expected,
                actual,
            }) => {
                assert_eq!(assumption, expected_name);
                assert_eq!(expected, 5);
                assert_eq!(actual, expected_actual);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[rstest]
    #[case(4)]
    #[case(16)]
    #[case(0)]
    fn test_projection_period_bounds(#[case] years: usize) {
        assert!(matches!(
            project(100.0, &simple(), years),
            Err(ValuationError::InvalidInput(_))
        ));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-10.0)]
    #[case(f64::NAN)]
    fn test_invalid_starting_revenue(#[case] revenue: f64) {
        assert!(matches!(
            project(revenue, &simple(), 5),
            Err(ValuationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_finite_assumption_is_rejected() {
        let mode = ProjectionMode::Advanced {
            growth_rate: vec![0.1, 0.1, f64::INFINITY, 0.1, 0.1],
            ebit_margin: vec![0.3; 5],
            reinvestment_rate: vec![0.2; 5],
        };
        assert!(matches!(
            project(100.0, &mode, 5),
            Err(ValuationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_averages() {
        let averages = MetricAverages {
            revenue_growth: 0.08,
            ebit_growth: 0.1,
            gross_margin: 0.6,
            ebit_margin: 0.3,
            ebitda_margin: 0.35,
            tax_rate: 0.2,
            reinvestment_rate: 0.25,
        };
        let assumptions = project(100.0, &ProjectionMode::from_averages(&averages).unwrap(), 6)
            .unwrap();
        assert!(assumptions.years().iter().all(|y| y.growth_rate == 0.08
            && y.ebit_margin == 0.3
            && y.reinvestment_rate == 0.25));

        let undefined = MetricAverages {
            reinvestment_rate: f64::NAN,
            ..averages
        };
        assert!(ProjectionMode::from_averages(&undefined).is_err());
    }

    #[test]
    fn test_mode_deserializes_from_tagged_json() {
        let json = r#"{
            "mode": "simple",
            "growth_rate": {"start": 0.15, "end": 0.06},
            "ebit_margin": {"start": 0.46, "end": 0.46},
            "reinvestment_rate": {"start": 0.4, "end": 0.2}
        }"#;
        let mode: ProjectionMode = serde_json::from_str(json).unwrap();
        assert_eq!(mode, simple());
    }

    #[test]
    fn test_implausible_assumptions_are_projected_and_flagged() {
        let mode = ProjectionMode::Simple {
            growth_rate: Endpoints::new(6.0, 0.05),
            ebit_margin: Endpoints::constant(0.2),
            reinvestment_rate: Endpoints::constant(0.1),
        };
        let assumptions = project(100.0, &mode, 5).unwrap();

        assert_eq!(assumptions.years()[0].growth_rate, 6.0);
        let flags = assumptions.flags(&PlausibilityBounds::default());
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].year, 1);
    }
}
