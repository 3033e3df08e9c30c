//! Discounted cash flow valuation across the WACC scenarios.
//!
//! The same operating forecast is discounted at the low, mid and high WACC.
//! Terminal value uses the Gordon Growth Model on the final year's FCF:
//! ```text
//! TV = FCF_N × (1 + g) / (WACC - g)
//! EV = Σ PV(FCF_t) + TV / (1 + WACC)^N
//! price = (EV - net debt) / shares outstanding
//! ```

use crate::{
    Result, Scenario, ScenarioSet, ValuationError,
    error::ensure_finite,
    projection::ProjectionAssumptions,
    valuation::cash_flow::{
        OperatingForecast, ProjectedCashFlow, discount, discount_factor, forecast_operations,
    },
};
use serde::{Deserialize, Serialize};

/// Everything needed to value the company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInputs {
    /// Revenue of the base year (usually LTM)
    pub starting_revenue: f64,
    /// Per-year forecast assumptions
    pub assumptions: ProjectionAssumptions,
    /// Discount rate per scenario, ordered low to high
    pub wacc: ScenarioSet<f64>,
    /// Perpetual growth rate after the forecast period
    pub terminal_growth_rate: f64,
    /// Effective tax rate applied to EBIT
    pub tax_rate: f64,
    /// Total debt less cash
    pub net_debt: f64,
    /// Diluted shares outstanding
    pub shares_outstanding: f64,
}

/// Valuation at a single discount rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioValuation {
    /// Scenario label
    pub scenario: Scenario,
    /// Discount rate used
    pub wacc: f64,
    /// Forecast years discounted at `wacc`
    pub cash_flows: Vec<ProjectedCashFlow>,
    /// Sum of discounted explicit-period FCF
    pub pv_explicit_fcf: f64,
    /// Gordon Growth terminal value at the end of the forecast
    pub terminal_value: f64,
    /// Present value of the terminal value
    pub pv_terminal_value: f64,
    /// Explicit plus terminal present value
    pub enterprise_value: f64,
    /// Enterprise value less net debt
    pub equity_value: f64,
    /// Equity value per share
    pub implied_share_price: f64,
}

impl ScenarioValuation {
    /// Share of enterprise value contributed by the terminal value.
    pub const fn terminal_value_share(&self) -> f64 {
        self.pv_terminal_value / self.enterprise_value
    }
}

/// Valuation under every WACC scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Undiscounted operating forecast shared by every scenario
    pub forecast: Vec<OperatingForecast>,
    /// Per-scenario valuation
    pub scenarios: ScenarioSet<ScenarioValuation>,
}

impl ValuationResult {
    /// Base-case valuation.
    pub const fn base(&self) -> &ScenarioValuation {
        &self.scenarios.mid
    }

    /// Lowest and highest implied share price across scenarios.
    pub fn price_range(&self) -> (f64, f64) {
        self.scenarios
            .iter()
            .map(|(_, v)| v.implied_share_price)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            })
    }

    /// Base-case upside over `current_price`, or `None` without a positive price.
    pub fn upside(&self, current_price: f64) -> Option<f64> {
        (current_price > 0.0).then(|| self.base().implied_share_price / current_price - 1.0)
    }
}

/// Net debt: total debt less cash and equivalents.
pub const fn net_debt(total_debt: f64, total_cash: f64) -> f64 {
    total_debt - total_cash
}

fn validate(inputs: &ValuationInputs) -> Result<()> {
    ensure_finite("starting_revenue", inputs.starting_revenue)?;
    ensure_finite("terminal_growth_rate", inputs.terminal_growth_rate)?;
    ensure_finite("tax_rate", inputs.tax_rate)?;
    ensure_finite("net_debt", inputs.net_debt)?;
    ensure_finite("shares_outstanding", inputs.shares_outstanding)?;

    if inputs.shares_outstanding <= 0.0 {
        return Err(ValuationError::InvalidInput(format!(
            "shares_outstanding must be positive, got {}",
            inputs.shares_outstanding
        )));
    }
    if inputs.assumptions.is_empty() {
        return Err(ValuationError::InvalidInput(
            "at least one forecast year is required".to_string(),
        ));
    }

    for (scenario, &wacc) in inputs.wacc.iter() {
        ensure_finite("wacc", wacc)?;
        if wacc <= -1.0 {
            return Err(ValuationError::InvalidInput(format!(
                "{scenario} WACC must exceed -100%, got {wacc}"
            )));
        }
    }
    if !inputs.wacc.is_ordered() {
        return Err(ValuationError::InvalidInput(format!(
            "WACC scenarios must be ordered low <= mid <= high, got {} / {} / {}",
            inputs.wacc.low, inputs.wacc.mid, inputs.wacc.high
        )));
    }

    // Every scenario is checked before any terminal value is computed.
    for (scenario, &wacc) in inputs.wacc.iter() {
        if wacc <= inputs.terminal_growth_rate {
            return Err(ValuationError::InvalidTerminalGrowth {
                scenario,
                wacc,
                terminal_growth: inputs.terminal_growth_rate,
            });
        }
    }

    Ok(())
}

fn value_scenario(
    scenario: Scenario,
    wacc: f64,
    forecast: &[OperatingForecast],
    inputs: &ValuationInputs,
) -> ScenarioValuation {
    let cash_flows = discount(forecast, wacc);
    let pv_explicit_fcf: f64 = cash_flows.iter().map(|cf| cf.discounted_fcf).sum();

    let g = inputs.terminal_growth_rate;
    let final_fcf = forecast.last().map_or(0.0, |f| f.fcf);
    let terminal_value = final_fcf * (1.0 + g) / (wacc - g);
    let pv_terminal_value = terminal_value * discount_factor(wacc, forecast.len());

    let enterprise_value = pv_explicit_fcf + pv_terminal_value;
    let equity_value = enterprise_value - inputs.net_debt;
    let implied_share_price = equity_value / inputs.shares_outstanding;

    tracing::debug!(
        %scenario,
        wacc,
        enterprise_value,
        implied_share_price,
        "valued scenario"
    );

    ScenarioValuation {
        scenario,
        wacc,
        cash_flows,
        pv_explicit_fcf,
        terminal_value,
        pv_terminal_value,
        enterprise_value,
        equity_value,
        implied_share_price,
    }
}

/// Value the company under the low, mid and high WACC.
///
/// Every scenario shares the same forecast; only the discount rate differs.
/// With positive free cash flows the implied price falls as WACC rises.
///
/// # Errors
/// - [`ValuationError::InvalidTerminalGrowth`] if any scenario's WACC is not
///   above the terminal growth rate; no scenario is valued in that case
/// - [`ValuationError::InvalidInput`] for non-finite inputs, non-positive
///   shares outstanding, a WACC at or below -100% or unordered scenarios
pub fn value_company(inputs: &ValuationInputs) -> Result<ValuationResult> {
    validate(inputs)?;

    let forecast = forecast_operations(inputs.starting_revenue, &inputs.assumptions, inputs.tax_rate);
    let value_at = |scenario| {
        let wacc = *inputs.wacc.get(scenario);
        value_scenario(scenario, wacc, &forecast, inputs)
    };
    let scenarios = ScenarioSet::new(
        value_at(Scenario::Low),
        value_at(Scenario::Mid),
        value_at(Scenario::High),
    );

    Ok(ValuationResult {
        forecast,
        scenarios,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::YearAssumptions;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn reference_inputs(wacc: ScenarioSet<f64>) -> ValuationInputs {
        ValuationInputs {
            starting_revenue: 1000.0,
            assumptions: ProjectionAssumptions::new(vec![
                YearAssumptions {
                    growth_rate: 0.05,
                    ebit_margin: 0.20,
                    reinvestment_rate: 0.10,
                };
                5
            ])
            .unwrap(),
            wacc,
            terminal_growth_rate: 0.02,
            tax_rate: 0.25,
            net_debt: 0.0,
            shares_outstanding: 100.0,
        }
    }

    #[test]
    fn test_reference_valuation() {
        let result = value_company(&reference_inputs(ScenarioSet::new(0.08, 0.08, 0.08))).unwrap();
        let base = result.base();

        let last = base.cash_flows.last().unwrap();
        assert_relative_eq!(last.revenue, 1276.281_562_5, max_relative = 1e-6);
        assert_relative_eq!(last.fcf, 172.298_010_937_5, max_relative = 1e-6);
        assert_relative_eq!(base.terminal_value, 2929.066_185_937_5, max_relative = 1e-6);

        let expected_pv: f64 = (1..=5)
            .map(|t| {
                let revenue = 1000.0 * 1.05_f64.powi(t);
                revenue * 0.20 * 0.75 * 0.90 / 1.08_f64.powi(t)
            })
            .sum();
        assert_relative_eq!(base.pv_explicit_fcf, expected_pv, max_relative = 1e-6);
        assert_relative_eq!(base.pv_explicit_fcf, 620.790_410_576, max_relative = 1e-6);
        assert_relative_eq!(
            base.pv_terminal_value,
            2929.066_185_937_5 / 1.08_f64.powi(5),
            max_relative = 1e-6
        );
        assert_relative_eq!(base.enterprise_value, 2614.263_639_725, max_relative = 1e-6);
        assert_relative_eq!(base.equity_value, base.enterprise_value);
        assert_relative_eq!(base.implied_share_price, 26.142_636_397, max_relative = 1e-6);
    }

    #[test]
    fn test_scenarios_share_forecast_and_prices_fall_with_wacc() {
        let result = value_company(&reference_inputs(ScenarioSet::new(0.07, 0.08, 0.095))).unwrap();
        let s = &result.scenarios;

        for (_, valuation) in s.iter() {
            for (cf, op) in valuation.cash_flows.iter().zip(&result.forecast) {
                assert_eq!(cf.fcf, op.fcf);
                assert_eq!(cf.revenue, op.revenue);
            }
        }
        assert!(s.low.implied_share_price > s.mid.implied_share_price);
        assert!(s.mid.implied_share_price > s.high.implied_share_price);

        let (lo, hi) = result.price_range();
        assert_eq!(lo, s.high.implied_share_price);
        assert_eq!(hi, s.low.implied_share_price);
    }

    #[rstest]
    #[case(ScenarioSet::new(0.05, 0.05, 0.05), 0.05, Scenario::Low)]
    #[case(ScenarioSet::new(0.03, 0.06, 0.08), 0.04, Scenario::Low)]
    #[case(ScenarioSet::new(0.06, 0.07, 0.08), 0.07, Scenario::Low)]
    fn test_terminal_growth_at_or_above_wacc(
        #[case] wacc: ScenarioSet<f64>,
        #[case] g: f64,
        #[case] failing: Scenario,
    ) {
        let mut inputs = reference_inputs(wacc);
        inputs.terminal_growth_rate = g;

        match value_company(&inputs) {
            Err(ValuationError::InvalidTerminalGrowth {
                scenario,
                terminal_growth,
                ..
            }) => {
                assert_eq!(scenario, failing);
                assert_eq!(terminal_growth, g);
            }
            other => panic!("expected InvalidTerminalGrowth, got {other:?}"),
        }
    }

    #[test]
    fn test_net_debt_reduces_equity() {
        let mut inputs = reference_inputs(ScenarioSet::new(0.08, 0.08, 0.08));
        inputs.net_debt = net_debt(500.0, 100.0);
        let result = value_company(&inputs).unwrap();

        let base = result.base();
        assert_relative_eq!(base.equity_value, base.enterprise_value - 400.0, epsilon = 1e-9);
        assert_relative_eq!(base.implied_share_price, base.equity_value / 100.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    fn test_invalid_shares_outstanding(#[case] shares: f64) {
        let mut inputs = reference_inputs(ScenarioSet::new(0.08, 0.08, 0.08));
        inputs.shares_outstanding = shares;
        assert!(matches!(
            value_company(&inputs),
            Err(ValuationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unordered_wacc_is_rejected() {
        let inputs = reference_inputs(ScenarioSet::new(0.09, 0.08, 0.10));
        assert!(matches!(
            value_company(&inputs),
            Err(ValuationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_upside_and_terminal_share() {
        let result = value_company(&reference_inputs(ScenarioSet::new(0.08, 0.08, 0.08))).unwrap();
        let price = result.base().implied_share_price;

        assert_relative_eq!(result.upside(price / 2.0).unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(result.upside(0.0), None);

        let share = result.base().terminal_value_share();
        assert!(share > 0.7 && share < 0.8);
    }

    #[test]
    fn test_idempotent() {
        let inputs = reference_inputs(ScenarioSet::new(0.07, 0.08, 0.09));
        let first = value_company(&inputs).unwrap();
        let second = value_company(&inputs).unwrap();

        assert_eq!(first, second);
        for ((_, a), (_, b)) in first.scenarios.iter().zip(second.scenarios.iter()) {
            assert_eq!(
                a.implied_share_price.to_bits(),
                b.implied_share_price.to_bits()
            );
        }
    }
}
