//! Per-mu crop economics.
//!
//! Every function here is a plain arithmetic transform. None of them reject
//! their inputs: a loss-making crop yields a negative profit, and divisions
//! with a zero denominator resolve to the sentinel documented on each call.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::data::CropEconomics;

/// Value reported by [`percentage_delta`] when the baseline is zero.
///
/// Conflates "no baseline" with "unbounded growth". Reported by the planner's
/// per-plot improvement column and plan headline, the scheme comparison, and
/// the risk simulator's profit change for a zero-profit crop.
pub const PERCENT_DELTA_FALLBACK: f64 = 100.0;

/// Profit per mu: `yield * price - cost`.
pub fn profit_per_mu(yield_per_mu: f64, price_per_unit: f64, cost_per_mu: f64) -> f64 {
    yield_per_mu * price_per_unit - cost_per_mu
}

/// Relative change from `old` to `new`, in percent.
///
/// Returns [`PERCENT_DELTA_FALLBACK`] when `old` is zero or not finite.
pub fn percentage_delta(old: f64, new: f64) -> f64 {
    if old == 0.0 || !old.is_finite() {
        return PERCENT_DELTA_FALLBACK;
    }
    (new - old) / old * 100.0
}

/// Planner variant of [`percentage_delta`]: any non-positive baseline
/// (including crops missing from the economics table) uses the fallback.
pub fn improvement_over(current: f64, expected: f64) -> f64 {
    if current > 0.0 {
        percentage_delta(current, expected)
    } else {
        PERCENT_DELTA_FALLBACK
    }
}

/// Scale `base_value` by a signed percentage. A zero change is the identity.
pub fn scenario_adjustment(base_value: f64, percent_change: f64) -> f64 {
    base_value * (1.0 + percent_change / 100.0)
}

/// Profit over cost. `None` when the cost is zero.
pub fn input_output_ratio(profit_per_mu: f64, cost_per_mu: f64) -> Option<f64> {
    if cost_per_mu == 0.0 {
        None
    } else {
        Some(profit_per_mu / cost_per_mu)
    }
}

/// Independent percentage shifts applied to a crop's yield, price and cost.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct ScenarioShift {
    pub yield_pct: f64,
    pub price_pct: f64,
    pub cost_pct: f64,
}

/// A crop's economics after a [`ScenarioShift`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct StressedEconomics {
    pub yield_per_mu: f64,
    pub price_per_unit: f64,
    pub cost_per_mu: f64,
    pub profit_per_mu: f64,
}

pub fn stress(crop: &CropEconomics, shift: ScenarioShift) -> StressedEconomics {
    let yield_per_mu = scenario_adjustment(crop.yield_per_mu, shift.yield_pct);
    let price_per_unit = scenario_adjustment(crop.price_per_unit, shift.price_pct);
    let cost_per_mu = scenario_adjustment(crop.cost_per_mu, shift.cost_pct);
    StressedEconomics {
        yield_per_mu,
        price_per_unit,
        cost_per_mu,
        profit_per_mu: profit_per_mu(yield_per_mu, price_per_unit, cost_per_mu),
    }
}
