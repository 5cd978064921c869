use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::economics::ScenarioShift;
use crate::types::{ClimateScenarioKind, PolicyChange, RiskPreference};

// Slider ranges. Values arriving from JS are clamped into these.
pub const PLANNING_YEARS: RangeInclusive<u32> = 1..=7;
pub const WEIGHT_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const MIN_PLOT_AREA_RANGE: RangeInclusive<f64> = 1.0..=20.0;
pub const PRICE_CHANGE_RANGE: RangeInclusive<i32> = -50..=50;
pub const YIELD_CHANGE_RANGE: RangeInclusive<i32> = -30..=30;
pub const COST_CHANGE_RANGE: RangeInclusive<i32> = -20..=20;

pub const DEFAULT_PLAN_SEED: u64 = 42;

fn clamp_to<T: PartialOrd + Copy>(value: T, range: &RangeInclusive<T>) -> T {
    if value < *range.start() {
        *range.start()
    } else if value > *range.end() {
        *range.end()
    } else {
        value
    }
}

/// NaN falls back to `default` instead of poisoning the formulas.
fn clamp_f64(value: f64, range: &RangeInclusive<f64>, default: f64) -> f64 {
    if value.is_nan() {
        default
    } else {
        clamp_to(value, range)
    }
}

// ============================================================================
// PlannerParams - Sidebar controls of the planner page
// ============================================================================

/// Planner controls. The mock generator records them but applies none of
/// the constraints they describe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct PlannerParams {
    pub planning_years: u32,
    pub risk_preference: RiskPreference,
    pub economic_weight: f64,
    pub stability_weight: f64,
    pub sustainability_weight: f64,
    pub force_legume_rotation: bool,
    pub avoid_continuous_cropping: bool,
    pub min_plot_area_mu: f64,
    pub seed: u64,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            planning_years: 3,
            risk_preference: RiskPreference::Balanced,
            economic_weight: 0.6,
            stability_weight: 0.3,
            sustainability_weight: 0.1,
            force_legume_rotation: true,
            avoid_continuous_cropping: true,
            min_plot_area_mu: 5.0,
            seed: DEFAULT_PLAN_SEED,
        }
    }
}

impl PlannerParams {
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        Self {
            planning_years: clamp_to(self.planning_years, &PLANNING_YEARS),
            economic_weight: clamp_f64(
                self.economic_weight,
                &WEIGHT_RANGE,
                defaults.economic_weight,
            ),
            stability_weight: clamp_f64(
                self.stability_weight,
                &WEIGHT_RANGE,
                defaults.stability_weight,
            ),
            sustainability_weight: clamp_f64(
                self.sustainability_weight,
                &WEIGHT_RANGE,
                defaults.sustainability_weight,
            ),
            min_plot_area_mu: clamp_f64(
                self.min_plot_area_mu,
                &MIN_PLOT_AREA_RANGE,
                defaults.min_plot_area_mu,
            ),
            ..self
        }
    }
}

// ============================================================================
// RiskInputs - Controls across the three risk simulator tabs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct RiskInputs {
    /// `None` selects the first crop of the economics table.
    pub crop: Option<String>,
    pub price_change_pct: i32,
    pub yield_change_pct: i32,
    pub cost_change_pct: i32,
    pub climate: ClimateScenarioKind,
    pub policies: Vec<PolicyChange>,
}

impl Default for RiskInputs {
    fn default() -> Self {
        Self {
            crop: None,
            price_change_pct: 0,
            yield_change_pct: 0,
            cost_change_pct: 0,
            climate: ClimateScenarioKind::Normal,
            policies: vec![PolicyChange::GrainSubsidyIncrease],
        }
    }
}

impl RiskInputs {
    pub fn clamped(self) -> Self {
        Self {
            price_change_pct: clamp_to(self.price_change_pct, &PRICE_CHANGE_RANGE),
            yield_change_pct: clamp_to(self.yield_change_pct, &YIELD_CHANGE_RANGE),
            cost_change_pct: clamp_to(self.cost_change_pct, &COST_CHANGE_RANGE),
            ..self
        }
    }

    pub fn shift(&self) -> ScenarioShift {
        ScenarioShift {
            yield_pct: f64::from(self.yield_change_pct),
            price_pct: f64::from(self.price_change_pct),
            cost_pct: f64::from(self.cost_change_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planner_params_clamp_to_slider_ranges() {
        let params = PlannerParams {
            planning_years: 12,
            economic_weight: -0.5,
            stability_weight: f64::NAN,
            min_plot_area_mu: 0.2,
            ..PlannerParams::default()
        }
        .clamped();
        assert_eq!(params.planning_years, 7);
        assert_eq!(params.economic_weight, 0.0);
        assert_eq!(params.stability_weight, 0.3);
        assert_eq!(params.min_plot_area_mu, 1.0);
        assert_eq!(params.seed, DEFAULT_PLAN_SEED);
    }

    #[test]
    fn defaults_are_already_in_range() {
        assert_eq!(PlannerParams::default().clamped(), PlannerParams::default());
        assert_eq!(RiskInputs::default().clamped(), RiskInputs::default());
    }

    #[test]
    fn risk_inputs_clamp_each_slider() {
        let inputs = RiskInputs {
            price_change_pct: 80,
            yield_change_pct: -45,
            cost_change_pct: 5,
            ..RiskInputs::default()
        }
        .clamped();
        assert_eq!(inputs.price_change_pct, 50);
        assert_eq!(inputs.yield_change_pct, -30);
        assert_eq!(inputs.cost_change_pct, 5);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: PlannerParams = serde_json::from_str(r#"{"planning_years": 5}"#).unwrap();
        assert_eq!(params.planning_years, 5);
        assert_eq!(params.seed, DEFAULT_PLAN_SEED);

        let inputs: RiskInputs =
            serde_json::from_str(r#"{"crop": "Tomato", "climate": "flood"}"#).unwrap();
        assert_eq!(inputs.crop.as_deref(), Some("Tomato"));
        assert_eq!(inputs.climate, ClimateScenarioKind::Flood);
        assert_eq!(inputs.policies, vec![PolicyChange::GrainSubsidyIncrease]);
    }
}
