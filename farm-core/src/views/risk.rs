use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::chart::{Chart, ReferenceLine};
use crate::config::RiskInputs;
use crate::data::{CropEconomics, SampleData};
use crate::economics::{
    ScenarioShift, StressedEconomics, percentage_delta, scenario_adjustment, stress,
};
use crate::error::DashboardError;
use crate::types::{ClimateScenarioKind, PolicyChange};
use crate::views::{Metric, yuan};

const SENSITIVITY_SPAN_PCT: f64 = 40.0;
const SENSITIVITY_STEPS: usize = 9;

// ============================================================================
// Price shock tab
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct PriceShockView {
    pub crop: String,
    pub shift: ScenarioShift,
    pub original_profit: f64,
    pub stressed: StressedEconomics,
    pub profit_change_pct: f64,
    pub metrics: Vec<Metric>,
    pub sensitivity: Chart,
}

/// `steps` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps - 1) as f64;
            (0..steps).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Profit at each price change in ±40%, holding the stressed yield and cost.
pub fn price_sensitivity(crop: &CropEconomics, stressed: &StressedEconomics) -> Vec<(f64, f64)> {
    linspace(-SENSITIVITY_SPAN_PCT, SENSITIVITY_SPAN_PCT, SENSITIVITY_STEPS)
        .into_iter()
        .map(|change| {
            let price = scenario_adjustment(crop.price_per_unit, change);
            (change, stressed.yield_per_mu * price - stressed.cost_per_mu)
        })
        .collect()
}

fn selected_crop<'a>(
    data: &'a SampleData,
    inputs: &RiskInputs,
) -> Result<&'a CropEconomics, DashboardError> {
    match inputs.crop.as_deref() {
        Some(name) => data
            .crop(name)
            .ok_or_else(|| DashboardError::UnknownCrop(name.to_string())),
        None => data
            .crops
            .first()
            .ok_or_else(|| DashboardError::UnknownCrop(String::new())),
    }
}

pub fn price_shock(
    data: &SampleData,
    inputs: &RiskInputs,
) -> Result<PriceShockView, DashboardError> {
    let crop = selected_crop(data, inputs)?;
    let shift = inputs.shift();
    let original_profit = crop.profit_per_mu();
    let stressed = stress(crop, shift);
    // Zero-profit crops report the fallback rather than NaN or infinity.
    let profit_change_pct = percentage_delta(original_profit, stressed.profit_per_mu);

    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "stress",
        crop = crop.crop_name.as_str(),
        price_pct = shift.price_pct,
        yield_pct = shift.yield_pct,
        cost_pct = shift.cost_pct,
        original_profit,
        stressed_profit = stressed.profit_per_mu,
        profit_change_pct,
    );

    let metrics = vec![
        Metric::new("Original profit per mu", original_profit, yuan(original_profit)),
        Metric::new(
            "Stressed profit per mu",
            stressed.profit_per_mu,
            yuan(stressed.profit_per_mu),
        )
        .with_delta(format!("{profit_change_pct:+.1}%")),
    ];

    let sensitivity = Chart::Line {
        title: format!("{} price sensitivity", crop.crop_name),
        x_label: "Price change (%)".to_string(),
        y_label: "Profit (yuan/mu)".to_string(),
        points: price_sensitivity(crop, &stressed),
        reference: Some(ReferenceLine {
            y: original_profit,
            label: "Original profit".to_string(),
        }),
    };

    Ok(PriceShockView {
        crop: crop.crop_name.clone(),
        shift,
        original_profit,
        stressed,
        profit_change_pct,
        metrics,
        sensitivity,
    })
}

// ============================================================================
// Climate tab
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
pub struct ClimateScenario {
    pub kind: ClimateScenarioKind,
    pub yield_impact_pct: f64,
    pub cost_impact_pct: f64,
    /// Annual likelihood; the six scenarios sum to 100.
    pub probability_pct: f64,
}

impl ClimateScenario {
    pub fn of(kind: ClimateScenarioKind) -> Self {
        let (yield_impact_pct, cost_impact_pct, probability_pct) = match kind {
            ClimateScenarioKind::Normal => (0.0, 0.0, 60.0),
            ClimateScenarioKind::MildDrought => (-15.0, 10.0, 20.0),
            ClimateScenarioKind::SevereDrought => (-40.0, 25.0, 5.0),
            ClimateScenarioKind::Flood => (-25.0, 30.0, 8.0),
            ClimateScenarioKind::Frost => (-20.0, 15.0, 4.0),
            ClimateScenarioKind::HeatStress => (-10.0, 5.0, 3.0),
        };
        Self {
            kind,
            yield_impact_pct,
            cost_impact_pct,
            probability_pct,
        }
    }

    pub fn shift(&self) -> ScenarioShift {
        ScenarioShift {
            yield_pct: self.yield_impact_pct,
            price_pct: 0.0,
            cost_pct: self.cost_impact_pct,
        }
    }
}

pub fn climate_scenarios() -> Vec<ClimateScenario> {
    ClimateScenarioKind::all().map(ClimateScenario::of).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct CropClimateOutcome {
    pub crop: String,
    pub base_profit: f64,
    pub scenario_profit: f64,
    /// Probability-weighted profit across all scenarios.
    pub expected_profit: f64,
}

pub fn expected_profit(crop: &CropEconomics, scenarios: &[ClimateScenario]) -> f64 {
    let total_weight: f64 = scenarios.iter().map(|s| s.probability_pct).sum();
    if total_weight == 0.0 {
        return crop.profit_per_mu();
    }
    scenarios
        .iter()
        .map(|s| s.probability_pct * stress(crop, s.shift()).profit_per_mu)
        .sum::<f64>()
        / total_weight
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct ClimateView {
    pub selected: ClimateScenario,
    pub label: String,
    pub metrics: Vec<Metric>,
    pub scenarios: Vec<ClimateScenario>,
    pub outcomes: Vec<CropClimateOutcome>,
}

pub fn climate_view(data: &SampleData, kind: ClimateScenarioKind) -> ClimateView {
    let scenarios = climate_scenarios();
    let selected = ClimateScenario::of(kind);

    let outcomes = data
        .crops
        .iter()
        .map(|crop| {
            let outcome = CropClimateOutcome {
                crop: crop.crop_name.clone(),
                base_profit: crop.profit_per_mu(),
                scenario_profit: stress(crop, selected.shift()).profit_per_mu,
                expected_profit: expected_profit(crop, &scenarios),
            };

            #[cfg(feature = "instrument")]
            tracing::info!(
                target: "climate",
                scenario = kind.label(),
                crop = outcome.crop.as_str(),
                base_profit = outcome.base_profit,
                scenario_profit = outcome.scenario_profit,
                expected_profit = outcome.expected_profit,
            );

            outcome
        })
        .collect();

    let metrics = vec![
        Metric::new(
            "Yield impact",
            selected.yield_impact_pct,
            format!("{}%", selected.yield_impact_pct),
        ),
        Metric::new(
            "Cost impact",
            selected.cost_impact_pct,
            format!("{:+}%", selected.cost_impact_pct),
        ),
        Metric::new(
            "Probability",
            selected.probability_pct,
            format!("{}%", selected.probability_pct),
        ),
    ];

    ClimateView {
        selected,
        label: kind.label().to_string(),
        metrics,
        scenarios,
        outcomes,
    }
}

// ============================================================================
// Policy tab
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct PolicyOption {
    pub policy: PolicyChange,
    pub label: String,
}

/// Policy selection is acknowledged only; no impact model exists yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct PolicyView {
    pub options: Vec<PolicyOption>,
    pub selected: Vec<PolicyChange>,
    pub message: Option<String>,
}

pub fn policy_view(selected: &[PolicyChange]) -> PolicyView {
    let mut chosen: Vec<PolicyChange> = Vec::new();
    for policy in selected {
        if !chosen.contains(policy) {
            chosen.push(*policy);
        }
    }
    PolicyView {
        options: PolicyChange::all()
            .map(|policy| PolicyOption {
                policy,
                label: policy.label().to_string(),
            })
            .collect(),
        message: (!chosen.is_empty()).then(|| "Policy change analysis selected".to_string()),
        selected: chosen,
    }
}

// ============================================================================
// RiskView
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct RiskView {
    pub inputs: RiskInputs,
    pub price: PriceShockView,
    pub climate: ClimateView,
    pub policy: PolicyView,
}

pub fn risk_view(data: &SampleData, inputs: &RiskInputs) -> Result<RiskView, DashboardError> {
    let inputs = inputs.clone().clamped();
    Ok(RiskView {
        price: price_shock(data, &inputs)?,
        climate: climate_view(data, inputs.climate),
        policy: policy_view(&inputs.policies),
        inputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CATEGORY_GRAIN, LAND_FLAT_DRY, PlotAssignment, sample_data};
    use crate::economics::PERCENT_DELTA_FALLBACK;

    fn inputs_for(crop: &str) -> RiskInputs {
        RiskInputs {
            crop: Some(crop.to_string()),
            ..RiskInputs::default()
        }
    }

    #[test]
    fn no_shift_keeps_original_profit() {
        let view = price_shock(sample_data(), &inputs_for("Wheat")).unwrap();
        assert_eq!(view.original_profit, 400.0);
        assert_eq!(view.stressed.profit_per_mu, 400.0);
        assert_eq!(view.profit_change_pct, 0.0);
        assert_eq!(view.metrics[1].delta.as_deref(), Some("+0.0%"));
    }

    #[test]
    fn default_crop_is_first_in_table() {
        let view = price_shock(sample_data(), &RiskInputs::default()).unwrap();
        assert_eq!(view.crop, "Wheat");
    }

    #[test]
    fn price_cut_on_shiitake() {
        let inputs = RiskInputs {
            price_change_pct: -20,
            ..inputs_for("Shiitake")
        };
        let view = price_shock(sample_data(), &inputs).unwrap();
        // 2000 * 12 - 8000
        assert!((view.stressed.profit_per_mu - 16000.0).abs() < 1e-6);
        assert!((view.profit_change_pct - (-27.272727)).abs() < 1e-4);
    }

    #[test]
    fn sensitivity_spans_nine_points() {
        let view = price_shock(sample_data(), &inputs_for("Wheat")).unwrap();
        let Chart::Line { points, reference, .. } = &view.sensitivity else {
            panic!("sensitivity should be a line chart");
        };
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        assert_eq!(xs.len(), 9);
        assert_eq!(xs[0], -40.0);
        assert_eq!(xs[4], 0.0);
        assert_eq!(xs[8], 40.0);
        // Unshifted midpoint equals the original profit.
        assert_eq!(points[4].1, 400.0);
        assert_eq!(reference.as_ref().map(|r| r.y), Some(400.0));
    }

    #[test]
    fn unknown_crop_is_reported() {
        assert_eq!(
            price_shock(sample_data(), &inputs_for("Rice")),
            Err(DashboardError::UnknownCrop("Rice".to_string()))
        );
    }

    #[test]
    fn climate_probabilities_sum_to_hundred() {
        let total: f64 = climate_scenarios().iter().map(|s| s.probability_pct).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn normal_year_leaves_profit_unchanged() {
        let view = climate_view(sample_data(), ClimateScenarioKind::Normal);
        assert!(view.outcomes.iter().all(|o| o.scenario_profit == o.base_profit));
        assert_eq!(view.metrics[1].display, "+0%");
    }

    #[test]
    fn drought_lowers_every_profit_and_expectation_sits_below_base() {
        let view = climate_view(sample_data(), ClimateScenarioKind::SevereDrought);
        for outcome in &view.outcomes {
            assert!(outcome.scenario_profit < outcome.base_profit, "{}", outcome.crop);
            assert!(outcome.expected_profit < outcome.base_profit, "{}", outcome.crop);
        }
        assert_eq!(view.metrics[0].display, "-40%");
    }

    #[test]
    fn policy_selection_is_deduplicated() {
        let view = policy_view(&[
            PolicyChange::WaterManagement,
            PolicyChange::WaterManagement,
            PolicyChange::GrainSubsidyIncrease,
        ]);
        assert_eq!(view.selected.len(), 2);
        assert!(view.message.is_some());
        assert!(policy_view(&[]).message.is_none());
        assert_eq!(view.options.len(), 5);
    }

    #[test]
    fn risk_view_clamps_sliders() {
        let inputs = RiskInputs {
            price_change_pct: 90,
            ..inputs_for("Corn")
        };
        let view = risk_view(sample_data(), &inputs).unwrap();
        assert_eq!(view.inputs.price_change_pct, 50);
        assert_eq!(view.price.shift.price_pct, 50.0);
    }

    #[test]
    fn zero_profit_crop_reports_fallback_change() {
        let plots = vec![PlotAssignment::new("E1", "Even", CATEGORY_GRAIN, 5.0)];
        let crops = vec![CropEconomics::new("Even", 100.0, 100.0, 1.0, LAND_FLAT_DRY)];
        let data = SampleData::new(plots, crops).unwrap();
        let inputs = RiskInputs {
            price_change_pct: 10,
            ..inputs_for("Even")
        };

        let view = price_shock(&data, &inputs).unwrap();
        assert_eq!(view.original_profit, 0.0);
        assert!((view.stressed.profit_per_mu - 10.0).abs() < 1e-9);
        assert_eq!(view.profit_change_pct, PERCENT_DELTA_FALLBACK);
        assert_eq!(view.metrics[1].delta.as_deref(), Some("+100.0%"));
    }
}
