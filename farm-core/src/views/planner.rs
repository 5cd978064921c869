use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::chart::{Chart, Slice};
use crate::config::PlannerParams;
use crate::data::{CropEconomics, SampleData};
use crate::economics::{improvement_over, percentage_delta};
use crate::recommend::{Recommendation, recommend_seeded};
use crate::select::{bottom_n_by, group_count, group_sum, top_n_by};
use crate::types::PlanStatus;

const HIGH_VALUE_SUGGESTIONS: usize = 3;
const EXPAND_SUGGESTIONS: usize = 2;
const IMPROVEMENT_BARS: usize = 10;

/// Indicator scores (0-100) of the current and the optimized scheme.
const SCHEME_COMPARISON: [(&str, f64, f64); 5] = [
    ("Total economic benefit", 65.0, 85.0),
    ("Resource utilization", 70.0, 88.0),
    ("Risk level", 45.0, 65.0),
    ("Labour demand", 80.0, 75.0),
    ("Sustainability", 60.0, 82.0),
];

// ============================================================================
// Quick suggestions - Shown beside the planner before any plan is generated
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct QuickSuggestions {
    /// Crops with the highest profit per mu.
    pub high_value_crops: Vec<String>,
    /// Crops with the least planted area.
    pub expand_candidates: Vec<String>,
}

pub fn quick_suggestions(data: &SampleData) -> QuickSuggestions {
    let high_value_crops =
        top_n_by(&data.crops, HIGH_VALUE_SUGGESTIONS, CropEconomics::profit_per_mu)
            .into_iter()
            .map(|c| c.crop_name.clone())
            .collect();

    let per_crop = group_sum(&data.plots, |p| p.crop_name.as_str(), |p| p.area_mu);
    let expand_candidates = bottom_n_by(&per_crop, EXPAND_SUGGESTIONS, |(_, area)| *area)
        .into_iter()
        .map(|(name, _)| name.clone())
        .collect();

    QuickSuggestions {
        high_value_crops,
        expand_candidates,
    }
}

// ============================================================================
// Plan result
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct SchemeComparisonRow {
    pub indicator: String,
    pub current: f64,
    pub optimized: f64,
    pub change: String,
}

pub fn scheme_comparison() -> Vec<SchemeComparisonRow> {
    SCHEME_COMPARISON
        .iter()
        .map(|&(indicator, current, optimized)| SchemeComparisonRow {
            indicator: indicator.to_string(),
            current,
            optimized,
            change: format!("{:+.1}%", percentage_delta(current, optimized)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct PlanResult {
    pub params: PlannerParams,
    /// Area-weighted profit change over every recommended plot.
    pub overall_improvement_pct: f64,
    pub headline: String,
    pub rows: Vec<Recommendation>,
    pub improvement_chart: Chart,
    pub recommendation_mix: Chart,
    pub comparison: Vec<SchemeComparisonRow>,
}

fn overall_improvement(data: &SampleData, rows: &[Recommendation]) -> f64 {
    let (current, expected) = rows.iter().fold((0.0, 0.0), |(cur, exp), row| {
        let area = data.plot(&row.plot_id).map_or(0.0, |p| p.area_mu);
        (
            cur + area * row.current_profit,
            exp + area * row.expected_profit,
        )
    });
    // Same rule as the per-row column: a non-positive baseline reports the fallback.
    improvement_over(current, expected)
}

/// Run the mock generator once and assemble everything the result panel shows.
pub fn generate_plan(data: &SampleData, params: &PlannerParams) -> PlanResult {
    let params = params.clone().clamped();
    let rows = recommend_seeded(data, params.seed);
    let overall_improvement_pct = overall_improvement(data, &rows);

    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "plan",
        years = params.planning_years,
        risk = params.risk_preference.label(),
        seed = params.seed,
        plots = rows.len() as u64,
        overall_improvement_pct,
    );

    let improvement_chart = Chart::Bar {
        title: "Expected profit change by plot".to_string(),
        x_label: "Plot".to_string(),
        y_label: "Change (%)".to_string(),
        bars: top_n_by(&rows, IMPROVEMENT_BARS, |r| r.improvement_pct)
            .into_iter()
            .map(|r| Slice::new(r.plot_id.as_str(), r.improvement_pct))
            .collect(),
        color_scale: Some("viridis".to_string()),
    };

    let recommendation_mix = Chart::pie(
        "Recommended crop mix",
        group_count(&rows, |r| r.recommended_crop.as_str())
            .into_iter()
            .map(|(crop, n)| Slice::new(crop, n as f64))
            .collect(),
        0.0,
    );

    PlanResult {
        headline: format!(
            "Plan generated. Expected overall profit change {overall_improvement_pct:+.1}%"
        ),
        params,
        overall_improvement_pct,
        rows,
        improvement_chart,
        recommendation_mix,
        comparison: scheme_comparison(),
    }
}

// ============================================================================
// PlannerView
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct PlannerView {
    pub params: PlannerParams,
    pub status: PlanStatus,
    pub quick: QuickSuggestions,
    pub result: Option<PlanResult>,
}

pub fn planner_view(
    data: &SampleData,
    params: &PlannerParams,
    status: PlanStatus,
    result: Option<PlanResult>,
) -> PlannerView {
    PlannerView {
        params: params.clone(),
        status,
        quick: quick_suggestions(data),
        result: result.filter(|_| status == PlanStatus::Complete),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CATEGORY_GRAIN, LAND_FLAT_DRY, PlotAssignment, sample_data};
    use crate::economics::PERCENT_DELTA_FALLBACK;

    #[test]
    fn quick_suggestions_from_sample() {
        let quick = quick_suggestions(sample_data());
        assert_eq!(quick.high_value_crops, ["Shiitake", "Cucumber", "Tomato"]);
        assert_eq!(quick.expand_candidates, ["Red bean", "Black bean"]);
    }

    #[test]
    fn comparison_change_column() {
        let rows = scheme_comparison();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].change, "+30.8%");
        assert_eq!(rows[1].change, "+25.7%");
        assert_eq!(rows[2].change, "+44.4%");
        assert!(rows[3].change.starts_with('-'));
    }

    #[test]
    fn plan_is_reproducible_for_a_seed() {
        let data = sample_data();
        let params = PlannerParams::default();
        assert_eq!(generate_plan(data, &params), generate_plan(data, &params));
    }

    #[test]
    fn recommendation_mix_covers_every_plot() {
        let plan = generate_plan(sample_data(), &PlannerParams::default());
        assert_eq!(plan.recommendation_mix.value_total(), plan.rows.len() as f64);
        let Chart::Bar { bars, .. } = &plan.improvement_chart else {
            panic!("improvement chart should be a bar chart");
        };
        assert!(bars.len() <= IMPROVEMENT_BARS);
        assert!(bars.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn out_of_range_params_are_clamped_in_result() {
        let params = PlannerParams {
            planning_years: 40,
            ..PlannerParams::default()
        };
        let plan = generate_plan(sample_data(), &params);
        assert_eq!(plan.params.planning_years, 7);
    }

    #[test]
    fn stale_result_hidden_unless_complete() {
        let data = sample_data();
        let params = PlannerParams::default();
        let plan = generate_plan(data, &params);
        let view = planner_view(data, &params, PlanStatus::Processing, Some(plan.clone()));
        assert!(view.result.is_none());
        let view = planner_view(data, &params, PlanStatus::Complete, Some(plan));
        assert!(view.result.is_some());
    }

    #[test]
    fn loss_making_farm_reports_fallback_headline() {
        let plots = vec![PlotAssignment::new("L1", "Loss", CATEGORY_GRAIN, 10.0)];
        let crops = vec![
            CropEconomics::new("Loss", 100.0, 200.0, 1.0, LAND_FLAT_DRY),
            CropEconomics::new("Gain", 300.0, 200.0, 1.0, LAND_FLAT_DRY),
        ];
        let data = SampleData::new(plots, crops).unwrap();

        for seed in 0..4 {
            let params = PlannerParams {
                seed,
                ..PlannerParams::default()
            };
            let plan = generate_plan(&data, &params);
            assert_eq!(plan.rows[0].current_profit, -100.0);
            assert_eq!(plan.overall_improvement_pct, PERCENT_DELTA_FALLBACK);
            assert_eq!(plan.overall_improvement_pct, plan.rows[0].improvement_pct);
            assert!(plan.headline.ends_with("+100.0%"), "{}", plan.headline);
        }
    }

    #[test]
    fn unpriced_crops_give_fallback_headline() {
        let plots = vec![
            PlotAssignment::new("Q1", "Quinoa", CATEGORY_GRAIN, 12.0),
            PlotAssignment::new("Q2", "Sorghum", CATEGORY_GRAIN, 8.0),
        ];
        let crops = vec![CropEconomics::new("Wheat", 600.0, 500.0, 1.5, LAND_FLAT_DRY)];
        let data = SampleData::new(plots, crops).unwrap();

        let plan = generate_plan(&data, &PlannerParams::default());
        assert!(plan.rows.iter().all(|r| r.current_profit == 0.0));
        assert_eq!(plan.overall_improvement_pct, PERCENT_DELTA_FALLBACK);
        assert!(plan.overall_improvement_pct.is_finite());
    }
}
