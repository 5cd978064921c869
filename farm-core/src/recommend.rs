//! Mock crop recommendations.
//!
//! Each plot is assigned a crop drawn uniformly from the economics table.
//! No area, rotation or feasibility constraint is checked. A seeded RNG keeps
//! the output stable from one render to the next.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::data::{SampleData, UNKNOWN_CROP};
use crate::economics::improvement_over;

/// Plots shown in one recommendation table.
pub const MAX_RECOMMENDED_PLOTS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct Recommendation {
    pub plot_id: String,
    pub current_crop: String,
    pub recommended_crop: String,
    pub current_profit: f64,
    pub expected_profit: f64,
    pub improvement_pct: f64,
}

/// Distinct plot ids in table order, capped at [`MAX_RECOMMENDED_PLOTS`].
fn candidate_plots(data: &SampleData) -> Vec<&str> {
    let mut seen = HashSet::new();
    data.plots
        .iter()
        .map(|p| p.plot_id.as_str())
        .filter(|id| seen.insert(*id))
        .take(MAX_RECOMMENDED_PLOTS)
        .collect()
}

/// Draw one recommendation per plot from `rng`.
///
/// A plot whose crop is missing from the economics table keeps its crop label
/// with a zero baseline; the improvement then falls back to 100%.
pub fn recommend<R: Rng>(rng: &mut R, data: &SampleData) -> Vec<Recommendation> {
    let crop_names = data.crop_names();
    if crop_names.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for plot_id in candidate_plots(data) {
        let current_crop = data
            .plot(plot_id)
            .map(|p| p.crop_name.as_str())
            .unwrap_or(UNKNOWN_CROP);
        let Some(&recommended_crop) = crop_names.choose(rng) else {
            break;
        };
        let current_profit = data.profit_of(current_crop).unwrap_or(0.0);
        let expected_profit = data.profit_of(recommended_crop).unwrap_or(0.0);
        let improvement_pct = improvement_over(current_profit, expected_profit);

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "plan_row",
            plot = plot_id,
            current = current_crop,
            recommended = recommended_crop,
            current_profit,
            expected_profit,
            improvement_pct,
        );

        rows.push(Recommendation {
            plot_id: plot_id.to_string(),
            current_crop: current_crop.to_string(),
            recommended_crop: recommended_crop.to_string(),
            current_profit,
            expected_profit,
            improvement_pct,
        });
    }
    rows
}

pub fn recommend_seeded(data: &SampleData, seed: u64) -> Vec<Recommendation> {
    let mut rng = StdRng::seed_from_u64(seed);
    recommend(&mut rng, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CATEGORY_GRAIN, CropEconomics, LAND_FLAT_DRY, PlotAssignment, sample_data};
    use crate::economics::PERCENT_DELTA_FALLBACK;

    #[test]
    fn same_seed_same_plan() {
        let data = sample_data();
        assert_eq!(recommend_seeded(data, 42), recommend_seeded(data, 42));
    }

    #[test]
    fn one_row_per_plot_in_table_order() {
        let data = sample_data();
        let rows = recommend_seeded(data, 7);
        let ids: Vec<&str> = rows.iter().map(|r| r.plot_id.as_str()).collect();
        let expected: Vec<&str> = data.plots.iter().map(|p| p.plot_id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn recommended_crops_come_from_the_table() {
        let data = sample_data();
        let names = data.crop_names();
        for row in recommend_seeded(data, 3) {
            assert!(names.contains(&row.recommended_crop.as_str()));
            assert_eq!(Some(row.expected_profit), data.profit_of(&row.recommended_crop));
        }
    }

    #[test]
    fn capped_at_fifteen_plots() {
        let plots = (0..20)
            .map(|i| PlotAssignment::new(&format!("P{i}"), "Wheat", CATEGORY_GRAIN, 1.0))
            .collect();
        let crops = vec![CropEconomics::new("Wheat", 600.0, 500.0, 1.5, LAND_FLAT_DRY)];
        let data = SampleData::new(plots, crops).unwrap();
        let rows = recommend_seeded(&data, 1);
        assert_eq!(rows.len(), MAX_RECOMMENDED_PLOTS);
        assert!(rows.iter().all(|r| r.improvement_pct == 0.0));
    }

    #[test]
    fn crop_missing_from_economics_uses_zero_baseline() {
        let plots = vec![PlotAssignment::new("C1", "Rice", CATEGORY_GRAIN, 10.0)];
        let crops = vec![CropEconomics::new("Wheat", 600.0, 500.0, 1.5, LAND_FLAT_DRY)];
        let data = SampleData::new(plots, crops).unwrap();
        let rows = recommend_seeded(&data, 1);
        assert_eq!(rows[0].current_crop, "Rice");
        assert_eq!(rows[0].current_profit, 0.0);
        assert_eq!(rows[0].improvement_pct, PERCENT_DELTA_FALLBACK);
    }

    #[test]
    fn empty_economics_table_yields_no_rows() {
        let plots = vec![PlotAssignment::new("C1", "Rice", CATEGORY_GRAIN, 10.0)];
        let data = SampleData::new(plots, vec![]).unwrap();
        assert!(recommend_seeded(&data, 1).is_empty());
    }
}
