use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::chart::{Chart, Slice, VALUE_COLOR_SCALE};
use crate::data::{CropEconomics, SampleData};
use crate::select::{arg_max_by, mean, top_n_by};
use crate::stats::{box_by_group, histogram};
use crate::views::{Metric, yuan};

const PROFIT_HISTOGRAM_BINS: usize = 20;
const EFFICIENCY_BARS: usize = 10;

/// One row of the detail table, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct BenefitRow {
    pub crop_name: String,
    pub land_type: String,
    pub yield_per_mu: f64,
    pub cost_per_mu: f64,
    pub price_per_unit: f64,
    pub profit_per_mu: f64,
    /// 0.0 when the crop has no cost to divide by.
    pub input_output_ratio: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn ratio_or_zero(crop: &CropEconomics) -> f64 {
    crop.input_output_ratio().unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct BenefitView {
    pub metrics: Vec<Metric>,
    pub profit_histogram: Chart,
    pub land_type_box: Chart,
    pub efficiency_ranking: Chart,
    pub details: Vec<BenefitRow>,
}

pub fn benefit_view(data: &SampleData) -> BenefitView {
    let profits: Vec<f64> = data.crops.iter().map(CropEconomics::profit_per_mu).collect();
    let total_potential: f64 = profits.iter().sum();
    let avg_profit = mean(profits.iter().copied()).unwrap_or(0.0);
    let best = arg_max_by(&data.crops, CropEconomics::profit_per_mu);

    let metrics = vec![
        Metric::new("Total profit potential", total_potential, yuan(total_potential)),
        Metric::new("Mean profit per mu", avg_profit, yuan(avg_profit)),
        Metric::new(
            "Most profitable crop",
            best.map_or(0.0, CropEconomics::profit_per_mu),
            best.map_or_else(|| "-".to_string(), |c| c.crop_name.clone()),
        ),
    ];

    let profit_histogram = Chart::Histogram {
        title: "Profit per mu distribution".to_string(),
        x_label: "Profit (yuan/mu)".to_string(),
        bins: histogram(&profits, PROFIT_HISTOGRAM_BINS),
    };

    let land_type_box = Chart::Box {
        title: "Profit by land type".to_string(),
        x_label: "Land type".to_string(),
        y_label: "Profit (yuan/mu)".to_string(),
        groups: box_by_group(
            &data.crops,
            |c| c.land_type.as_str(),
            CropEconomics::profit_per_mu,
        ),
    };

    let efficiency_ranking = Chart::bar(
        "Input/output ratio ranking",
        "Crop",
        "Profit / cost",
        top_n_by(&data.crops, EFFICIENCY_BARS, ratio_or_zero)
            .into_iter()
            .map(|c| Slice::new(c.crop_name.as_str(), ratio_or_zero(c)))
            .collect(),
    )
    .with_color_scale(VALUE_COLOR_SCALE);

    let details = data
        .crops
        .iter()
        .map(|c| BenefitRow {
            crop_name: c.crop_name.clone(),
            land_type: c.land_type.clone(),
            yield_per_mu: c.yield_per_mu,
            cost_per_mu: c.cost_per_mu,
            price_per_unit: c.price_per_unit,
            profit_per_mu: round_to(c.profit_per_mu(), 0),
            input_output_ratio: round_to(ratio_or_zero(c), 2),
        })
        .collect();

    BenefitView {
        metrics,
        profit_histogram,
        land_type_box,
        efficiency_ranking,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_data;

    #[test]
    fn headline_metrics() {
        let view = benefit_view(sample_data());
        assert_eq!(view.metrics[0].value, 45160.0);
        assert_eq!(view.metrics[1].display, "¥4516");
        assert_eq!(view.metrics[2].display, "Shiitake");
    }

    #[test]
    fn efficiency_led_by_black_bean() {
        let view = benefit_view(sample_data());
        let Chart::Bar {
            bars, color_scale, ..
        } = &view.efficiency_ranking
        else {
            panic!("efficiency ranking should be a bar chart");
        };
        assert_eq!(color_scale.as_deref(), Some(VALUE_COLOR_SCALE));
        assert_eq!(bars[0].label, "Black bean");
        assert_eq!(bars[0].value, 8.375);
        assert_eq!(bars[1].label, "Red bean");
    }

    #[test]
    fn detail_ratios_rounded_to_two_places() {
        let view = benefit_view(sample_data());
        let red_bean = view.details.iter().find(|r| r.crop_name == "Red bean").unwrap();
        assert_eq!(red_bean.input_output_ratio, 8.14);
        assert_eq!(red_bean.profit_per_mu, 2850.0);
    }

    #[test]
    fn histogram_and_boxes_cover_every_crop() {
        let view = benefit_view(sample_data());
        let Chart::Histogram { bins, .. } = &view.profit_histogram else {
            panic!("expected histogram");
        };
        assert_eq!(bins.len(), PROFIT_HISTOGRAM_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 10);

        let Chart::Box { groups, .. } = &view.land_type_box else {
            panic!("expected box chart");
        };
        let labels: Vec<&str> = groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(labels, ["Flat dryland", "Irrigated land", "Greenhouse"]);
        assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), 10);
    }
}
