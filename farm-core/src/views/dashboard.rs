use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::chart::{Chart, ScatterPoint, Slice, VALUE_COLOR_SCALE};
use crate::data::{CropEconomics, SampleData};
use crate::select::{distinct_count, group_sum, mean, top_n_by};
use crate::views::{Metric, yuan};

const CROP_AREA_BARS: usize = 10;
const PROFIT_RANKING_BARS: usize = 10;
const CATEGORY_PIE_HOLE: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct DashboardView {
    pub metrics: Vec<Metric>,
    /// Area per crop category.
    pub category_area: Chart,
    /// Area per crop, largest first.
    pub crop_area: Chart,
    pub profit_ranking: Chart,
    /// Cost against profit, sized by yield.
    pub cost_profit: Chart,
}

pub fn dashboard_view(data: &SampleData) -> DashboardView {
    let total_area = data.total_area();
    let varieties = distinct_count(data.plots.iter().map(|p| p.crop_name.as_str()));
    let categories = distinct_count(data.plots.iter().map(|p| p.crop_category.as_str()));
    let avg_profit = mean(data.crops.iter().map(CropEconomics::profit_per_mu)).unwrap_or(0.0);

    let metrics = vec![
        Metric::new("Total planted area", total_area, format!("{total_area} mu")),
        Metric::new("Crop varieties", varieties as f64, format!("{varieties}")),
        Metric::new("Crop categories", categories as f64, format!("{categories}")),
        Metric::new("Plots", data.plots.len() as f64, format!("{}", data.plots.len())),
        Metric::new("Mean profit per mu", avg_profit, yuan(avg_profit)),
    ];

    let category_area = Chart::pie(
        "Planted area by crop category",
        group_sum(&data.plots, |p| p.crop_category.as_str(), |p| p.area_mu)
            .into_iter()
            .map(|(label, area)| Slice::new(label, area))
            .collect(),
        CATEGORY_PIE_HOLE,
    );

    let per_crop = group_sum(&data.plots, |p| p.crop_name.as_str(), |p| p.area_mu);
    let crop_area = Chart::bar(
        "Planted area of main crops",
        "Crop",
        "Area (mu)",
        top_n_by(&per_crop, CROP_AREA_BARS, |(_, area)| *area)
            .into_iter()
            .map(|(label, area)| Slice::new(label.as_str(), *area))
            .collect(),
    )
    .with_color_scale(VALUE_COLOR_SCALE);

    let profit_ranking = Chart::bar(
        "Profit per mu by crop",
        "Crop",
        "Profit (yuan/mu)",
        top_n_by(&data.crops, PROFIT_RANKING_BARS, CropEconomics::profit_per_mu)
            .into_iter()
            .map(|c| Slice::new(c.crop_name.as_str(), c.profit_per_mu()))
            .collect(),
    )
    .with_color_scale(VALUE_COLOR_SCALE);

    let cost_profit = Chart::Scatter {
        title: "Cost vs profit".to_string(),
        x_label: "Cost (yuan/mu)".to_string(),
        y_label: "Profit (yuan/mu)".to_string(),
        points: data
            .crops
            .iter()
            .map(|c| ScatterPoint {
                label: c.crop_name.clone(),
                x: c.cost_per_mu,
                y: c.profit_per_mu(),
                size: c.yield_per_mu,
                hover: vec![("Price (yuan/jin)".to_string(), c.price_per_unit)],
            })
            .collect(),
    };

    DashboardView {
        metrics,
        category_area,
        crop_area,
        profit_ranking,
        cost_profit,
    }
}
