use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::economics;
use crate::error::DashboardError;

pub const CATEGORY_GRAIN: &str = "Grain";
pub const CATEGORY_LEGUME: &str = "Grain (legume)";
pub const SEASON_SINGLE: &str = "Single";
pub const LAND_FLAT_DRY: &str = "Flat dryland";
pub const LAND_IRRIGATED: &str = "Irrigated land";
pub const LAND_GREENHOUSE: &str = "Greenhouse";

/// Label for a plot id that has no row in the planting table.
pub const UNKNOWN_CROP: &str = "unknown";

// ============================================================================
// PlotAssignment - Which crop currently occupies a plot
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct PlotAssignment {
    pub plot_id: String,
    pub crop_name: String,
    pub crop_category: String,
    pub area_mu: f64,
    pub season_count: String,
}

impl PlotAssignment {
    pub fn new(plot_id: &str, crop_name: &str, crop_category: &str, area_mu: f64) -> Self {
        Self {
            plot_id: plot_id.to_string(),
            crop_name: crop_name.to_string(),
            crop_category: crop_category.to_string(),
            area_mu,
            season_count: SEASON_SINGLE.to_string(),
        }
    }
}

// ============================================================================
// CropEconomics - Yield, cost and price per mu
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct CropEconomics {
    pub crop_name: String,
    pub yield_per_mu: f64, // jin per mu
    pub cost_per_mu: f64, // yuan per mu
    pub price_per_unit: f64, // yuan per jin
    pub land_type: String,
}

impl CropEconomics {
    pub fn new(
        crop_name: &str,
        yield_per_mu: f64,
        cost_per_mu: f64,
        price_per_unit: f64,
        land_type: &str,
    ) -> Self {
        Self {
            crop_name: crop_name.to_string(),
            yield_per_mu,
            cost_per_mu,
            price_per_unit,
            land_type: land_type.to_string(),
        }
    }

    /// Derived on every call; the table never stores it.
    pub fn profit_per_mu(&self) -> f64 {
        economics::profit_per_mu(self.yield_per_mu, self.price_per_unit, self.cost_per_mu)
    }

    pub fn input_output_ratio(&self) -> Option<f64> {
        economics::input_output_ratio(self.profit_per_mu(), self.cost_per_mu)
    }
}

// ============================================================================
// SampleData - The two read-only tables behind every view
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    pub plots: Vec<PlotAssignment>,
    pub crops: Vec<CropEconomics>,
}

impl SampleData {
    /// Build a validated pair of tables.
    ///
    /// Plot ids must be unique and areas positive; yield, cost and price must
    /// all be positive. Plot crops missing from `crops` are allowed.
    pub fn new(
        plots: Vec<PlotAssignment>,
        crops: Vec<CropEconomics>,
    ) -> Result<Self, DashboardError> {
        let mut seen = HashSet::new();
        for plot in &plots {
            if !seen.insert(plot.plot_id.as_str()) {
                return Err(DashboardError::DuplicatePlot(plot.plot_id.clone()));
            }
            if !(plot.area_mu > 0.0) {
                return Err(DashboardError::NonPositiveArea {
                    plot_id: plot.plot_id.clone(),
                    area_mu: plot.area_mu,
                });
            }
        }

        for crop in &crops {
            for (field, value) in [
                ("yield_per_mu", crop.yield_per_mu),
                ("cost_per_mu", crop.cost_per_mu),
                ("price_per_unit", crop.price_per_unit),
            ] {
                if !(value > 0.0) {
                    return Err(DashboardError::NonPositiveEconomics {
                        crop_name: crop.crop_name.clone(),
                        field,
                        value,
                    });
                }
            }
        }

        Ok(Self { plots, crops })
    }

    /// First economics row with a matching name.
    pub fn crop(&self, name: &str) -> Option<&CropEconomics> {
        self.crops.iter().find(|c| c.crop_name == name)
    }

    pub fn plot(&self, plot_id: &str) -> Option<&PlotAssignment> {
        self.plots.iter().find(|p| p.plot_id == plot_id)
    }

    pub fn profit_of(&self, crop_name: &str) -> Option<f64> {
        self.crop(crop_name).map(CropEconomics::profit_per_mu)
    }

    /// Crop names in table order, duplicates dropped.
    pub fn crop_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.crops
            .iter()
            .map(|c| c.crop_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    pub fn total_area(&self) -> f64 {
        self.plots.iter().map(|p| p.area_mu).sum()
    }
}

static SAMPLE_DATA: OnceLock<SampleData> = OnceLock::new();

/// Process-wide sample tables, built on first use.
pub fn sample_data() -> &'static SampleData {
    SAMPLE_DATA.get_or_init(build_sample_data)
}

fn build_sample_data() -> SampleData {
    let plots = vec![
        PlotAssignment::new("A1", "Wheat", CATEGORY_GRAIN, 80.0),
        PlotAssignment::new("A2", "Corn", CATEGORY_GRAIN, 55.0),
        PlotAssignment::new("A3", "Corn", CATEGORY_GRAIN, 35.0),
        PlotAssignment::new("A4", "Soybean", CATEGORY_LEGUME, 72.0),
        PlotAssignment::new("A5", "Mung bean", CATEGORY_LEGUME, 68.0),
        PlotAssignment::new("A6", "Millet", CATEGORY_GRAIN, 55.0),
        PlotAssignment::new("B1", "Wheat", CATEGORY_GRAIN, 60.0),
        PlotAssignment::new("B2", "Black bean", CATEGORY_LEGUME, 46.0),
        PlotAssignment::new("B3", "Red bean", CATEGORY_LEGUME, 40.0),
        PlotAssignment::new("B4", "Mung bean", CATEGORY_LEGUME, 28.0),
    ];

    let crops = vec![
        CropEconomics::new("Wheat", 600.0, 500.0, 1.5, LAND_FLAT_DRY),
        CropEconomics::new("Corn", 800.0, 600.0, 1.2, LAND_FLAT_DRY),
        CropEconomics::new("Soybean", 400.0, 400.0, 3.0, LAND_FLAT_DRY),
        CropEconomics::new("Mung bean", 350.0, 350.0, 7.0, LAND_FLAT_DRY),
        CropEconomics::new("Black bean", 500.0, 400.0, 7.5, LAND_FLAT_DRY),
        CropEconomics::new("Red bean", 400.0, 350.0, 8.0, LAND_FLAT_DRY),
        CropEconomics::new("Millet", 450.0, 400.0, 2.0, LAND_FLAT_DRY),
        CropEconomics::new("Tomato", 3000.0, 1200.0, 2.5, LAND_IRRIGATED),
        CropEconomics::new("Cucumber", 4000.0, 1500.0, 2.0, LAND_GREENHOUSE),
        CropEconomics::new("Shiitake", 2000.0, 8000.0, 15.0, LAND_GREENHOUSE),
    ];

    SampleData { plots, crops }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_tables_pass_validation() {
        let data = sample_data();
        let rebuilt = SampleData::new(data.plots.clone(), data.crops.clone());
        assert_eq!(rebuilt.as_ref(), Ok(data));
    }

    #[test]
    fn sample_data_is_memoized() {
        assert!(std::ptr::eq(sample_data(), sample_data()));
    }

    #[test]
    fn duplicate_plot_rejected() {
        let plots = vec![
            PlotAssignment::new("A1", "Wheat", CATEGORY_GRAIN, 10.0),
            PlotAssignment::new("A1", "Corn", CATEGORY_GRAIN, 12.0),
        ];
        assert_eq!(
            SampleData::new(plots, vec![]),
            Err(DashboardError::DuplicatePlot("A1".to_string()))
        );
    }

    #[test]
    fn zero_area_rejected() {
        let plots = vec![PlotAssignment::new("A1", "Wheat", CATEGORY_GRAIN, 0.0)];
        assert!(matches!(
            SampleData::new(plots, vec![]),
            Err(DashboardError::NonPositiveArea { .. })
        ));
    }

    #[test]
    fn zero_cost_rejected() {
        let crops = vec![CropEconomics::new("Free", 10.0, 0.0, 1.0, LAND_FLAT_DRY)];
        assert!(matches!(
            SampleData::new(vec![], crops),
            Err(DashboardError::NonPositiveEconomics {
                field: "cost_per_mu",
                ..
            })
        ));
    }

    #[test]
    fn lookups_by_name() {
        let data = sample_data();
        assert_eq!(data.profit_of("Wheat"), Some(400.0));
        assert_eq!(data.profit_of("Rice"), None);
        assert_eq!(data.plot("B3").map(|p| p.crop_name.as_str()), Some("Red bean"));
        assert_eq!(data.crop_names().len(), 10);
        assert_eq!(data.total_area(), 539.0);
    }
}
