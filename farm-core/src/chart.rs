use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::stats::{BoxSummary, HistogramBin};

/// Continuous scale for bars coloured by their own value.
pub const VALUE_COLOR_SCALE: &str = "plasma";

// ============================================================================
// Chart specs - Plain data handed to the JS charting layer
// ============================================================================

/// A chart description. Layout and axes styling belong to the front end;
/// only the series data, titles and colour scale hints are decided here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Pie {
        title: String,
        slices: Vec<Slice>,
        /// Inner radius fraction; 0.0 draws a full pie.
        hole: f64,
    },
    Bar {
        title: String,
        x_label: String,
        y_label: String,
        bars: Vec<Slice>,
        color_scale: Option<String>,
    },
    Scatter {
        title: String,
        x_label: String,
        y_label: String,
        points: Vec<ScatterPoint>,
    },
    Histogram {
        title: String,
        x_label: String,
        bins: Vec<HistogramBin>,
    },
    Box {
        title: String,
        x_label: String,
        y_label: String,
        groups: Vec<BoxSummary>,
    },
    Line {
        title: String,
        x_label: String,
        y_label: String,
        points: Vec<(f64, f64)>,
        reference: Option<ReferenceLine>,
    },
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Pie { title, .. }
            | Chart::Bar { title, .. }
            | Chart::Scatter { title, .. }
            | Chart::Histogram { title, .. }
            | Chart::Box { title, .. }
            | Chart::Line { title, .. } => title,
        }
    }

    pub fn bar(title: &str, x_label: &str, y_label: &str, bars: Vec<Slice>) -> Self {
        Chart::Bar {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            bars,
            color_scale: None,
        }
    }

    /// Colour bars by value on a continuous scale; no effect on other kinds.
    pub fn with_color_scale(mut self, scale: &str) -> Self {
        if let Chart::Bar { color_scale, .. } = &mut self {
            *color_scale = Some(scale.to_string());
        }
        self
    }

    pub fn pie(title: &str, slices: Vec<Slice>, hole: f64) -> Self {
        Chart::Pie {
            title: title.to_string(),
            slices,
            hole,
        }
    }

    /// Total across pie slices or bars; zero for other kinds.
    pub fn value_total(&self) -> f64 {
        match self {
            Chart::Pie { slices, .. } => slices.iter().map(|s| s.value).sum(),
            Chart::Bar { bars, .. } => bars.iter().map(|s| s.value).sum(),
            _ => 0.0,
        }
    }
}

/// A labelled value: one pie slice or one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

impl Slice {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct ScatterPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub hover: Vec<(String, f64)>,
}

/// Horizontal dashed guide drawn across a line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct ReferenceLine {
    pub y: f64,
    pub label: String,
}
