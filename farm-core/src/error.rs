use thiserror::Error;

/// Failures surfaced to the page as a visible error state.
///
/// Crossing the wasm boundary these become a thrown `JsError`.
#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    #[error("unknown crop '{0}'")]
    UnknownCrop(String),

    #[error("unknown page '{0}'")]
    UnknownPage(String),

    #[error("duplicate plot id '{0}'")]
    DuplicatePlot(String),

    #[error("plot {plot_id} has non-positive area {area_mu}")]
    NonPositiveArea { plot_id: String, area_mu: f64 },

    #[error("crop {crop_name} has non-positive {field}: {value}")]
    NonPositiveEconomics {
        crop_name: String,
        field: &'static str,
        value: f64,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}
