use std::borrow::Cow;

use serde::Deserialize;
use wasm_bindgen::prelude::*;

pub mod chart;
pub mod config;
pub mod data;
pub mod economics;
pub mod error;
pub mod recommend;
pub mod select;
pub mod stats;
pub mod types;
pub mod views;

pub use config::*;
pub use data::*;
pub use error::*;
pub use types::*;

#[cfg(feature = "instrument")]
pub use instrument;

use views::{Navigation, PlanResult, SessionState, ViewModel};

// ============================================================================
// WASM API - Dashboard
// ============================================================================

/// One browser session of the farm dashboard.
///
/// Holds the selected page and widget state between renders; the sample
/// tables themselves are shared and never written.
#[wasm_bindgen]
pub struct Dashboard {
    data: Cow<'static, SampleData>,
    page: Page,
    session: SessionState,
}

#[wasm_bindgen]
impl Dashboard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        Self {
            data: Cow::Borrowed(sample_data()),
            page: Page::default(),
            session: SessionState::default(),
        }
    }

    /// Sidebar contents with the current selection.
    #[wasm_bindgen]
    pub fn navigation(&self) -> Navigation {
        views::navigation(self.page)
    }

    #[wasm_bindgen]
    pub fn current_page(&self) -> Page {
        self.page
    }

    #[wasm_bindgen]
    pub fn select_page(&mut self, page: Page) {
        self.page = page;
    }

    /// Select by slug or sidebar label; throws on an unknown name.
    #[wasm_bindgen]
    pub fn select_page_by_name(&mut self, name: &str) -> Result<(), JsError> {
        self.page = name.parse()?;
        Ok(())
    }

    /// Render the selected page. Errors surface in JS as a thrown `Error`.
    #[wasm_bindgen]
    pub fn render(&self) -> Result<ViewModel, JsError> {
        Ok(self.render_view()?)
    }

    #[wasm_bindgen]
    pub fn set_planner_params(&mut self, params: PlannerParams) {
        self.update_planner_params(params);
    }

    /// Flag the planner as busy so the page can show a spinner before
    /// `generate_plan` is called.
    #[wasm_bindgen]
    pub fn request_plan(&mut self) {
        self.session.plan_status = PlanStatus::Processing;
        self.session.plan = None;
    }

    #[wasm_bindgen]
    pub fn generate_plan(&mut self) -> PlanResult {
        self.run_plan().clone()
    }

    #[wasm_bindgen]
    pub fn set_risk_inputs(&mut self, inputs: RiskInputs) {
        self.session.risk = inputs.clamped();
    }

    /// Options for the crop dropdown of the risk simulator.
    #[wasm_bindgen]
    pub fn crop_options(&self) -> js_sys::Array {
        self.data
            .crop_names()
            .into_iter()
            .map(JsValue::from_str)
            .collect()
    }

    /// The full climate scenario table.
    #[wasm_bindgen]
    pub fn climate_scenarios(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&views::climate_scenarios())?)
    }

    /// JSON entry point for hosts without the generated TypeScript bindings.
    #[wasm_bindgen]
    pub fn render_json(&mut self, request: &str) -> Result<String, JsError> {
        Ok(self.handle_json(request)?)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Body accepted by [`Dashboard::render_json`]. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonRequest {
    page: Option<String>,
    planner: Option<PlannerParams>,
    risk: Option<RiskInputs>,
    generate_plan: bool,
}

impl Dashboard {
    /// A session over caller-supplied tables instead of the sample data.
    pub fn with_data(data: SampleData) -> Self {
        Self {
            data: Cow::Owned(data),
            page: Page::default(),
            session: SessionState::default(),
        }
    }

    pub fn data(&self) -> &SampleData {
        &self.data
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn render_view(&self) -> Result<ViewModel, DashboardError> {
        views::render(&self.data, self.page, &self.session)
    }

    /// New parameters invalidate any plan built from the old ones.
    pub fn update_planner_params(&mut self, params: PlannerParams) {
        let params = params.clamped();
        if params != self.session.planner {
            self.session.planner = params;
            self.session.plan_status = PlanStatus::Idle;
            self.session.plan = None;
        }
    }

    pub fn run_plan(&mut self) -> &PlanResult {
        self.session.plan_status = PlanStatus::Processing;
        let plan = views::generate_plan(&self.data, &self.session.planner);
        self.session.plan_status = PlanStatus::Complete;
        self.session.plan.insert(plan)
    }

    /// Apply a JSON request, then render the selected page as JSON.
    pub fn handle_json(&mut self, request: &str) -> Result<String, DashboardError> {
        let request: JsonRequest = serde_json::from_str(request)?;

        if let Some(name) = request.page.as_deref() {
            self.page = name.parse()?;
        }
        if let Some(params) = request.planner {
            self.update_planner_params(params);
        }
        if let Some(inputs) = request.risk {
            self.session.risk = inputs.clamped();
        }
        if request.generate_plan {
            self.run_plan();
        }

        let view = self.render_view()?;
        Ok(serde_json::to_string(&view)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
