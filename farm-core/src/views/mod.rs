//! One view per sidebar page, plus the router that picks between them.

pub mod about;
pub mod benefit;
pub mod dashboard;
pub mod planner;
pub mod risk;

pub use about::*;
pub use benefit::*;
pub use dashboard::*;
pub use planner::*;
pub use risk::*;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::config::{PlannerParams, RiskInputs};
use crate::data::SampleData;
use crate::error::DashboardError;
use crate::types::{Page, PlanStatus};

pub const PLATFORM_TITLE: &str = "Fangcun Cloud Farming";
pub const PLATFORM_VERSION: &str = "v1.0 demo";
pub const DATA_YEAR: u32 = 2024;

// ============================================================================
// Shared view pieces
// ============================================================================

/// A headline number card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Metric {
    pub label: String,
    pub value: f64,
    pub display: String,
    pub delta: Option<String>,
}

impl Metric {
    pub fn new(label: &str, value: f64, display: String) -> Self {
        Self {
            label: label.to_string(),
            value,
            display,
            delta: None,
        }
    }

    pub fn with_delta(mut self, delta: String) -> Self {
        self.delta = Some(delta);
        self
    }
}

pub(crate) fn yuan(value: f64) -> String {
    format!("¥{value:.0}")
}

// ============================================================================
// Navigation - Sidebar contents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct PageEntry {
    pub page: Page,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct Navigation {
    pub title: String,
    pub pages: Vec<PageEntry>,
    pub selected: Page,
    pub status: String,
    pub data_year: u32,
    pub version: String,
}

pub fn navigation(selected: Page) -> Navigation {
    Navigation {
        title: PLATFORM_TITLE.to_string(),
        pages: Page::all()
            .map(|page| PageEntry {
                page,
                label: page.label().to_string(),
            })
            .collect(),
        selected,
        status: "Running".to_string(),
        data_year: DATA_YEAR,
        version: PLATFORM_VERSION.to_string(),
    }
}

// ============================================================================
// Router
// ============================================================================

/// Widget state that outlives a single render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub planner: PlannerParams,
    pub plan_status: PlanStatus,
    pub plan: Option<PlanResult>,
    pub risk: RiskInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(tag = "page", content = "view", rename_all = "snake_case")]
pub enum ViewModel {
    Dashboard(DashboardView),
    Planner(PlannerView),
    RiskSimulator(RiskView),
    BenefitAnalysis(BenefitView),
    About(AboutView),
}

impl ViewModel {
    pub fn page(&self) -> Page {
        match self {
            ViewModel::Dashboard(_) => Page::Dashboard,
            ViewModel::Planner(_) => Page::Planner,
            ViewModel::RiskSimulator(_) => Page::RiskSimulator,
            ViewModel::BenefitAnalysis(_) => Page::BenefitAnalysis,
            ViewModel::About(_) => Page::About,
        }
    }
}

/// Build the view for `page` from the tables and current widget state.
pub fn render(
    data: &SampleData,
    page: Page,
    session: &SessionState,
) -> Result<ViewModel, DashboardError> {
    #[cfg(feature = "instrument")]
    tracing::info!(target: "render", page = page.label());

    let view = match page {
        Page::Dashboard => ViewModel::Dashboard(dashboard_view(data)),
        Page::Planner => ViewModel::Planner(planner_view(
            data,
            &session.planner,
            session.plan_status,
            session.plan.clone(),
        )),
        Page::RiskSimulator => ViewModel::RiskSimulator(risk_view(data, &session.risk)?),
        Page::BenefitAnalysis => ViewModel::BenefitAnalysis(benefit_view(data)),
        Page::About => ViewModel::About(about_view()),
    };
    Ok(view)
}
