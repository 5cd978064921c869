use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::error::DashboardError;

// ============================================================================
// Page - Navigation targets in the sidebar
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Dashboard,
    Planner,
    RiskSimulator,
    BenefitAnalysis,
    About,
}

impl Page {
    /// Sidebar order; the first entry is selected on load.
    pub fn all() -> impl Iterator<Item = Page> {
        [
            Page::Dashboard,
            Page::Planner,
            Page::RiskSimulator,
            Page::BenefitAnalysis,
            Page::About,
        ]
        .into_iter()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Data Dashboard",
            Page::Planner => "Intelligent Planner",
            Page::RiskSimulator => "Risk Simulator",
            Page::BenefitAnalysis => "Benefit Analysis",
            Page::About => "About",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Planner => "planner",
            Page::RiskSimulator => "risk_simulator",
            Page::BenefitAnalysis => "benefit_analysis",
            Page::About => "about",
        }
    }
}

impl FromStr for Page {
    type Err = DashboardError;

    /// Accepts either the serialized slug or the sidebar label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Page::all()
            .find(|p| p.slug() == wanted || p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownPage(s.to_string()))
    }
}

// ============================================================================
// Planner inputs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "snake_case")]
pub enum RiskPreference {
    VeryConservative,
    Conservative,
    #[default]
    Balanced,
    Aggressive,
    VeryAggressive,
}

impl RiskPreference {
    pub fn label(&self) -> &'static str {
        match self {
            RiskPreference::VeryConservative => "Very conservative",
            RiskPreference::Conservative => "Conservative",
            RiskPreference::Balanced => "Balanced",
            RiskPreference::Aggressive => "Aggressive",
            RiskPreference::VeryAggressive => "Very aggressive",
        }
    }
}

/// Where the planner is in its generate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Idle,
    Processing,
    Complete,
}

// ============================================================================
// Risk inputs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "snake_case")]
pub enum ClimateScenarioKind {
    #[default]
    Normal,
    MildDrought,
    SevereDrought,
    Flood,
    Frost,
    HeatStress,
}

impl ClimateScenarioKind {
    pub fn all() -> impl Iterator<Item = ClimateScenarioKind> {
        [
            ClimateScenarioKind::Normal,
            ClimateScenarioKind::MildDrought,
            ClimateScenarioKind::SevereDrought,
            ClimateScenarioKind::Flood,
            ClimateScenarioKind::Frost,
            ClimateScenarioKind::HeatStress,
        ]
        .into_iter()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClimateScenarioKind::Normal => "Normal year",
            ClimateScenarioKind::MildDrought => "Mild drought",
            ClimateScenarioKind::SevereDrought => "Severe drought",
            ClimateScenarioKind::Flood => "Flooding",
            ClimateScenarioKind::Frost => "Frost damage",
            ClimateScenarioKind::HeatStress => "Heat stress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "snake_case")]
pub enum PolicyChange {
    GrainSubsidyIncrease,
    EcologicalCompensation,
    CropInsuranceRollout,
    WaterManagement,
    CarbonEmissionLimits,
}

impl PolicyChange {
    pub fn all() -> impl Iterator<Item = PolicyChange> {
        [
            PolicyChange::GrainSubsidyIncrease,
            PolicyChange::EcologicalCompensation,
            PolicyChange::CropInsuranceRollout,
            PolicyChange::WaterManagement,
            PolicyChange::CarbonEmissionLimits,
        ]
        .into_iter()
    }

    pub fn label(&self) -> &'static str {
        match self {
            PolicyChange::GrainSubsidyIncrease => "Higher grain subsidies",
            PolicyChange::EcologicalCompensation => "Ecological compensation",
            PolicyChange::CropInsuranceRollout => "Crop insurance rollout",
            PolicyChange::WaterManagement => "Stricter water management",
            PolicyChange::CarbonEmissionLimits => "Carbon emission requirements",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parses_slug_and_label() {
        assert_eq!("planner".parse::<Page>(), Ok(Page::Planner));
        assert_eq!("Risk Simulator".parse::<Page>(), Ok(Page::RiskSimulator));
        assert_eq!(" benefit_analysis ".parse::<Page>(), Ok(Page::BenefitAnalysis));
    }

    #[test]
    fn unknown_page_is_an_error() {
        assert_eq!(
            "settings".parse::<Page>(),
            Err(DashboardError::UnknownPage("settings".to_string()))
        );
    }

    #[test]
    fn dashboard_is_first_and_default() {
        assert_eq!(Page::all().next(), Some(Page::default()));
        assert_eq!(Page::all().count(), 5);
    }
}
