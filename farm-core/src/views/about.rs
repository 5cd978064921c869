use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::views::PLATFORM_TITLE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct AboutSection {
    pub heading: String,
    pub paragraphs: Vec<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct AboutView {
    pub title: String,
    pub sections: Vec<AboutSection>,
    pub notice: String,
}

fn section(heading: &str, paragraphs: &[&str], bullets: &[&str]) -> AboutSection {
    AboutSection {
        heading: heading.to_string(),
        paragraphs: paragraphs.iter().map(|s| s.to_string()).collect(),
        bullets: bullets.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn about_view() -> AboutView {
    AboutView {
        title: format!("About {PLATFORM_TITLE}"),
        sections: vec![
            section(
                "Background",
                &["A data-driven decision platform for smallholder farming in mountain \
                   regions, offering planting decisions backed by modelling and optimization."],
                &[],
            ),
            section(
                "Features",
                &[],
                &[
                    "Data dashboard: planting structure and profit distribution at a glance",
                    "Intelligent planner: crop plan recommendations balancing profit, risk and sustainability",
                    "Risk simulator: price, climate and policy stress scenarios",
                    "Benefit analysis: profit and input/output efficiency per crop",
                ],
            ),
            section(
                "Approach",
                &[],
                &[
                    "Multi-objective planning across profit, resource use and risk",
                    "Uncertainty modelling for market prices and climate",
                    "Configurable risk preference and constraints",
                    "Interactive charts for every result",
                ],
            ),
            section(
                "Value",
                &["The platform gives farm decision makers:"],
                &[
                    "Evidence for planting decisions",
                    "Early risk warnings and responses",
                    "Suggestions for raising profit",
                    "Long-term sustainable planning",
                ],
            ),
        ],
        notice: "This is a demonstration prototype. Production use needs real data \
                 and a real optimization model."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn about_lists_four_features() {
        let view = about_view();
        let features = view.sections.iter().find(|s| s.heading == "Features").unwrap();
        assert_eq!(features.bullets.len(), 4);
        assert!(view.notice.contains("prototype"));
    }
}
