use serde::{Deserialize, Serialize};

use crate::scene::{ContainerRegion, Surface};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub legend_width: f64,
    pub legend_height: f64,
    pub padding: f64,
    pub title: String,
    pub description: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 570.0,
            legend_width: 500.0,
            legend_height: 120.0,
            padding: 1.0,
            title: "Kickstarter Pledges".to_string(),
            description: "Top 100 Most Pledged Kickstarter Campaigns Grouped By Category"
                .to_string(),
        }
    }
}

impl RenderConfig {
    /// Container, chart surface and legend surface sized from this config.
    pub fn surfaces(&self) -> (ContainerRegion, Surface, Surface) {
        (
            ContainerRegion::new("chart-div", self.width, self.height),
            Surface::new("chart-svg", self.width, self.height),
            Surface::new("legend", self.legend_width, self.legend_height),
        )
    }
}
