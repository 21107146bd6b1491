//! Query parameters shared by the report routes

use common::models::Weights;
use serde::Deserialize;

/// Breakdown sizes offered by the report page
pub const TOP_CHOICES: [usize; 5] = [5, 10, 15, 20, 25];
pub const DEFAULT_TOP: usize = 10;

/// Slider values. Missing values take the defaults, everything is clamped
/// to [0, 1].
#[derive(Debug, Default, Deserialize)]
pub struct WeightsQuery {
    pub shipping: Option<f64>,
    pub collaboration: Option<f64>,
    pub speed: Option<f64>,
}

impl WeightsQuery {
    pub fn weights(&self) -> Weights {
        let default = Weights::DEFAULT;
        Weights::new(
            unit(self.shipping.unwrap_or(default.shipping)),
            unit(self.collaboration.unwrap_or(default.collaboration)),
            unit(self.speed.unwrap_or(default.speed)),
        )
    }
}

fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    5
}

#[derive(Debug, Deserialize)]
pub struct BreakdownQuery {
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize {
    DEFAULT_TOP
}

/// Non-weight controls of the HTML page
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub top: Option<usize>,
    pub engineer: Option<String>,
}

impl PageQuery {
    /// Breakdown size, snapped to one of [`TOP_CHOICES`]
    pub fn top(&self) -> usize {
        self.top
            .filter(|t| TOP_CHOICES.contains(t))
            .unwrap_or(DEFAULT_TOP)
    }

    pub fn engineer(&self) -> Option<&str> {
        self.engineer.as_deref().filter(|e| !e.is_empty())
    }
}
