use serde::{Deserialize, Serialize};

pub const VISIBLE_OPACITY: f64 = 0.9;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipState {
    pub opacity: f64,
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Value of the hovered tile, mirrored for external inspection.
    pub data_value: Option<f64>,
}

impl TooltipState {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Text split into display lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// The single floating overlay of a render session.
#[derive(Debug, Default)]
pub struct TooltipController {
    state: TooltipState,
}

impl TooltipController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, text: impl Into<String>, x: f64, y: f64) {
        self.state.text = text.into();
        self.state.x = x;
        self.state.y = y;
        self.state.opacity = VISIBLE_OPACITY;
    }

    pub fn set_data_value(&mut self, value: Option<f64>) {
        self.state.data_value = value;
    }

    /// Only opacity changes; content and position stay until the next show.
    pub fn hide(&mut self) {
        self.state.opacity = 0.0;
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }
}
