use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FundmapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Converts a cubehelix color (hue in degrees, saturation, lightness).
    pub fn from_cubehelix(h: f64, s: f64, l: f64) -> Self {
        const A: f64 = -0.14861;
        const B: f64 = 1.78277;
        const C: f64 = -0.29227;
        const D: f64 = -0.90649;
        const E: f64 = 1.97294;

        let h = (h + 120.0).to_radians();
        let a = s * l * (1.0 - l);
        let (sin_h, cos_h) = h.sin_cos();
        Self {
            r: channel(l + a * (A * cos_h + B * sin_h)),
            g: channel(l + a * (C * cos_h + D * sin_h)),
            b: channel(l + a * (E * cos_h)),
        }
    }
}

fn channel(v: f64) -> u8 {
    let v = (v * 255.0).round();
    if v.is_nan() {
        0
    } else {
        v.clamp(0.0, 255.0) as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Cyclic rainbow spectrum; `t` wraps into `[0, 1]`.
pub fn rainbow(t: f64) -> Color {
    let t = if (0.0..=1.0).contains(&t) { t } else { t - t.floor() };
    let ts = (t - 0.5).abs();
    Color::from_cubehelix(360.0 * t - 100.0, 1.5 - 1.5 * ts, 0.8 - 0.9 * ts)
}

/// Category name to color, in assignment order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    entries: Vec<(String, Color)>,
}

impl ColorScale {
    /// The i-th category is sampled at `i / n` along [`rainbow`].
    pub fn assign(categories: &[String]) -> Self {
        let n = categories.len() as f64;
        let entries = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), rainbow(i as f64 / n)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, category: &str) -> Result<Color> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, color)| *color)
            .ok_or_else(|| FundmapError::UnknownCategory(category.to_string()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
