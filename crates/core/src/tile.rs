use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorScale};
use crate::error::{FundmapError, Result};
use crate::hierarchy::Hierarchy;
use crate::human::format_currency;
use crate::scene::Element;
use crate::tooltip::TooltipController;
use crate::treemap::{LayoutRect, Rect};

pub const CHAR_WIDTH_PX: f64 = 7.0;
pub const LINE_HEIGHT_PX: f64 = 15.0;
pub const LABEL_X: f64 = 4.0;
pub const LABEL_BASELINE: f64 = 12.0;
pub const LABEL_STEP: f64 = 10.0;
pub const TOOLTIP_OFFSET_X: f64 = 10.0;
pub const TOOLTIP_OFFSET_Y: f64 = -28.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// One drawable leaf: a rectangle in surface coordinates plus its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub name: String,
    pub category: String,
    pub value: f64,
    pub fill: Color,
    pub rect: Rect,
    /// Offsets relative to the tile's top-left corner.
    pub label: Vec<LabelLine>,
}

impl Tile {
    pub fn from_layout(hierarchy: &Hierarchy, lr: &LayoutRect, scale: &ColorScale) -> Result<Self> {
        let node = hierarchy.node(lr.node);
        let category = node
            .category()
            .ok_or_else(|| FundmapError::InvalidData(format!("'{}' is not a leaf", node.name)))?;
        let label = wrap_label(&node.name, lr.width(), lr.height())
            .into_iter()
            .enumerate()
            .map(|(i, text)| LabelLine {
                text,
                x: LABEL_X,
                y: LABEL_BASELINE + i as f64 * LABEL_STEP,
            })
            .collect();
        Ok(Self {
            name: node.name.clone(),
            category: category.to_string(),
            value: node.aggregate_value,
            fill: scale.get(category)?,
            rect: lr.rect(),
            label,
        })
    }

    pub fn tooltip_text(&self) -> String {
        format!("{}\n{}\n{}", self.name, self.category, format_currency(self.value))
    }

    /// Pointer coordinates are page coordinates supplied by the caller.
    pub fn pointer_enter(&self, tooltip: &mut TooltipController, page_x: f64, page_y: f64) {
        tooltip.show(
            self.tooltip_text(),
            page_x + TOOLTIP_OFFSET_X,
            page_y + TOOLTIP_OFFSET_Y,
        );
        tooltip.set_data_value(Some(self.value));
    }

    pub fn pointer_leave(&self, tooltip: &mut TooltipController) {
        tooltip.hide();
    }

    pub fn to_element(&self) -> Element {
        let rect = Element::new("rect")
            .attr("class", "tile")
            .attr("x", 0)
            .attr("y", 0)
            .attr("width", self.rect.width())
            .attr("height", self.rect.height())
            .attr("fill", self.fill)
            .attr("data-name", &self.name)
            .attr("data-value", self.value)
            .attr("data-category", &self.category);
        let text = self.label.iter().fold(
            Element::new("text").attr("class", "tile-text"),
            |text, line| {
                text.child(
                    Element::new("tspan")
                        .attr("x", line.x)
                        .attr("y", line.y)
                        .text(line.text.clone()),
                )
            },
        );
        Element::new("g")
            .attr(
                "transform",
                format!("translate({},{})", self.rect.x0, self.rect.y0),
            )
            .child(rect)
            .child(text)
    }
}

/// Chops `name` into fixed-width lines that fit a tile of the given size.
/// Text past the last line that fits is dropped.
pub fn wrap_label(name: &str, width_px: f64, height_px: f64) -> Vec<String> {
    let per_line = (width_px / CHAR_WIDTH_PX).floor();
    let max_lines = (height_px / LINE_HEIGHT_PX).floor();
    if !(per_line >= 1.0) || !(max_lines >= 1.0) {
        return Vec::new();
    }
    let per_line = per_line as usize;
    let max_lines = max_lines as usize;

    let chars: Vec<char> = name.chars().collect();
    chars
        .chunks(per_line)
        .take(max_lines)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

pub fn render_tiles(
    hierarchy: &Hierarchy,
    rects: &[LayoutRect],
    scale: &ColorScale,
) -> Result<Vec<Tile>> {
    rects
        .iter()
        .map(|lr| Tile::from_layout(hierarchy, lr, scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_fits_on_one_line() {
        assert_eq!(wrap_label("Technology", 70.0, 45.0), vec!["Technology"]);
    }

    #[test]
    fn name_wraps_by_character() {
        assert_eq!(wrap_label("Technology", 35.0, 45.0), vec!["Techn", "ology"]);
    }

    #[test]
    fn excess_lines_are_dropped() {
        assert_eq!(wrap_label("Technology", 21.0, 30.0), vec!["Tec", "hno"]);
    }

    #[test]
    fn narrow_or_short_tiles_get_no_label() {
        assert!(wrap_label("Technology", 6.0, 100.0).is_empty());
        assert!(wrap_label("Technology", 100.0, 14.0).is_empty());
        assert!(wrap_label("Technology", 0.0, 0.0).is_empty());
    }

    #[test]
    fn multibyte_names_split_on_chars() {
        assert_eq!(wrap_label("Café Olé", 28.0, 30.0), vec!["Café", " Olé"]);
    }

    fn tile() -> Tile {
        Tile {
            name: "Pebble".into(),
            category: "Product Design".into(),
            value: 1234567.0,
            fill: Color::rgb(1, 2, 3),
            rect: Rect::new(10.0, 20.0, 80.0, 65.0),
            label: vec![LabelLine {
                text: "Pebble".into(),
                x: 4.0,
                y: 12.0,
            }],
        }
    }

    #[test]
    fn hover_shows_and_hides_tooltip() {
        let t = tile();
        let mut tooltip = TooltipController::new();
        t.pointer_enter(&mut tooltip, 100.0, 200.0);
        let s = tooltip.state();
        assert_eq!(s.text, "Pebble\nProduct Design\n$1,234,567");
        assert_eq!((s.x, s.y), (110.0, 172.0));
        assert_eq!(s.opacity, 0.9);
        assert_eq!(s.data_value, Some(1234567.0));
        t.pointer_leave(&mut tooltip);
        assert_eq!(tooltip.state().opacity, 0.0);
    }

    #[test]
    fn element_carries_data_attributes() {
        let el = tile().to_element();
        assert_eq!(el.get_attr("transform"), Some("translate(10,20)"));
        let rect = &el.children[0];
        assert_eq!(rect.get_attr("width"), Some("70"));
        assert_eq!(rect.get_attr("height"), Some("45"));
        assert_eq!(rect.get_attr("fill"), Some("rgb(1, 2, 3)"));
        assert_eq!(rect.get_attr("data-name"), Some("Pebble"));
        assert_eq!(rect.get_attr("data-value"), Some("1234567"));
        assert_eq!(rect.get_attr("data-category"), Some("Product Design"));
        let tspan = &el.children[1].children[0];
        assert_eq!(tspan.get_attr("y"), Some("12"));
        assert_eq!(tspan.text.as_deref(), Some("Pebble"));
    }
}
