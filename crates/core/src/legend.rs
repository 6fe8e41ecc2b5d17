use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorScale};
use crate::error::Result;
use crate::scene::Element;

pub const ROWS_PER_COLUMN: usize = 5;
pub const ORIGIN: f64 = 20.0;
pub const COLUMN_WIDTH: f64 = 125.0;
pub const ROW_HEIGHT: f64 = 20.0;
pub const SWATCH_SIZE: f64 = 15.0;
pub const LABEL_OFFSET: (f64, f64) = (18.0, 10.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub category: String,
    pub fill: Color,
    pub column: usize,
    pub row: usize,
    pub x: f64,
    pub y: f64,
}

impl LegendEntry {
    pub fn to_element(&self) -> Element {
        Element::new("g")
            .attr("transform", format!("translate({},{})", self.x, self.y))
            .child(
                Element::new("rect")
                    .attr("x", 0)
                    .attr("y", 0)
                    .attr("height", SWATCH_SIZE)
                    .attr("width", SWATCH_SIZE)
                    .attr("class", "legend-item")
                    .attr("fill", self.fill),
            )
            .child(
                Element::new("text")
                    .attr("x", LABEL_OFFSET.0)
                    .attr("y", LABEL_OFFSET.1)
                    .attr("class", "legend-text")
                    .text(self.category.clone()),
            )
    }
}

/// Column-major grid position of the `index`-th entry.
pub fn grid_position(index: usize) -> (usize, usize, f64, f64) {
    let column = index / ROWS_PER_COLUMN;
    let row = index % ROWS_PER_COLUMN;
    (
        column,
        row,
        ORIGIN + column as f64 * COLUMN_WIDTH,
        ORIGIN + row as f64 * ROW_HEIGHT,
    )
}

pub fn render(categories: &[String], scale: &ColorScale) -> Result<Vec<LegendEntry>> {
    categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let (column, row, x, y) = grid_position(i);
            Ok(LegendEntry {
                category: category.clone(),
                fill: scale.get(category)?,
                column,
                row,
                x,
                y,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FundmapError;

    #[test]
    fn seventh_entry_lands_in_second_column() {
        assert_eq!(grid_position(7), (1, 2, 145.0, 60.0));
        assert_eq!(grid_position(0), (0, 0, 20.0, 20.0));
        assert_eq!(grid_position(4), (0, 4, 20.0, 100.0));
        assert_eq!(grid_position(5), (1, 0, 145.0, 20.0));
    }

    #[test]
    fn entries_use_scale_colors() {
        let cats: Vec<String> = ["Games", "Music"].iter().map(|s| s.to_string()).collect();
        let scale = ColorScale::assign(&cats);
        let entries = render(&cats, &scale).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].fill, scale.get("Music").unwrap());
        let el = entries[1].to_element();
        assert_eq!(el.get_attr("transform"), Some("translate(20,40)"));
        assert_eq!(el.children[1].text.as_deref(), Some("Music"));
    }

    #[test]
    fn missing_category_fails() {
        let scale = ColorScale::assign(&["a".to_string()]);
        let err = render(&["b".to_string()], &scale).unwrap_err();
        assert!(matches!(err, FundmapError::UnknownCategory(_)));
    }
}
