use serde::{Deserialize, Serialize};

use crate::error::{FundmapError, Result};
use crate::hierarchy::Hierarchy;
use crate::model::NodeId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Strict interior overlap; shared edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Shrinks by `p` on every side, collapsing to the midline when too small.
    fn inset(self, p: f64) -> Self {
        let (mut x0, mut y0, mut x1, mut y1) = (self.x0 + p, self.y0 + p, self.x1 - p, self.y1 - p);
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }
        Self { x0, y0, x1, y1 }
    }

    fn round(self) -> Self {
        Self {
            x0: self.x0.round(),
            y0: self.y0.round(),
            x1: self.x1.round(),
            y1: self.y1.round(),
        }
    }
}

/// Rectangle assigned to one leaf of the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub node: NodeId,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl LayoutRect {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x0, self.y0, self.x1, self.y1)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Splits `area` among weighted children. Returns one rectangle per weight,
/// in the same order as `weights`.
pub trait Tiler {
    fn tile(&self, weights: &[f64], area: Rect) -> Vec<Rect>;
}

/// Squarified tiling (Bruls et al.) with a golden-ratio target aspect.
#[derive(Clone, Copy, Debug)]
pub struct Squarify {
    pub ratio: f64,
}

impl Default for Squarify {
    fn default() -> Self {
        Self {
            ratio: (1.0 + 5f64.sqrt()) / 2.0,
        }
    }
}

impl Tiler for Squarify {
    fn tile(&self, weights: &[f64], area: Rect) -> Vec<Rect> {
        squarify(weights, area, self.ratio)
    }
}

pub fn squarify(weights: &[f64], area: Rect, ratio: f64) -> Vec<Rect> {
    let n = weights.len();
    let mut out = vec![Rect::default(); n];
    let Rect {
        mut x0,
        mut y0,
        x1,
        y1,
    } = area;
    let mut remaining: f64 = weights.iter().sum();
    let mut i0 = 0usize;
    let mut i1 = 0usize;

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // find the next non-empty weight to seed the row
        let mut sum;
        loop {
            sum = weights[i1];
            i1 += 1;
            if sum > 0.0 || i1 >= n {
                break;
            }
        }
        let mut min_w = sum;
        let mut max_w = sum;
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max_w / beta).max(beta / min_w);

        // grow the row while the worst aspect ratio holds or improves
        while i1 < n {
            let w = weights[i1];
            sum += w;
            min_w = min_w.min(w);
            max_w = max_w.max(w);
            beta = sum * sum * alpha;
            let new_ratio = (max_w / beta).max(beta / min_w);
            if new_ratio > min_ratio {
                sum -= w;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &weights[i0..i1];
        if dx < dy {
            let ry1 = if remaining > 0.0 { y0 + dy * sum / remaining } else { y1 };
            dice(row, sum, Rect::new(x0, y0, x1, ry1), &mut out[i0..i1]);
            y0 = ry1;
        } else {
            let rx1 = if remaining > 0.0 { x0 + dx * sum / remaining } else { x1 };
            slice(row, sum, Rect::new(x0, y0, rx1, y1), &mut out[i0..i1]);
            x0 = rx1;
        }
        remaining -= sum;
        i0 = i1;
    }
    out
}

/// Lays a row out left to right across `area`.
fn dice(row: &[f64], sum: f64, area: Rect, out: &mut [Rect]) {
    let k = if sum > 0.0 { area.width() / sum } else { 0.0 };
    let mut x = area.x0;
    for (w, r) in row.iter().zip(out.iter_mut()) {
        let next = x + w * k;
        *r = Rect::new(x, area.y0, next, area.y1);
        x = next;
    }
}

/// Lays a row out top to bottom across `area`.
fn slice(row: &[f64], sum: f64, area: Rect, out: &mut [Rect]) {
    let k = if sum > 0.0 { area.height() / sum } else { 0.0 };
    let mut y = area.y0;
    for (w, r) in row.iter().zip(out.iter_mut()) {
        let next = y + w * k;
        *r = Rect::new(area.x0, y, area.x1, next);
        y = next;
    }
}

/// Computes one rectangle per leaf using the default squarified tiler.
pub fn layout(root: &Hierarchy, width: f64, height: f64, padding: f64) -> Result<Vec<LayoutRect>> {
    layout_with(&Squarify::default(), root, width, height, padding)
}

pub fn layout_with(
    tiler: &dyn Tiler,
    root: &Hierarchy,
    width: f64,
    height: f64,
    padding: f64,
) -> Result<Vec<LayoutRect>> {
    if !(width.is_finite() && width > 0.0) || !(height.is_finite() && height > 0.0) {
        return Err(FundmapError::Layout(format!(
            "surface must have positive size, got {width}x{height}"
        )));
    }
    let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };

    let mut boxes = vec![Rect::default(); root.len()];
    let root_id = root.root_id();
    boxes[root_id.index()] = Rect::new(0.0, 0.0, width, height);

    // Pre-order: every node's box is final before its children are tiled.
    let half = padding / 2.0;
    let mut stack = vec![root_id];
    while let Some(id) = stack.pop() {
        let node = root.node(id);
        let own = if node.parent.is_some() {
            boxes[id.index()].inset(half)
        } else {
            boxes[id.index()]
        };
        boxes[id.index()] = own;
        if node.children.is_empty() {
            continue;
        }
        let content = own.inset(padding - half);
        let weights: Vec<f64> = node
            .children
            .iter()
            .map(|c| root.node(*c).aggregate_value)
            .collect();
        let tiles = tiler.tile(&weights, content);
        for (child, r) in node.children.iter().zip(tiles) {
            boxes[child.index()] = r;
        }
        stack.extend(node.children.iter().rev().copied());
    }

    let rects: Vec<LayoutRect> = root
        .leaves()
        .into_iter()
        .map(|id| {
            let r = boxes[id.index()].round();
            LayoutRect {
                node: id,
                x0: r.x0,
                y0: r.y0,
                x1: r.x1.max(r.x0),
                y1: r.y1.max(r.y0),
            }
        })
        .collect();
    tracing::debug!(tiles = rects.len(), width, height, padding, "treemap laid out");
    Ok(rects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawNode;

    fn flat(values: &[f64]) -> Hierarchy {
        let leaves = values
            .iter()
            .enumerate()
            .map(|(i, v)| RawNode::leaf(format!("n{i}"), "c", *v))
            .collect();
        Hierarchy::from_raw(&RawNode::branch("root", leaves)).unwrap()
    }

    #[test]
    fn squarify_preserves_area() {
        let weights = [400.0, 300.0, 200.0, 100.0];
        let rects = squarify(&weights, Rect::new(0.0, 0.0, 50.0, 20.0), 1.0);
        let total: f64 = rects.iter().map(Rect::area).sum();
        assert!((total - 1000.0).abs() < 1e-6);
        for (r, w) in rects.iter().zip(weights) {
            assert!((r.area() - w).abs() < 1e-6);
        }
    }

    #[test]
    fn single_item_fills_area() {
        let rects = squarify(&[7.0], Rect::new(0.0, 0.0, 30.0, 10.0), 1.0);
        assert_eq!(rects.len(), 1);
        assert!((rects[0].width() - 30.0).abs() < 1e-9);
        assert!((rects[0].height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weights_get_empty_rects() {
        let rects = squarify(&[5.0, 0.0, 0.0], Rect::new(0.0, 0.0, 10.0, 10.0), 1.0);
        assert_eq!(rects.len(), 3);
        assert!((rects[0].area() - 100.0).abs() < 1e-9);
        assert_eq!(rects[1].area(), 0.0);
        assert_eq!(rects[2].area(), 0.0);
    }

    #[test]
    fn rejects_non_positive_size() {
        let h = flat(&[1.0]);
        assert!(matches!(layout(&h, 0.0, 10.0, 1.0), Err(FundmapError::Layout(_))));
        assert!(matches!(layout(&h, 10.0, -1.0, 1.0), Err(FundmapError::Layout(_))));
    }

    #[test]
    fn one_leaf_is_inset_by_padding() {
        let h = flat(&[1.0]);
        let rects = layout(&h, 100.0, 50.0, 1.0).unwrap();
        assert_eq!(rects.len(), 1);
        let r = rects[0];
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (1.0, 1.0, 99.0, 49.0));
    }

    #[test]
    fn coordinates_are_whole_pixels() {
        let h = flat(&[3.0, 7.0, 11.0, 13.0]);
        for r in layout(&h, 333.0, 177.0, 1.0).unwrap() {
            for v in [r.x0, r.y0, r.x1, r.y1] {
                assert_eq!(v, v.round());
            }
            assert!(r.x1 >= r.x0 && r.y1 >= r.y0);
        }
    }
}
