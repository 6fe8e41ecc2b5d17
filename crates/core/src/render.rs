use crate::color::ColorScale;
use crate::error::Result;
use crate::hierarchy::Hierarchy;
use crate::legend::{self, LegendEntry};
use crate::model::RawNode;
use crate::scene::{ContainerRegion, Element, Surface};
use crate::tile::{render_tiles, Tile};
use crate::tooltip::TooltipController;
use crate::treemap;

pub const DEFAULT_PADDING: f64 = 1.0;
pub const TOOLTIP_ID: &str = "tooltip";

/// Everything a single render produced, plus the tooltip it drives.
/// A new render replaces the whole session.
#[derive(Debug)]
pub struct RenderSession {
    pub hierarchy: Hierarchy,
    pub categories: Vec<String>,
    pub scale: ColorScale,
    pub tiles: Vec<Tile>,
    pub legend: Vec<LegendEntry>,
    tooltip: TooltipController,
    hovered: Option<usize>,
}

impl RenderSession {
    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Index of the tile under a point in surface coordinates.
    pub fn tile_at(&self, x: f64, y: f64) -> Option<usize> {
        self.tiles.iter().position(|t| t.rect.contains(x, y))
    }

    pub fn pointer_enter(&mut self, tile: usize, page_x: f64, page_y: f64) {
        if let Some(t) = self.tiles.get(tile) {
            t.pointer_enter(&mut self.tooltip, page_x, page_y);
            self.hovered = Some(tile);
        }
    }

    pub fn pointer_leave(&mut self, tile: usize) {
        if let Some(t) = self.tiles.get(tile) {
            t.pointer_leave(&mut self.tooltip);
            if self.hovered == Some(tile) {
                self.hovered = None;
            }
        }
    }

    /// Turns a raw pointer position into leave/enter transitions.
    /// `surface_*` locate the tile, `page_*` position the tooltip.
    pub fn pointer_move(&mut self, surface_x: f64, surface_y: f64, page_x: f64, page_y: f64) {
        let target = self.tile_at(surface_x, surface_y);
        if let Some(prev) = self.hovered {
            if Some(prev) != target {
                self.pointer_leave(prev);
            }
        }
        if let Some(t) = target {
            // the tooltip follows the pointer while it stays over a tile
            self.pointer_enter(t, page_x, page_y);
        }
    }

    pub fn pointer_exit(&mut self) {
        if let Some(prev) = self.hovered {
            self.pointer_leave(prev);
        }
    }
}

pub fn generate_treemap(
    container: &mut ContainerRegion,
    svg: &mut Surface,
    legend_surface: &mut Surface,
    data: &RawNode,
) -> Result<RenderSession> {
    generate_treemap_padded(container, svg, legend_surface, data, DEFAULT_PADDING)
}

/// Builds the hierarchy, lays it out to `svg`'s size and fills both surfaces.
/// Nothing is written to the surfaces unless every stage succeeds.
pub fn generate_treemap_padded(
    container: &mut ContainerRegion,
    svg: &mut Surface,
    legend_surface: &mut Surface,
    data: &RawNode,
    padding: f64,
) -> Result<RenderSession> {
    let hierarchy = Hierarchy::from_raw(data)?;
    let categories = hierarchy.top_level_categories();
    let rects = treemap::layout(&hierarchy, svg.width, svg.height, padding)?;
    let scale = ColorScale::assign(&categories);
    let tiles = render_tiles(&hierarchy, &rects, &scale)?;
    let legend = legend::render(&categories, &scale)?;

    svg.clear();
    for t in &tiles {
        svg.append(t.to_element());
    }
    legend_surface.clear();
    for e in &legend {
        legend_surface.append(e.to_element());
    }
    container
        .children
        .retain(|e| e.get_attr("id") != Some(TOOLTIP_ID));
    container.append(
        Element::new("div")
            .attr("id", TOOLTIP_ID)
            .attr("class", "tooltip-div")
            .attr("style", "opacity: 0"),
    );

    tracing::info!(
        tiles = tiles.len(),
        categories = categories.len(),
        total = hierarchy.total_value(),
        "treemap rendered"
    );
    Ok(RenderSession {
        hierarchy,
        categories,
        scale,
        tiles,
        legend,
        tooltip: TooltipController::new(),
        hovered: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FundmapError;
    use crate::model::RawNode;

    fn sample() -> RawNode {
        RawNode::branch(
            "root",
            vec![
                RawNode::branch(
                    "Games",
                    vec![RawNode::leaf("Dice", "Games", 30.0), RawNode::leaf("Cards", "Games", 20.0)],
                ),
                RawNode::branch(
                    "Music",
                    vec![RawNode::leaf("Album", "Music", 40.0), RawNode::leaf("Tour", "Music", 10.0)],
                ),
            ],
        )
    }

    fn surfaces() -> (ContainerRegion, Surface, Surface) {
        (
            ContainerRegion::new("chart-div", 400.0, 300.0),
            Surface::new("chart-svg", 400.0, 300.0),
            Surface::new("legend", 300.0, 120.0),
        )
    }

    #[test]
    fn hover_moves_between_tiles() {
        let (mut c, mut s, mut l) = surfaces();
        let mut session = generate_treemap(&mut c, &mut s, &mut l, &sample()).unwrap();
        let a = session.tiles[0].rect;
        let b = session.tiles[1].rect;
        let (ax, ay) = ((a.x0 + a.x1) / 2.0, (a.y0 + a.y1) / 2.0);
        let (bx, by) = ((b.x0 + b.x1) / 2.0, (b.y0 + b.y1) / 2.0);

        session.pointer_move(ax, ay, ax, ay);
        assert_eq!(session.hovered(), Some(0));
        assert!(session.tooltip().state().text.starts_with(&session.tiles[0].name));

        session.pointer_move(bx, by, bx, by);
        assert_eq!(session.hovered(), Some(1));
        assert!(session.tooltip().state().is_visible());

        session.pointer_exit();
        assert_eq!(session.hovered(), None);
        assert!(!session.tooltip().state().is_visible());
    }

    #[test]
    fn failed_render_leaves_surfaces_untouched() {
        let (mut c, mut s, mut l) = surfaces();
        generate_treemap(&mut c, &mut s, &mut l, &sample()).unwrap();
        let before = s.clone();

        let mut bad = Surface::new("chart-svg", 0.0, 300.0);
        let err = generate_treemap(&mut c, &mut bad, &mut l, &sample()).unwrap_err();
        assert!(matches!(err, FundmapError::Layout(_)));
        assert!(bad.children.is_empty());
        assert_eq!(s, before);
    }

    #[test]
    fn rerender_replaces_previous_output() {
        let (mut c, mut s, mut l) = surfaces();
        generate_treemap(&mut c, &mut s, &mut l, &sample()).unwrap();
        generate_treemap(&mut c, &mut s, &mut l, &sample()).unwrap();
        assert_eq!(s.children.len(), 4);
        assert_eq!(l.children.len(), 2);
        assert_eq!(c.children.len(), 1);
    }
}
