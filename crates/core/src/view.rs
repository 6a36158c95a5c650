use crate::color::{Color, ColorMap};
use crate::config::{TileStyle, TooltipStyle};
use crate::label::{fit_label, TextMeasure};
use crate::model::{Hierarchy, NodeId};
use crate::scene::{Primitive, Scene, TileAttrs};
use crate::tooltip::{Point, Tooltip, TooltipContent};
use crate::treemap::{Layout, Rect};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub node: NodeId,
    pub bounds: Rect,
    pub name: String,
    pub category: String,
    pub value: f64,
    pub fill: Color,
    /// Name fitted to the tile width.
    pub label: String,
}

impl Tile {
    pub fn tooltip(&self) -> TooltipContent {
        TooltipContent {
            name: self.name.clone(),
            category: self.category.clone(),
            value: self.value,
        }
    }
}

/// The drawn treemap: one tile per leaf plus the hover tooltip it owns.
#[derive(Debug, Clone)]
pub struct TreemapView {
    pub width: f64,
    pub height: f64,
    pub tiles: Vec<Tile>,
    pub style: TileStyle,
    tooltip: Tooltip,
}

impl TreemapView {
    pub fn build(
        tree: &Hierarchy,
        layout: &Layout,
        colors: &ColorMap,
        size: (f64, f64),
        style: &TileStyle,
        tooltip: TooltipStyle,
        measure: &dyn TextMeasure,
    ) -> Self {
        let tiles = layout
            .leaves
            .iter()
            .map(|leaf| {
                let node = tree.get(leaf.node);
                let category = node.category.clone().unwrap_or_default();
                let fill = colors.get(&category).unwrap_or_else(|| {
                    tracing::debug!(%category, name = %node.name, "no color for category");
                    style.fallback_fill
                });
                let max_width = (leaf.rect.width() - style.label_margin) as f32;
                Tile {
                    node: leaf.node,
                    bounds: leaf.rect,
                    name: node.name.clone(),
                    category,
                    value: node.value,
                    fill,
                    label: fit_label(&node.name, max_width, style.font_size, measure),
                }
            })
            .collect();
        Self {
            width: size.0,
            height: size.1,
            tiles,
            style: style.clone(),
            tooltip: Tooltip::new(tooltip),
        }
    }

    /// Index of the tile under `(x, y)` in canvas units.
    pub fn tile_at(&self, x: f64, y: f64) -> Option<usize> {
        self.tiles.iter().position(|t| t.bounds.contains(x, y))
    }

    /// Route a pointer position (or `None` when it left the canvas) to the tooltip.
    pub fn pointer_moved(&mut self, pointer: Option<Point>) {
        let Some(p) = pointer else {
            self.tooltip.leave();
            return;
        };
        let hit = self.tile_at(p.x, p.y).map(|i| (i, self.tiles[i].tooltip()));
        self.tooltip.pointer_at(hit, p);
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new(self.width, self.height);
        for t in &self.tiles {
            scene.push(Primitive::Rect {
                bounds: t.bounds,
                fill: t.fill,
                stroke: Some(self.style.stroke),
                class: "tile",
                tile: Some(TileAttrs {
                    name: t.name.clone(),
                    category: t.category.clone(),
                    value: t.value,
                }),
            });
        }
        for t in &self.tiles {
            if t.label.is_empty() {
                continue;
            }
            scene.push(Primitive::Text {
                x: t.bounds.x0 + self.style.label_dx,
                y: t.bounds.y0 + self.style.label_dy,
                text: t.label.clone(),
                font_size: self.style.font_size,
                fill: self.style.label_color,
            });
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::default_palette;
    use crate::label::FixedAdvance;
    use crate::model::RawNode;
    use crate::treemap::{compute_layout, sort_by_value, LayoutOptions};
    use serde_json::json;

    fn view() -> TreemapView {
        let raw: RawNode = serde_json::from_value(json!({
            "name": "root",
            "children": [
                { "name": "GB", "children": [
                    { "name": "Tetris", "category": "GB", "value": 30.26 },
                    { "name": "Pokemon Gold/Pokemon Silver", "category": "GB", "value": "23.1" }
                ]},
                { "name": "NES", "children": [
                    { "name": "Super Mario Bros.", "category": "NES", "value": "40.24" }
                ]}
            ]
        }))
        .unwrap();
        let mut h = Hierarchy::from_raw(&raw);
        let colors = ColorMap::new(&h.categories(), &default_palette()).unwrap();
        sort_by_value(&mut h);
        let layout = compute_layout(&h, &LayoutOptions::default());
        TreemapView::build(
            &h,
            &layout,
            &colors,
            (1000.0, 600.0),
            &TileStyle::default(),
            TooltipStyle::default(),
            &FixedAdvance::default(),
        )
    }

    #[test]
    fn tiles_carry_leaf_attributes_and_colors() {
        let v = view();
        let palette = default_palette();
        assert_eq!(v.tiles.len(), 3);
        let tetris = v.tiles.iter().find(|t| t.name == "Tetris").unwrap();
        assert_eq!(tetris.category, "GB");
        assert_eq!(tetris.value, 30.26);
        assert_eq!(tetris.fill, palette[0]);
        let smb = v.tiles.iter().find(|t| t.category == "NES").unwrap();
        assert_eq!(smb.fill, palette[1]);
    }

    #[test]
    fn labels_fit_their_tiles() {
        let v = view();
        let m = FixedAdvance::default();
        for t in &v.tiles {
            let max = (t.bounds.width() - v.style.label_margin) as f32;
            assert!(m.width(&t.label, v.style.font_size) <= max || t.label.is_empty());
        }
    }

    #[test]
    fn hover_tracks_pointer_and_hides_on_leave() {
        let mut v = view();
        let i = v.tiles.iter().position(|t| t.name == "Tetris").unwrap();
        let b = v.tiles[i].bounds;
        let inside = Point::new(b.x0 + 2.0, b.y0 + 2.0);
        v.pointer_moved(Some(inside));
        assert_eq!(v.tooltip().content().unwrap().to_string(), "Tetris / System: GB / Sales: 30.26M");
        let moved = Point::new(b.x0 + 4.0, b.y0 + 6.0);
        v.pointer_moved(Some(moved));
        assert_eq!(v.tooltip().anchor(), Some(Point::new(moved.x + 10.0, moved.y - 20.0)));
        // the padding gap between tiles belongs to no tile
        v.pointer_moved(Some(Point::new(0.2, 0.2)));
        assert!(!v.tooltip().is_visible());
    }

    #[test]
    fn scene_has_rect_then_label_per_tile() {
        let v = view();
        let scene = v.scene();
        assert_eq!(scene.rects().count(), 3);
        assert_eq!(scene.texts().count(), v.tiles.iter().filter(|t| !t.label.is_empty()).count());
    }
}
