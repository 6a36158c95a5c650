use crate::color::{Color, ColorMap};
use crate::config::LegendStyle;
use crate::scene::{Primitive, Scene};
use crate::treemap::Rect;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub name: String,
    pub color: Color,
    /// Top of the item row.
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub width: f64,
    pub height: f64,
    pub items: Vec<LegendItem>,
    style: LegendStyle,
}

impl Legend {
    /// One swatch and label per category in the color map's order.
    pub fn build(colors: &ColorMap, style: &LegendStyle) -> Self {
        let step = style.item_height + style.item_padding;
        let items: Vec<LegendItem> = colors
            .iter()
            .enumerate()
            .map(|(i, (name, color))| LegendItem {
                name: name.to_string(),
                color,
                y: i as f64 * step,
            })
            .collect();
        Self {
            width: style.width,
            height: items.len() as f64 * step + style.bottom_margin,
            items,
            style: style.clone(),
        }
    }

    pub fn scene(&self) -> Scene {
        let s = &self.style;
        let mut scene = Scene::new(self.width, self.height);
        for item in &self.items {
            scene.push(Primitive::Rect {
                bounds: Rect::new(s.left, item.y, s.left + s.swatch, item.y + s.swatch),
                fill: item.color,
                stroke: Some(s.stroke),
                class: "legend-item",
                tile: None,
            });
            scene.push(Primitive::Text {
                x: s.left + s.text_dx,
                y: item.y + s.text_dy,
                text: item.name.clone(),
                font_size: s.font_size,
                fill: s.text_color,
            });
        }
        scene
    }
}
