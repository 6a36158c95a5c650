//! Retained-mode drawing primitives shared by the desktop viewer and the SVG
//! exporter.

use crate::color::Color;
use crate::treemap::Rect;
use serde::Serialize;

/// Data attributes carried by a treemap tile for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileAttrs {
    pub name: String,
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Primitive {
    Rect {
        bounds: Rect,
        fill: Color,
        stroke: Option<Color>,
        class: &'static str,
        tile: Option<TileAttrs>,
    },
    Text {
        x: f64,
        /// Baseline.
        y: f64,
        text: String,
        font_size: f32,
        fill: Color,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, primitives: Vec::new() }
    }

    pub fn push(&mut self, p: Primitive) {
        self.primitives.push(p);
    }

    pub fn rects(&self) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives.iter().filter(|p| matches!(p, Primitive::Rect { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
