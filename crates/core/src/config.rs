use crate::color::{default_palette, Color};
use crate::treemap::LayoutOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATA_URL: &str =
    "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map/video-game-sales-data.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileStyle {
    pub font_size: f32,
    /// Label anchor relative to the tile's top-left corner (baseline).
    pub label_dx: f64,
    pub label_dy: f64,
    /// Horizontal room reserved when fitting a label to its tile.
    pub label_margin: f64,
    pub label_color: Color,
    pub stroke: Color,
    /// Fill for tiles whose category has no assigned color.
    pub fallback_fill: Color,
}

impl Default for TileStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            label_dx: 5.0,
            label_dy: 20.0,
            label_margin: 10.0,
            label_color: Color::WHITE,
            stroke: Color::BLACK,
            fallback_fill: Color::GRAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendStyle {
    pub width: f64,
    pub item_height: f64,
    pub item_padding: f64,
    /// Extra height added below the last item.
    pub bottom_margin: f64,
    pub left: f64,
    pub swatch: f64,
    pub text_dx: f64,
    pub text_dy: f64,
    pub font_size: f32,
    pub text_color: Color,
    pub stroke: Color,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            width: 500.0,
            item_height: 20.0,
            item_padding: 5.0,
            bottom_margin: 20.0,
            left: 10.0,
            swatch: 20.0,
            text_dx: 30.0,
            text_dy: 15.0,
            font_size: 14.0,
            text_color: Color::BLACK,
            stroke: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipStyle {
    /// Offset from the pointer to the tooltip's anchor.
    pub dx: f64,
    pub dy: f64,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self { dx: 10.0, dy: -20.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_url: String,
    pub layout: LayoutOptions,
    pub palette: Vec<Color>,
    pub tiles: TileStyle,
    pub legend: LegendStyle,
    pub tooltip: TooltipStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            layout: LayoutOptions::default(),
            palette: default_palette(),
            tiles: TileStyle::default(),
            legend: LegendStyle::default(),
            tooltip: TooltipStyle::default(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
