use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Fill colors assigned to categories, in assignment order.
pub const DEFAULT_PALETTE: [&str; 18] = [
    "#32964d", "#5cdd9f", "#016876", "#68c3ef", "#1e39ae", "#dabed9", "#7c225f", "#f372a8",
    "#b859e4", "#4f4256", "#7f7bc9", "#270fe2", "#a5e841", "#0b5313", "#b2d097", "#754819",
    "#f4a95c", "#fd5925",
];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ColorError {
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),
    #[error("palette is empty")]
    EmptyPalette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || ColorError::InvalidHex(s.to_string());
        if !hex.is_ascii() {
            return Err(bad());
        }
        let digits = |i: usize, n: usize| u8::from_str_radix(&hex[i..i + n], 16).map_err(|_| bad());
        match hex.len() {
            6 => Ok(Color::rgb(digits(0, 2)?, digits(2, 2)?, digits(4, 2)?)),
            // #rgb shorthand
            3 => Ok(Color::rgb(digits(0, 1)? * 17, digits(1, 1)? * 17, digits(2, 1)? * 17)),
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub fn default_palette() -> Vec<Color> {
    DEFAULT_PALETTE
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect()
}

/// Ordinal category -> color scale. Built once per draw and shared by the
/// tile renderer and the legend.
///
/// When there are more categories than colors the palette wraps around.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    domain: Vec<String>,
    by_name: HashMap<String, Color>,
}

impl ColorMap {
    pub fn new(categories: &[String], palette: &[Color]) -> Result<Self, ColorError> {
        if palette.is_empty() {
            return Err(ColorError::EmptyPalette);
        }
        if categories.len() > palette.len() {
            tracing::warn!(
                categories = categories.len(),
                palette = palette.len(),
                "more categories than palette colors; colors will repeat"
            );
        }
        let mut domain = Vec::with_capacity(categories.len());
        let mut by_name = HashMap::with_capacity(categories.len());
        for name in categories {
            if by_name.contains_key(name) {
                continue;
            }
            let color = palette[domain.len() % palette.len()];
            by_name.insert(name.clone(), color);
            domain.push(name.clone());
        }
        Ok(Self { domain, by_name })
    }

    pub fn get(&self, category: &str) -> Option<Color> {
        self.by_name.get(category).copied()
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> + '_ {
        self.domain.iter().map(move |n| (n.as_str(), self.by_name[n]))
    }
}
