use crate::config::TooltipStyle;
use crate::human;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub name: String,
    pub category: String,
    pub value: f64,
}

impl TooltipContent {
    /// Title line followed by the detail lines.
    pub fn lines(&self) -> [String; 3] {
        [
            self.name.clone(),
            format!("System: {}", self.category),
            format!("Sales: {}", human::sales(self.value)),
        ]
    }
}

impl std::fmt::Display for TooltipContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines().join(" / "))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TooltipState {
    Hidden,
    Visible {
        tile: usize,
        content: TooltipContent,
        anchor: Point,
    },
}

/// The single hover tooltip. It is repositioned and refilled, never recreated.
#[derive(Debug, Clone)]
pub struct Tooltip {
    style: TooltipStyle,
    state: TooltipState,
}

impl Tooltip {
    pub fn new(style: TooltipStyle) -> Self {
        Self { style, state: TooltipState::Hidden }
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, TooltipState::Visible { .. })
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        match &self.state {
            TooltipState::Visible { content, .. } => Some(content),
            TooltipState::Hidden => None,
        }
    }

    pub fn anchor(&self) -> Option<Point> {
        match &self.state {
            TooltipState::Visible { anchor, .. } => Some(*anchor),
            TooltipState::Hidden => None,
        }
    }

    fn offset(&self, pointer: Point) -> Point {
        Point::new(pointer.x + self.style.dx, pointer.y + self.style.dy)
    }

    pub fn enter(&mut self, tile: usize, content: TooltipContent, pointer: Point) {
        let anchor = self.offset(pointer);
        self.state = TooltipState::Visible { tile, content, anchor };
    }

    pub fn move_to(&mut self, pointer: Point) {
        let next = self.offset(pointer);
        if let TooltipState::Visible { anchor, .. } = &mut self.state {
            *anchor = next;
        }
    }

    pub fn leave(&mut self) {
        self.state = TooltipState::Hidden;
    }

    /// Feed the tile currently under the pointer (if any). Crossing from one
    /// tile straight into another is a leave followed by an enter.
    pub fn pointer_at(&mut self, hit: Option<(usize, TooltipContent)>, pointer: Point) {
        let current = match &self.state {
            TooltipState::Visible { tile, .. } => Some(*tile),
            TooltipState::Hidden => None,
        };
        match (current, hit) {
            (Some(cur), Some((tile, _))) if cur == tile => self.move_to(pointer),
            (Some(_), Some((tile, content))) => {
                self.leave();
                self.enter(tile, content, pointer);
            }
            (None, Some((tile, content))) => self.enter(tile, content, pointer),
            (Some(_), None) => self.leave(),
            (None, None) => {}
        }
    }
}
