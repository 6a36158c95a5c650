use crate::model::{Hierarchy, NodeId};
use serde::{Deserialize, Serialize};

/// Golden ratio, the default target aspect ratio of squarified rows.
pub const PHI: f64 = 1.618_033_988_749_895;

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

    /// Shrink by `d` on every side; an axis that collapses clamps to its midpoint.
    pub fn inset(&self, d: f64) -> Rect {
        let (mut x0, mut y0, mut x1, mut y1) = (self.x0 + d, self.y0 + d, self.x1 - d, self.y1 - d);
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }
        Rect { x0, y0, x1, y1 }
    }
}

/// One positioned leaf.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub node: NodeId,
    /// Cell the parent allotted before padding; its area is proportional to
    /// the leaf's value among its siblings.
    pub cell: Rect,
    /// Drawn bounds, `cell` inset by half the padding.
    pub rect: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    /// Target aspect ratio of squarified rows.
    pub ratio: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { width: 1000.0, height: 600.0, padding: 1.0, ratio: PHI }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Layout {
    /// Unpadded cells, indexed by `NodeId`.
    pub cells: Vec<Rect>,
    /// Padded bounds, indexed by `NodeId`.
    pub rects: Vec<Rect>,
    /// Leaves in pre-order of the sorted hierarchy.
    pub leaves: Vec<LayoutRect>,
}

impl Layout {
    pub fn rect(&self, id: NodeId) -> Rect {
        self.rects[id.index()]
    }

    pub fn cell(&self, id: NodeId) -> Rect {
        self.cells[id.index()]
    }
}

/// Sort every child list by descending value. Ties keep input order.
pub fn sort_by_value(tree: &mut Hierarchy) {
    for i in 0..tree.nodes.len() {
        let mut children = std::mem::take(&mut tree.nodes[i].children);
        children.sort_by(|a, b| {
            let (va, vb) = (tree.nodes[a.index()].value, tree.nodes[b.index()].value);
            vb.partial_cmp(&va).unwrap_or(std::cmp::Ordering::Equal)
        });
        tree.nodes[i].children = children;
    }
}

/// Partition the canvas among the hierarchy's nodes. Children must already be
/// in the desired order (see [`sort_by_value`]).
pub fn compute_layout(tree: &Hierarchy, opts: &LayoutOptions) -> Layout {
    if tree.nodes.is_empty() {
        return Layout::default();
    }
    let mut cells = vec![Rect::default(); tree.nodes.len()];
    let mut rects = vec![Rect::default(); tree.nodes.len()];
    cells[tree.root.index()] = Rect::new(0.0, 0.0, opts.width, opts.height);

    // Each non-root node gives up half the padding on every side, and each
    // parent insets its content by the other half: `padding` between siblings
    // and between a parent's edge and its children.
    let half = opts.padding / 2.0;
    let mut stack = vec![tree.root];
    while let Some(id) = stack.pop() {
        let node = tree.get(id);
        let own = if id == tree.root { cells[id.index()] } else { cells[id.index()].inset(half) };
        rects[id.index()] = own;
        if node.children.is_empty() {
            continue;
        }
        let content = own.inset(opts.padding - half);
        squarify(tree, &node.children, node.value, content, opts.ratio, &mut cells);
        stack.extend(node.children.iter().rev().copied());
    }

    let leaves: Vec<LayoutRect> = tree
        .leaves()
        .into_iter()
        .map(|node| LayoutRect {
            node,
            cell: cells[node.index()],
            rect: rects[node.index()],
        })
        .collect();
    tracing::debug!(leaves = leaves.len(), "computed treemap layout");
    Layout { cells, rects, leaves }
}

/// Squarified subdivision (Bruls et al.): grow each row while its worst
/// aspect ratio does not get worse, then lay it along the shorter side.
fn squarify(tree: &Hierarchy, ids: &[NodeId], total: f64, area: Rect, ratio: f64, out: &mut [Rect]) {
    let value = |i: usize| tree.get(ids[i]).value;
    let n = ids.len();
    let (mut x0, mut y0, x1, y1) = (area.x0, area.y0, area.x1, area.y1);
    let mut remaining = total;
    let mut i0 = 0usize;
    let mut i1 = 0usize;

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Skip leading zero-valued nodes into the row.
        let mut sum = 0.0;
        while i1 < n {
            sum = value(i1);
            i1 += 1;
            if sum != 0.0 {
                break;
            }
        }
        let mut min = sum;
        let mut max = sum;
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let mut beta = sum * sum * alpha;
        let mut worst = (max / beta).max(beta / min);

        while i1 < n {
            let v = value(i1);
            let next_sum = sum + v;
            let next_min = min.min(v);
            let next_max = max.max(v);
            beta = next_sum * next_sum * alpha;
            let next = (next_max / beta).max(beta / next_min);
            if next > worst {
                break;
            }
            sum = next_sum;
            min = next_min;
            max = next_max;
            worst = next;
            i1 += 1;
        }

        let row = &ids[i0..i1];
        if dx < dy {
            let y = if remaining > 0.0 { y0 + dy * sum / remaining } else { y1 };
            dice(tree, row, Rect::new(x0, y0, x1, y), out);
            y0 = y;
        } else {
            let x = if remaining > 0.0 { x0 + dx * sum / remaining } else { x1 };
            slice(tree, row, Rect::new(x0, y0, x, y1), out);
            x0 = x;
        }
        remaining -= sum;
        i0 = i1;
    }
}

/// Lay a row left to right across `area`.
fn dice(tree: &Hierarchy, row: &[NodeId], area: Rect, out: &mut [Rect]) {
    let sum: f64 = row.iter().map(|id| tree.get(*id).value).sum();
    let k = if sum > 0.0 { area.width() / sum } else { 0.0 };
    let mut x = area.x0;
    for id in row {
        let x_next = x + tree.get(*id).value * k;
        out[id.index()] = Rect::new(x, area.y0, x_next, area.y1);
        x = x_next;
    }
}

/// Lay a row top to bottom across `area`.
fn slice(tree: &Hierarchy, row: &[NodeId], area: Rect, out: &mut [Rect]) {
    let sum: f64 = row.iter().map(|id| tree.get(*id).value).sum();
    let k = if sum > 0.0 { area.height() / sum } else { 0.0 };
    let mut y = area.y0;
    for id in row {
        let y_next = y + tree.get(*id).value * k;
        out[id.index()] = Rect::new(area.x0, y, area.x1, y_next);
        y = y_next;
    }
}
