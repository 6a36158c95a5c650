use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node as it appears in the fetched JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub children: Option<Vec<RawNode>>,
}

/// Coerce a wire value into a number the way unary plus would.
///
/// Numeric strings are accepted (surrounding whitespace ignored), blank
/// strings and `null` become 0, and anything else non-numeric becomes NaN.
/// Strings follow the JavaScript numeric-string grammar.
pub fn coerce_value(raw: &serde_json::Value) -> f64 {
    use serde_json::Value;
    match raw {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_numeric_string(s),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Numeric-string grammar of JavaScript: decimal with optional exponent,
/// `0x`/`0o`/`0b` integers, and `Infinity`. Rust-only spellings such as
/// `inf` or `nan` are not numbers here.
fn parse_numeric_string(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            if digits.is_empty() {
                return f64::NAN;
            }
            return digits
                .chars()
                .try_fold(0.0_f64, |acc, c| c.to_digit(radix).map(|d| acc * radix as f64 + d as f64))
                .unwrap_or(f64::NAN);
        }
    }
    if s.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Root,
    Category,
    Item,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub name: String,
    pub category: Option<String>,
    pub kind: NodeKind,
    /// Leaf: the coerced value. Internal node: sum over descendant leaves.
    pub value: f64,
    pub children: Vec<NodeId>,
    pub depth: u16,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Item
    }
}

/// A leaf dropped during normalization because its value is not usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedLeaf {
    pub name: String,
    pub category: Option<String>,
    pub raw: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Hierarchy {
    pub root: NodeId,
    pub nodes: Vec<HierarchyNode>,
    pub rejected: Vec<RejectedLeaf>,
}

impl Hierarchy {
    /// Build the arena from the wire tree, coercing leaf values and summing
    /// them upwards.
    pub fn from_raw(raw: &RawNode) -> Self {
        let mut tree = Hierarchy::default();
        let root = tree.push(raw, None, 0);
        tree.root = root;
        tree.sum_values(root);
        tracing::debug!(
            nodes = tree.nodes.len(),
            rejected = tree.rejected.len(),
            "normalized hierarchy"
        );
        tree
    }

    fn push(&mut self, raw: &RawNode, parent: Option<NodeId>, depth: u16) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let kind = match (parent, &raw.children) {
            (None, _) => NodeKind::Root,
            (Some(_), Some(_)) => NodeKind::Category,
            (Some(_), None) => NodeKind::Item,
        };
        let value = match kind {
            NodeKind::Item => raw.value.as_ref().map(coerce_value).unwrap_or(0.0),
            _ => 0.0,
        };
        let category = match kind {
            NodeKind::Item => raw
                .category
                .clone()
                .or_else(|| parent.map(|p| self.nodes[p.index()].name.clone())),
            _ => raw.category.clone(),
        };
        self.nodes.push(HierarchyNode {
            id,
            parent,
            name: raw.name.clone(),
            category,
            kind,
            value,
            children: Vec::new(),
            depth,
        });
        for child in raw.children.iter().flatten() {
            if child.children.is_none() {
                let coerced = child.value.as_ref().map(coerce_value).unwrap_or(0.0);
                if !coerced.is_finite() || coerced < 0.0 {
                    tracing::warn!(
                        name = %child.name,
                        parent = %raw.name,
                        raw = ?child.value,
                        "rejecting leaf with non-numeric or negative value"
                    );
                    self.rejected.push(RejectedLeaf {
                        name: child.name.clone(),
                        category: child.category.clone().or_else(|| Some(raw.name.clone())),
                        raw: child.value.clone(),
                    });
                    continue;
                }
            }
            let cid = self.push(child, Some(id), depth.saturating_add(1));
            self.nodes[id.index()].children.push(cid);
        }
        id
    }

    fn sum_values(&mut self, id: NodeId) -> f64 {
        if self.nodes[id.index()].is_leaf() {
            return self.nodes[id.index()].value;
        }
        let children = self.nodes[id.index()].children.clone();
        let total = children.into_iter().map(|c| self.sum_values(c)).sum();
        self.nodes[id.index()].value = total;
        total
    }

    pub fn get(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.index()]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &HierarchyNode> + '_ {
        self.nodes[id.index()]
            .children
            .iter()
            .map(move |c| &self.nodes[c.index()])
    }

    /// Unique names of the root's children, first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for node in self.children(self.root) {
            if !out.contains(&node.name) {
                out.push(node.name.clone());
            }
        }
        out
    }

    /// Leaf ids in pre-order of the current child order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if node.is_leaf() {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn total(&self) -> f64 {
        self.get(self.root).value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> RawNode {
        serde_json::from_value(json!({
            "name": "Video Game Sales Data Top 100",
            "children": [
                { "name": "Wii", "children": [
                    { "name": "Wii Sports", "category": "Wii", "value": "82.53" },
                    { "name": "Mario Kart Wii", "category": "Wii", "value": 35.52 }
                ]},
                { "name": "GB", "children": [
                    { "name": "Tetris", "value": "30.26" }
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn coerces_like_unary_plus() {
        assert_eq!(coerce_value(&json!("40.24")), 40.24);
        assert_eq!(coerce_value(&json!(" 7 ")), 7.0);
        assert_eq!(coerce_value(&json!("")), 0.0);
        assert_eq!(coerce_value(&json!(null)), 0.0);
        assert_eq!(coerce_value(&json!(true)), 1.0);
        assert!(coerce_value(&json!("abc")).is_nan());
        assert!(coerce_value(&json!([1])).is_nan());
    }

    #[test]
    fn strings_follow_js_number_grammar() {
        assert_eq!(coerce_value(&json!("0x1A")), 26.0);
        assert_eq!(coerce_value(&json!("0b101")), 5.0);
        assert_eq!(coerce_value(&json!("0o17")), 15.0);
        assert_eq!(coerce_value(&json!("1e3")), 1000.0);
        assert_eq!(coerce_value(&json!(".5")), 0.5);
        assert_eq!(coerce_value(&json!("-Infinity")), f64::NEG_INFINITY);
        for s in ["inf", "infinity", "NaN", "0x", "0x1G", "-0x1A", "1_000"] {
            assert!(coerce_value(&json!(s)).is_nan(), "{s}");
        }
    }

    #[test]
    fn sums_values_upwards() {
        let h = Hierarchy::from_raw(&tree());
        assert!((h.total() - (82.53 + 35.52 + 30.26)).abs() < 1e-9);
        let wii = h.children(h.root).next().unwrap();
        assert!((wii.value - 118.05).abs() < 1e-9);
    }

    #[test]
    fn leaf_inherits_parent_category() {
        let h = Hierarchy::from_raw(&tree());
        let tetris = h.nodes.iter().find(|n| n.name == "Tetris").unwrap();
        assert_eq!(tetris.category.as_deref(), Some("GB"));
        assert_eq!(tetris.depth, 2);
    }

    #[test]
    fn categories_in_first_seen_order() {
        let h = Hierarchy::from_raw(&tree());
        assert_eq!(h.categories(), vec!["Wii", "GB"]);
    }

    #[test]
    fn rejects_non_numeric_leaf() {
        let raw: RawNode = serde_json::from_value(json!({
            "name": "root",
            "children": [{ "name": "NES", "children": [
                { "name": "Bad", "category": "NES", "value": "abc" },
                { "name": "Neg", "category": "NES", "value": -3 },
                { "name": "Good", "category": "NES", "value": "1.5" }
            ]}]
        }))
        .unwrap();
        let h = Hierarchy::from_raw(&raw);
        let names: Vec<_> = h.leaves().into_iter().map(|id| h.get(id).name.clone()).collect();
        assert_eq!(names, vec!["Good"]);
        assert_eq!(h.rejected.len(), 2);
        assert_eq!(h.rejected[0].name, "Bad");
        assert_eq!(h.total(), 1.5);
    }
}
