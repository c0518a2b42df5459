//! Layout engine boundary
//!
//! A layout engine receives a graph description made of leaf nodes, compound
//! groups and edges, and returns the same graph with `x`/`y` populated on
//! every node. Coordinates of a group's children are relative to the group.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::TreeError;

/// Layout option keys understood by the bundled engine
pub mod keys {
    pub const ALGORITHM: &str = "elk.algorithm";
    pub const DIRECTION: &str = "elk.direction";
    pub const LAYER_SPACING: &str = "elk.layered.spacing.nodeNodeBetweenLayers";
    pub const NODE_SPACING: &str = "elk.spacing.nodeNode";
    pub const PLACEMENT: &str = "elk.layered.nodePlacement.strategy";
}

/// A layout option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(f64),
    Text(String),
}

impl OptionValue {
    /// Numeric view, parsing text values when they hold a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            OptionValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            OptionValue::Number(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Number(n) => write!(f, "{}", n),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

/// Ordered option map; ordering keeps serialised graphs stable
pub type LayoutOptions = BTreeMap<String, OptionValue>;

/// A node handed to the layout engine
///
/// A node with children is a compound group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layout_options: LayoutOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    /// Create a leaf node with an intrinsic size
    pub fn leaf(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            ..Default::default()
        }
    }

    /// Create a compound group around the given children
    pub fn group(id: impl Into<String>, layout_options: LayoutOptions, children: Vec<LayoutNode>) -> Self {
        Self {
            id: id.into(),
            layout_options,
            children,
            ..Default::default()
        }
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

/// An edge handed to the layout engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

impl LayoutEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sources: vec![source.into()],
            targets: vec![target.into()],
        }
    }
}

/// Root of a layout request/response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGraph {
    pub id: String,
    #[serde(default)]
    pub layout_options: LayoutOptions,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
    #[serde(default)]
    pub edges: Vec<LayoutEdge>,
}

impl LayoutGraph {
    /// Find a node by id, searching groups recursively
    pub fn find(&self, id: &str) -> Option<&LayoutNode> {
        fn search<'a>(nodes: &'a [LayoutNode], id: &str) -> Option<&'a LayoutNode> {
            nodes.iter().find_map(|node| {
                if node.id == id {
                    Some(node)
                } else {
                    search(&node.children, id)
                }
            })
        }
        search(&self.children, id)
    }

    /// Number of leaf nodes, groups excluded
    pub fn leaf_count(&self) -> usize {
        fn count(nodes: &[LayoutNode]) -> usize {
            nodes
                .iter()
                .map(|n| if n.is_group() { count(&n.children) } else { 1 })
                .sum()
        }
        count(&self.children)
    }
}

/// A layered graph layout engine
///
/// Implementations must be deterministic: identical input topology yields an
/// identical arrangement.
pub trait LayoutEngine: Send + Sync {
    /// Position every node of the graph
    fn layout(&self, graph: LayoutGraph) -> Result<LayoutGraph, TreeError>;

    /// Get the name of this engine
    fn name(&self) -> &'static str;
}
