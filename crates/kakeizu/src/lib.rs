//! Kakeizu - layered layouts for Japanese family trees
//!
//! Turns a flat list of people with father, mother and spouse references
//! into a positioned node/edge graph: parent pairs meet at union nodes,
//! couples are kept side by side, and ancestors sit above descendants.
//!
//! # Quick Start
//!
//! ```rust
//! use kakeizu::layout_json;
//!
//! let json = r#"{"people": [
//!     {"id": "f", "lastName": "山田", "firstName": "太郎", "isMan": true, "spouseId": "m"},
//!     {"id": "m", "lastName": "山田", "firstName": "花子", "isMan": false, "spouseId": "f"},
//!     {"id": "c", "lastName": "山田", "firstName": "一郎", "fatherId": "f", "motherId": "m"}
//! ]}"#;
//! let graph = layout_json(json).unwrap();
//! assert_eq!(graph.nodes.len(), 4);
//! ```
//!
//! # Advanced Usage
//!
//! The stages can be driven one at a time:
//!
//! ```rust
//! use kakeizu::prelude::*;
//! use std::sync::Arc;
//!
//! let tree = Tree::new(vec![
//!     Person::new("f").man(),
//!     Person::new("m").woman(),
//!     Person::new("c").with_parents("f", "m"),
//! ]).unwrap();
//!
//! // Nodes and edges, no positions yet
//! let graph = FlowBuilder::new().build(&tree);
//! assert_eq!(graph.union_nodes().count(), 1);
//!
//! // Positions from the bundled engine
//! let layout = GroupingLayout::new(Arc::new(LayeredEngine::new()), LayoutConfig::default());
//! let graph = layout.layout(graph).unwrap();
//! let parent = graph.person_node("f").unwrap();
//! let child = graph.person_node("c").unwrap();
//! assert!(parent.position.y < child.position.y);
//!
//! // Generation rows without an engine
//! let rows = generation_rows(&tree);
//! assert_eq!(rows.len(), 2);
//! ```

pub mod core;
pub mod flow;
pub mod layout;
pub mod rank;
pub mod store;
pub mod tree;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Direction, LayoutConfig, LayoutEngine, LayoutGraph, PlacementStrategy, Position, Side,
        TreeError,
    };
    pub use crate::flow::{EdgeKind, FlowBuilder, FlowEdge, FlowGraph, FlowNode, NodeId, NodeKind};
    pub use crate::layout::{GroupingLayout, LayeredEngine, LayoutScheduler};
    pub use crate::rank::{generation_rows, rank, ranks};
    pub use crate::store::TreeStore;
    pub use crate::tree::{display_kana_name, display_name, label, Person, Sex, Tree};
}

/// Build and lay out a tree with the default configuration
///
/// # Example
/// ```rust
/// use kakeizu::layout_tree;
/// use kakeizu::tree::{Person, Tree};
///
/// let tree = Tree::new(vec![Person::new("a"), Person::new("b").with_father("a")]).unwrap();
/// let graph = layout_tree(&tree).unwrap();
/// assert_eq!(graph.nodes.len(), 2);
/// ```
pub fn layout_tree(tree: &tree::Tree) -> anyhow::Result<flow::FlowGraph> {
    layout_tree_with_config(tree, &LayoutConfig::default())
}

/// Build and lay out a tree with an explicit configuration
pub fn layout_tree_with_config(tree: &tree::Tree, config: &LayoutConfig) -> anyhow::Result<flow::FlowGraph> {
    Ok(layout::layout_with_config(tree, config)?)
}

/// Parse a tree from JSON and lay it out
pub fn layout_json(json: &str) -> anyhow::Result<flow::FlowGraph> {
    let tree = tree::Tree::from_json(json)?;
    layout_tree(&tree)
}

/// Parse a tree from JSON and arrange it into generation rows of person ids
///
/// # Example
/// ```rust
/// use kakeizu::rows_json;
///
/// let rows = rows_json(r#"{"people": [{"id": "a"}, {"id": "b", "fatherId": "a"}]}"#).unwrap();
/// assert_eq!(rows, vec![vec!["a".to_string()], vec!["b".to_string()]]);
/// ```
pub fn rows_json(json: &str) -> anyhow::Result<Vec<Vec<String>>> {
    let tree = tree::Tree::from_json(json)?;
    Ok(rank::generation_rows(&tree)
        .into_iter()
        .map(|row| row.into_iter().map(|p| p.id.clone()).collect())
        .collect())
}
