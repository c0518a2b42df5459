//! Layout: positions for a flow graph
//!
//! [`GroupingLayout`] prepares the engine request and flattens the answer;
//! [`LayeredEngine`] is the bundled engine; [`LayoutScheduler`] runs passes
//! off the caller's thread and keeps only the newest result.

mod adapter;
mod layered;
mod ordering;
mod scheduler;

pub use adapter::{plan_groups, Group, GroupKind, GroupingLayout};
pub use layered::LayeredEngine;
pub use ordering::{cross_count, Adjacency};
pub use scheduler::{LayoutOutcome, LayoutScheduler, LayoutToken};

use std::sync::Arc;

use crate::core::{LayoutConfig, TreeError};
use crate::flow::{FlowBuilder, FlowGraph};
use crate::tree::Tree;

/// Build and lay out a tree with the bundled engine
pub fn layout_with_config(tree: &Tree, config: &LayoutConfig) -> Result<FlowGraph, TreeError> {
    let graph = FlowBuilder::with_config(config.clone()).build(tree);
    GroupingLayout::new(Arc::new(LayeredEngine::new()), config.clone()).layout(graph)
}
