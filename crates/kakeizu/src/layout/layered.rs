//! Bundled layered layout engine
//!
//! Arranges a [`LayoutGraph`] in layers (Sugiyama style):
//!
//! 1. Compound groups are laid out internally and become single blocks
//! 2. Blocks are assigned to layers by longest path, tolerating cycles
//! 3. Blocks within a layer are ordered by barycenter sweeps
//! 4. Layers are stacked along the main axis and placed across it

use std::collections::HashMap;
use tracing::{debug, span, trace, Level};

use super::ordering::{order_layers_barycenter, Adjacency};
use crate::core::engine::keys;
use crate::core::{
    Direction, LayoutEngine, LayoutGraph, LayoutNode, LayoutOptions, PlacementStrategy, TreeError,
};

const ENGINE_NAME: &str = "layered";

/// Options the engine reads from a graph or group
#[derive(Debug, Clone, Copy, PartialEq)]
struct EngineOptions {
    direction: Direction,
    layer_spacing: f64,
    node_spacing: f64,
    placement: PlacementStrategy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TopBottom,
            layer_spacing: 100.0,
            node_spacing: 80.0,
            placement: PlacementStrategy::Simple,
        }
    }
}

impl EngineOptions {
    /// Read options, inheriting anything unset from `parent`
    fn read(options: &LayoutOptions, parent: &EngineOptions) -> Result<Self, TreeError> {
        if let Some(algorithm) = options.get(keys::ALGORITHM) {
            let name = algorithm.to_string();
            if name != "layered" && name != "org.eclipse.elk.layered" {
                return Err(TreeError::engine(
                    ENGINE_NAME,
                    format!("unsupported algorithm {}", name),
                ));
            }
        }

        let direction = match options.get(keys::DIRECTION) {
            Some(value) => value
                .as_str()
                .and_then(Direction::from_engine_name)
                .ok_or_else(|| TreeError::invalid_layout_option(keys::DIRECTION, value.to_string()))?,
            None => parent.direction,
        };

        let spacing = |key: &str, inherited: f64| -> Result<f64, TreeError> {
            match options.get(key) {
                Some(value) => value
                    .as_f64()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| TreeError::invalid_layout_option(key, value.to_string())),
                None => Ok(inherited),
            }
        };

        let placement = match options.get(keys::PLACEMENT) {
            Some(value) => value
                .to_string()
                .parse::<PlacementStrategy>()
                .map_err(|_| TreeError::invalid_layout_option(keys::PLACEMENT, value.to_string()))?,
            None => parent.placement,
        };

        Ok(Self {
            direction,
            layer_spacing: spacing(keys::LAYER_SPACING, parent.layer_spacing)?,
            node_spacing: spacing(keys::NODE_SPACING, parent.node_spacing)?,
            placement,
        })
    }
}

/// Extent of a block along the generation axis and across it
fn main_size(node: &LayoutNode, direction: Direction) -> f64 {
    if direction.is_vertical() {
        node.height
    } else {
        node.width
    }
}

fn cross_size(node: &LayoutNode, direction: Direction) -> f64 {
    if direction.is_vertical() {
        node.width
    } else {
        node.height
    }
}

/// Deterministic layered layout engine
#[derive(Debug, Clone)]
pub struct LayeredEngine {
    /// Barycenter sweep count
    iterations: usize,
}

impl LayeredEngine {
    pub fn new() -> Self {
        Self { iterations: 8 }
    }

    pub fn with_iterations(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Size a compound group and position its children relative to it
    fn layout_group(&self, group: &mut LayoutNode, inherited: &EngineOptions) -> Result<(), TreeError> {
        let options = EngineOptions::read(&group.layout_options, inherited)?;
        for child in group.children.iter_mut().filter(|c| c.is_group()) {
            self.layout_group(child, &options)?;
        }

        let direction = options.direction;
        let count = group.children.len();
        let along: f64 = group.children.iter().map(|c| main_size(c, direction)).sum::<f64>()
            + options.node_spacing * count.saturating_sub(1) as f64;
        let across = group
            .children
            .iter()
            .map(|c| cross_size(c, direction))
            .fold(0.0, f64::max);

        let mut cursor = 0.0;
        let order: Vec<usize> = match direction {
            Direction::RightLeft | Direction::BottomTop => (0..count).rev().collect(),
            _ => (0..count).collect(),
        };
        for i in order {
            let child = &mut group.children[i];
            let offset = (across - cross_size(child, direction)) / 2.0;
            if direction.is_vertical() {
                child.x = offset;
                child.y = cursor;
            } else {
                child.x = cursor;
                child.y = offset;
            }
            cursor += main_size(child, direction) + options.node_spacing;
        }

        if direction.is_vertical() {
            group.width = across;
            group.height = along;
        } else {
            group.width = along;
            group.height = across;
        }
        trace!(group = %group.id, width = group.width, height = group.height, "Sized group");
        Ok(())
    }

    /// Longest-path layering over the block graph
    ///
    /// Blocks caught in a cycle are appended in index order and layered from
    /// whichever predecessors already have a layer.
    fn assign_layers(&self, adjacency: &Adjacency) -> Vec<usize> {
        let len = adjacency.len();
        let mut in_degree: Vec<usize> = (0..len).map(|b| adjacency.predecessors(b).len()).collect();
        let mut queue: Vec<usize> = (0..len).filter(|&b| in_degree[b] == 0).rev().collect();
        let mut sorted = Vec::with_capacity(len);
        let mut seen = vec![false; len];

        while let Some(block) = queue.pop() {
            sorted.push(block);
            seen[block] = true;
            let mut ready = Vec::new();
            for &succ in adjacency.successors(block) {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    ready.push(succ);
                }
            }
            ready.sort_unstable_by(|a, b| b.cmp(a));
            queue.extend(ready);
        }

        if sorted.len() < len {
            debug!(
                sorted_count = sorted.len(),
                total_blocks = len,
                "Cycle detected in layout graph"
            );
            sorted.extend((0..len).filter(|&b| !seen[b]));
        }

        let mut layers: Vec<Option<usize>> = vec![None; len];
        for &block in &sorted {
            let layer = adjacency
                .predecessors(block)
                .iter()
                .filter_map(|&p| layers[p])
                .max()
                .map(|l| l + 1)
                .unwrap_or(0);
            layers[block] = Some(layer);
        }
        layers.into_iter().map(|l| l.unwrap_or(0)).collect()
    }

    /// Cross-axis offsets for every block, layer by layer
    fn place_across(
        &self,
        layers: &[Vec<usize>],
        blocks: &[LayoutNode],
        adjacency: &Adjacency,
        options: &EngineOptions,
    ) -> Vec<f64> {
        let direction = options.direction;
        let spacing = options.node_spacing;
        let mut across = vec![0.0; blocks.len()];

        let extent = |layer: &[usize]| -> f64 {
            layer.iter().map(|&b| cross_size(&blocks[b], direction)).sum::<f64>()
                + spacing * layer.len().saturating_sub(1) as f64
        };

        match options.placement {
            PlacementStrategy::Simple => {
                let widest = layers.iter().map(|l| extent(l)).fold(0.0, f64::max);
                for layer in layers {
                    let mut cursor = (widest - extent(layer)) / 2.0;
                    for &block in layer {
                        across[block] = cursor;
                        cursor += cross_size(&blocks[block], direction) + spacing;
                    }
                }
            }
            PlacementStrategy::LinearSegments => {
                // Pull each block under the mean center of its predecessors,
                // never closer than `spacing` to its left neighbour.
                for layer in layers {
                    let mut min_start = 0.0;
                    for &block in layer {
                        let size = cross_size(&blocks[block], direction);
                        let centers: Vec<f64> = adjacency
                            .predecessors(block)
                            .iter()
                            .map(|&p| across[p] + cross_size(&blocks[p], direction) / 2.0)
                            .collect();
                        let wanted = if centers.is_empty() {
                            min_start
                        } else {
                            centers.iter().sum::<f64>() / centers.len() as f64 - size / 2.0
                        };
                        let start = wanted.max(min_start);
                        across[block] = start;
                        min_start = start + size + spacing;
                    }
                }
                let shift = across.iter().copied().fold(f64::INFINITY, f64::min);
                if shift.is_finite() && shift != 0.0 {
                    across.iter_mut().for_each(|a| *a -= shift);
                }
            }
        }
        across
    }
}

impl Default for LayeredEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine for LayeredEngine {
    fn layout(&self, mut graph: LayoutGraph) -> Result<LayoutGraph, TreeError> {
        let layout_span = span!(
            Level::DEBUG,
            "layered_layout",
            blocks = graph.children.len(),
            edges = graph.edges.len()
        );
        let _enter = layout_span.enter();

        let options = EngineOptions::read(&graph.layout_options, &EngineOptions::default())?;
        let direction = options.direction;

        for child in graph.children.iter_mut().filter(|c| c.is_group()) {
            self.layout_group(child, &options)?;
        }

        // Every node id, groups and nested members included, maps to its block
        let mut owner: HashMap<&str, usize> = HashMap::new();
        fn claim<'a>(node: &'a LayoutNode, block: usize, owner: &mut HashMap<&'a str, usize>) {
            owner.insert(node.id.as_str(), block);
            for child in &node.children {
                claim(child, block, owner);
            }
        }
        for (block, child) in graph.children.iter().enumerate() {
            claim(child, block, &mut owner);
        }

        let mut block_edges: Vec<(usize, usize)> = Vec::new();
        for edge in &graph.edges {
            for source in &edge.sources {
                let from = *owner
                    .get(source.as_str())
                    .ok_or_else(|| TreeError::unknown_layout_node(&edge.id, source))?;
                for target in &edge.targets {
                    let to = *owner
                        .get(target.as_str())
                        .ok_or_else(|| TreeError::unknown_layout_node(&edge.id, target))?;
                    if from != to && !block_edges.contains(&(from, to)) {
                        block_edges.push((from, to));
                    }
                }
            }
        }
        drop(owner);

        let adjacency = Adjacency::new(graph.children.len(), &block_edges);
        let block_layers = self.assign_layers(&adjacency);
        let layer_count = block_layers.iter().max().map(|l| l + 1).unwrap_or(0);
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
        for (block, &layer) in block_layers.iter().enumerate() {
            layers[layer].push(block);
        }
        let crossings = order_layers_barycenter(&mut layers, &adjacency, self.iterations);
        debug!(layers = layer_count, crossings, "Ordered layers");

        let thickness: Vec<f64> = layers
            .iter()
            .map(|layer| {
                layer
                    .iter()
                    .map(|&b| main_size(&graph.children[b], direction))
                    .fold(0.0, f64::max)
            })
            .collect();
        let mut layer_start = Vec::with_capacity(layer_count);
        let mut cursor = 0.0;
        for t in &thickness {
            layer_start.push(cursor);
            cursor += t + options.layer_spacing;
        }
        let total_main = (cursor - options.layer_spacing).max(0.0);

        let across = self.place_across(&layers, &graph.children, &adjacency, &options);

        for (block, node) in graph.children.iter_mut().enumerate() {
            let layer = block_layers[block];
            let size = main_size(node, direction);
            let main = layer_start[layer] + (thickness[layer] - size) / 2.0;
            let (x, y) = match direction {
                Direction::TopBottom => (across[block], main),
                Direction::BottomTop => (across[block], total_main - main - size),
                Direction::LeftRight => (main, across[block]),
                Direction::RightLeft => (total_main - main - size, across[block]),
            };
            node.x = x;
            node.y = y;
            trace!(node = %node.id, layer, x, y, "Placed block");
        }

        Ok(graph)
    }

    fn name(&self) -> &'static str {
        ENGINE_NAME
    }
}
