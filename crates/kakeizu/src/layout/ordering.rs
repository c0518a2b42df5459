//! Barycenter ordering for edge crossing minimization
//!
//! The ordering phase of the layered engine. Blocks are identified by their
//! index; layers list block indices left to right.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Predecessor and successor lists per block
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    preds: Vec<Vec<usize>>,
    succs: Vec<Vec<usize>>,
}

impl Adjacency {
    /// Build from `(source, target)` pairs over `len` blocks
    pub fn new(len: usize, edges: &[(usize, usize)]) -> Self {
        let mut preds = vec![Vec::new(); len];
        let mut succs = vec![Vec::new(); len];
        for &(from, to) in edges {
            succs[from].push(to);
            preds[to].push(from);
        }
        Self { preds, succs }
    }

    pub fn len(&self) -> usize {
        self.preds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preds.is_empty()
    }

    pub fn predecessors(&self, block: usize) -> &[usize] {
        &self.preds[block]
    }

    pub fn successors(&self, block: usize) -> &[usize] {
        &self.succs[block]
    }
}

/// Count edge crossings between all adjacent layers.
///
/// Edges (a1→b1) and (a2→b2) between layers L and L+1 cross when a1 is left of
/// a2 while b1 is right of b2, or vice versa.
pub fn cross_count(layers: &[Vec<usize>], adjacency: &Adjacency) -> usize {
    layers
        .windows(2)
        .map(|pair| two_layer_cross_count(&pair[0], &pair[1], adjacency))
        .sum()
}

fn two_layer_cross_count(north: &[usize], south: &[usize], adjacency: &Adjacency) -> usize {
    let south_pos: HashMap<usize, usize> = south.iter().enumerate().map(|(i, &n)| (n, i)).collect();

    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (np, &n) in north.iter().enumerate() {
        for succ in adjacency.successors(n) {
            if let Some(&sp) = south_pos.get(succ) {
                edges.push((np, sp));
            }
        }
    }

    let mut crossings = 0;
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let (n1, s1) = edges[i];
            let (n2, s2) = edges[j];
            if (n1 < n2 && s1 > s2) || (n1 > n2 && s1 < s2) {
                crossings += 1;
            }
        }
    }
    crossings
}

/// Direction for barycenter calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// Look at predecessors (blocks in the previous layer)
    Downward,
    /// Look at successors (blocks in the next layer)
    Upward,
}

/// Average position of each block's neighbours in the reference layer.
///
/// `None` for blocks with no neighbour there.
pub fn compute_barycenters(
    layer: &[usize],
    ref_layer: &[usize],
    adjacency: &Adjacency,
    direction: SweepDirection,
) -> Vec<Option<f64>> {
    let ref_pos: HashMap<usize, usize> =
        ref_layer.iter().enumerate().map(|(i, &n)| (n, i)).collect();

    layer
        .iter()
        .map(|&block| {
            let neighbors = match direction {
                SweepDirection::Downward => adjacency.predecessors(block),
                SweepDirection::Upward => adjacency.successors(block),
            };

            let positions: Vec<f64> = neighbors
                .iter()
                .filter_map(|n| ref_pos.get(n).map(|&p| p as f64))
                .collect();

            if positions.is_empty() {
                None
            } else {
                Some(positions.iter().sum::<f64>() / positions.len() as f64)
            }
        })
        .collect()
}

/// Stable reorder of a layer by barycenter.
///
/// Blocks without a barycenter go after the connected ones, keeping their
/// relative order.
pub fn order_layer_by_barycenter(layer: &mut Vec<usize>, barycenters: &[Option<f64>]) {
    let mut entries: Vec<(usize, Option<f64>, usize)> = layer
        .iter()
        .enumerate()
        .map(|(i, &block)| (block, barycenters.get(i).copied().flatten(), i))
        .collect();

    entries.sort_by(|a, b| match (&a.1, &b.1) {
        (Some(bc_a), Some(bc_b)) => bc_a
            .partial_cmp(bc_b)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.2.cmp(&b.2)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.2.cmp(&b.2),
    });

    *layer = entries.into_iter().map(|(block, _, _)| block).collect();
}

/// Alternate downward and upward sweeps, keeping the best ordering seen.
///
/// Returns the crossing count of that ordering.
pub fn order_layers_barycenter(
    layers: &mut Vec<Vec<usize>>,
    adjacency: &Adjacency,
    iterations: usize,
) -> usize {
    if layers.len() < 2 {
        return 0;
    }

    let mut best_layers = layers.clone();
    let mut best_cc = cross_count(layers, adjacency);

    for i in 0..iterations {
        if best_cc == 0 {
            break;
        }
        let downward = i % 2 == 0;

        let layer_indices: Vec<usize> = if downward {
            (1..layers.len()).collect()
        } else {
            (0..layers.len() - 1).rev().collect()
        };

        for layer_idx in layer_indices {
            let (ref_idx, direction) = if downward {
                (layer_idx - 1, SweepDirection::Downward)
            } else {
                (layer_idx + 1, SweepDirection::Upward)
            };

            let barycenters =
                compute_barycenters(&layers[layer_idx], &layers[ref_idx], adjacency, direction);
            order_layer_by_barycenter(&mut layers[layer_idx], &barycenters);
        }

        let cc = cross_count(layers, adjacency);
        if cc < best_cc {
            best_layers = layers.clone();
            best_cc = cc;
        }
    }

    *layers = best_layers;
    best_cc
}
