//! Grouping layout adapter
//!
//! Wraps parent pairs and spouse pairs into compound groups so the engine
//! keeps them adjacent, hands the graph to a [`LayoutEngine`], and flattens
//! the result back into absolute node positions.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info_span, trace};

use crate::core::{LayoutConfig, LayoutEdge, LayoutEngine, LayoutGraph, LayoutNode, Position, TreeError};
use crate::flow::{EdgeId, EdgeKind, FlowGraph, NodeId};

/// A compound group planned from the flow graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub kind: GroupKind,
    pub members: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Mother and father of a union
    Parents,
    /// Wife and husband of a marriage edge
    Spouses,
}

/// Partition nodes into parent groups and spouse groups
///
/// A node belongs to at most one group. Parent groups are claimed first in
/// edge order, then spouse groups. A spouse pair already grouped as parents
/// is skipped, as is any pair with a member already claimed elsewhere.
pub fn plan_groups(graph: &FlowGraph) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut claimed: HashMap<&NodeId, usize> = HashMap::new();

    let mut parent_pairs: Vec<(&NodeId, &NodeId, String)> = Vec::new();
    for edge in &graph.edges {
        if let EdgeId::ParentToUnion { union, .. } = &edge.id {
            let id = format!("parents:{}", union);
            if parent_pairs.iter().any(|(_, _, existing)| *existing == id) {
                continue;
            }
            let mother = graph.edges.iter().find_map(|e| match &e.id {
                EdgeId::ParentToUnion { parent, union: u } if u == union && *parent == u.mother => {
                    Some(&e.source)
                }
                _ => None,
            });
            let father = graph.edges.iter().find_map(|e| match &e.id {
                EdgeId::ParentToUnion { parent, union: u } if u == union && *parent == u.father => {
                    Some(&e.source)
                }
                _ => None,
            });
            if let (Some(mother), Some(father)) = (mother, father) {
                parent_pairs.push((mother, father, id));
            }
        }
    }

    let marriages = graph
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Marriage)
        .map(|e| (&e.source, &e.target, format!("spouses:{}+{}", e.source, e.target)));

    let candidates = parent_pairs
        .into_iter()
        .map(|(a, b, id)| (a, b, id, GroupKind::Parents))
        .chain(marriages.map(|(a, b, id)| (a, b, id, GroupKind::Spouses)));

    for (first, second, id, kind) in candidates {
        match (claimed.get(first), claimed.get(second)) {
            (None, None) => {
                let index = groups.len();
                claimed.insert(first, index);
                claimed.insert(second, index);
                groups.push(Group {
                    id,
                    kind,
                    members: vec![first.clone(), second.clone()],
                });
            }
            (Some(a), Some(b)) if a == b => {
                trace!(group = %id, "Pair already grouped");
            }
            _ => {
                debug!(group = %id, "Member already claimed by another group; pair left ungrouped");
            }
        }
    }

    groups
}

/// Lays out a flow graph through a [`LayoutEngine`]
#[derive(Clone)]
pub struct GroupingLayout {
    engine: Arc<dyn LayoutEngine>,
    config: LayoutConfig,
}

impl GroupingLayout {
    pub fn new(engine: Arc<dyn LayoutEngine>, config: LayoutConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Build the engine request: groups, ungrouped nodes, every edge
    ///
    /// Top-level children keep tree order; a group appears where its first
    /// member would have.
    pub fn request(&self, graph: &FlowGraph) -> LayoutGraph {
        let groups = plan_groups(graph);
        let mut group_of: HashMap<&NodeId, usize> = HashMap::new();
        for (index, group) in groups.iter().enumerate() {
            for member in &group.members {
                group_of.insert(member, index);
            }
        }

        let leaf = |id: &NodeId| -> Option<LayoutNode> {
            graph
                .node(id)
                .map(|node| LayoutNode::leaf(node.id.to_string(), node.width, node.height))
        };

        let mut emitted = vec![false; groups.len()];
        let mut children = Vec::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            match group_of.get(&node.id) {
                Some(&index) if !emitted[index] => {
                    emitted[index] = true;
                    let group = &groups[index];
                    let members = group.members.iter().filter_map(|m| leaf(m)).collect();
                    children.push(LayoutNode::group(
                        format!("group:{}", group.id),
                        self.config.group_options(),
                        members,
                    ));
                }
                Some(_) => {}
                None => children.push(LayoutNode::leaf(node.id.to_string(), node.width, node.height)),
            }
        }

        let edges = graph
            .edges
            .iter()
            .map(|e| LayoutEdge::new(e.id.to_string(), e.source.to_string(), e.target.to_string()))
            .collect();

        LayoutGraph {
            id: "root".to_string(),
            layout_options: self.config.layout_options(),
            children,
            edges,
        }
    }

    /// Lay the graph out and return it with absolute positions
    ///
    /// Edges pass through unchanged. On error the input is consumed and the
    /// caller keeps whatever it rendered before.
    pub fn layout(&self, mut graph: FlowGraph) -> Result<FlowGraph, TreeError> {
        let span = info_span!(
            "layout_tree",
            engine = self.engine.name(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            direction = %self.config.direction
        );
        let _enter = span.enter();

        let request = self.request(&graph);
        let groups = request.children.iter().filter(|c| c.is_group()).count();
        debug!(groups, top_level = request.children.len(), "Built layout request");

        let result = self.engine.layout(request)?;

        let mut positions: HashMap<&str, Position> = HashMap::new();
        for child in &result.children {
            let placed: Vec<(&str, Position)> = if child.is_group() {
                child
                    .children
                    .iter()
                    .map(|member| (member.id.as_str(), Position::new(child.x + member.x, child.y + member.y)))
                    .collect()
            } else {
                vec![(child.id.as_str(), Position::new(child.x, child.y))]
            };
            for (id, position) in placed {
                if positions.insert(id, position).is_some() {
                    return Err(TreeError::engine(
                        self.engine.name(),
                        format!("node {} placed twice", id),
                    ));
                }
            }
        }

        let source_side = self.config.direction.source_side();
        let target_side = self.config.direction.target_side();
        for node in &mut graph.nodes {
            let key = node.id.to_string();
            let position = positions.get(key.as_str()).copied().ok_or_else(|| {
                TreeError::engine(self.engine.name(), format!("node {} missing from result", key))
            })?;
            node.position = position;
            node.source_position = Some(source_side);
            node.target_position = Some(target_side);
        }

        debug!(nodes = graph.nodes.len(), "Applied layout positions");
        Ok(graph)
    }
}

impl std::fmt::Debug for GroupingLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupingLayout")
            .field("engine", &self.engine.name())
            .field("config", &self.config)
            .finish()
    }
}
