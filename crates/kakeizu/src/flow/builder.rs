//! Flow graph construction
//!
//! Turns the flat person list into person nodes, deduplicated union nodes for
//! parent pairs, and marriage edges drawn once from the wife's side.

use std::collections::HashSet;
use tracing::{debug, span, trace, Level};

use super::{EdgeId, EdgeKind, FlowEdge, FlowGraph, FlowNode, NodeId, NodeKind, UnionKey};
use crate::core::{LayoutConfig, Position, Side};
use crate::tree::{Person, Tree};

/// Builds a [`FlowGraph`] from a tree snapshot
#[derive(Debug, Clone, Default)]
pub struct FlowBuilder {
    config: LayoutConfig,
}

impl FlowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Build the graph
    ///
    /// Rebuilding from an unchanged tree yields the same ids in the same order.
    pub fn build(&self, tree: &Tree) -> FlowGraph {
        let build_span = span!(Level::DEBUG, "build_flow", people = tree.len());
        let _enter = build_span.enter();

        let mut graph = FlowGraph::default();
        let mut unions: HashSet<UnionKey> = HashSet::new();
        let mut marriages: HashSet<(&str, &str)> = HashSet::new();

        for person in tree {
            graph.nodes.push(self.person_node(person));

            let father = tree.father_of(person).map(|p| p.id.as_str());
            let mother = tree.mother_of(person).map(|p| p.id.as_str());

            match (mother, father) {
                (Some(mother), Some(father)) if mother != father => {
                    let key = UnionKey::new(mother, father);
                    if unions.insert(key.clone()) {
                        trace!(union = %key, "New union");
                        self.push_union(&mut graph, &key);
                    }
                    graph.edges.push(FlowEdge {
                        id: EdgeId::UnionToChild {
                            union: key.clone(),
                            child: person.id.clone(),
                        },
                        source: NodeId::Union(key),
                        target: NodeId::person(&person.id),
                        source_handle: None,
                        target_handle: None,
                        kind: EdgeKind::Step,
                    });
                }
                (Some(parent), _) | (None, Some(parent)) => {
                    trace!(child = %person.id, parent, "Single known parent");
                    graph.edges.push(FlowEdge {
                        id: EdgeId::SingleParent {
                            parent: parent.to_string(),
                            child: person.id.clone(),
                        },
                        source: NodeId::person(parent),
                        target: NodeId::person(&person.id),
                        source_handle: None,
                        target_handle: None,
                        kind: EdgeKind::Step,
                    });
                }
                (None, None) => {}
            }

            if person.is_man == Some(false) {
                if let Some(husband) = tree.spouse_of(person) {
                    let pair = unordered(&person.id, &husband.id);
                    if husband.id != person.id && marriages.insert(pair) {
                        graph.edges.push(marriage_edge(person, husband));
                    }
                }
            }
        }

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            unions = unions.len(),
            marriages = marriages.len(),
            "Built flow graph"
        );
        graph
    }

    fn person_node(&self, person: &Person) -> FlowNode {
        FlowNode {
            id: NodeId::person(&person.id),
            kind: NodeKind::Person(person.clone()),
            width: self.config.person_width,
            height: self.config.person_height,
            position: Position::default(),
            source_position: None,
            target_position: None,
        }
    }

    fn push_union(&self, graph: &mut FlowGraph, key: &UnionKey) {
        graph.nodes.push(FlowNode {
            id: NodeId::Union(key.clone()),
            kind: NodeKind::Union,
            width: 0.0,
            height: 0.0,
            position: Position::default(),
            source_position: None,
            target_position: None,
        });
        for (parent, handle) in [(&key.mother, Side::Right), (&key.father, Side::Left)] {
            graph.edges.push(FlowEdge {
                id: EdgeId::ParentToUnion {
                    parent: parent.clone(),
                    union: key.clone(),
                },
                source: NodeId::person(parent),
                target: NodeId::Union(key.clone()),
                source_handle: None,
                target_handle: Some(handle),
                kind: EdgeKind::Step,
            });
        }
    }
}

fn marriage_edge(wife: &Person, husband: &Person) -> FlowEdge {
    FlowEdge {
        id: EdgeId::Marriage {
            wife: wife.id.clone(),
            husband: husband.id.clone(),
        },
        source: NodeId::person(&wife.id),
        target: NodeId::person(&husband.id),
        source_handle: Some(Side::Right),
        target_handle: Some(Side::Left),
        kind: EdgeKind::Marriage,
    }
}

fn unordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Build a flow graph with the default configuration
pub fn build_flow(tree: &Tree) -> FlowGraph {
    FlowBuilder::new().build(tree)
}
