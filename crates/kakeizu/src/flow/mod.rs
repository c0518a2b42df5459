//! Flow graph: the node/edge structure derived from a [`Tree`](crate::tree::Tree)
//!
//! Person nodes carry their [`Person`] record; union nodes are zero-size
//! junctions standing for one (mother, father) pair. The graph is rebuilt from
//! a tree snapshot on every layout pass and never edited in place.
//!
//! Identifiers are structured keys. Their string form, used by renderers to
//! reconcile nodes between passes, is deterministic and injective: person ids
//! are written with `%`, `:`, `+` and `>` percent-escaped, so only union and
//! edge ids contain those characters unescaped. Plain ids are written as is.

mod builder;

pub use builder::*;

use serde::{Serialize, Serializer};
use std::fmt;

use crate::core::{Position, Side};
use crate::tree::Person;

/// Identifies the union of one mother and one father
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnionKey {
    pub mother: String,
    pub father: String,
}

impl UnionKey {
    pub fn new(mother: impl Into<String>, father: impl Into<String>) -> Self {
        Self {
            mother: mother.into(),
            father: father.into(),
        }
    }
}

impl fmt::Display for UnionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "union:{}+{}", Escaped(&self.mother), Escaped(&self.father))
    }
}

/// A person id with the separator characters percent-escaped
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(at) = rest.find(|c: char| matches!(c, '%' | ':' | '+' | '>')) {
            f.write_str(&rest[..at])?;
            let escape = match rest.as_bytes()[at] {
                b'%' => "%25",
                b':' => "%3A",
                b'+' => "%2B",
                _ => "%3E",
            };
            f.write_str(escape)?;
            rest = &rest[at + 1..];
        }
        f.write_str(rest)
    }
}

/// Node identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Person(String),
    Union(UnionKey),
}

impl NodeId {
    pub fn person(id: impl Into<String>) -> Self {
        NodeId::Person(id.into())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Person(id) => fmt::Display::fmt(&Escaped(id), f),
            NodeId::Union(key) => fmt::Display::fmt(key, f),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Edge identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeId {
    /// Mother or father into their union
    ParentToUnion { parent: String, union: UnionKey },
    /// Union down to one child
    UnionToChild { union: UnionKey, child: String },
    /// The only known parent straight to the child
    SingleParent { parent: String, child: String },
    /// Wife to husband
    Marriage { wife: String, husband: String },
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeId::ParentToUnion { parent, union } => write!(f, "{}->{}", Escaped(parent), union),
            EdgeId::UnionToChild { union, child } => write!(f, "{}->{}", union, Escaped(child)),
            EdgeId::SingleParent { parent, child } => write!(f, "{}->{}", Escaped(parent), Escaped(child)),
            EdgeId::Marriage { wife, husband } => {
                write!(f, "marriage:{}+{}", Escaped(wife), Escaped(husband))
            }
        }
    }
}

impl Serialize for EdgeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeKind {
    Person(Person),
    Union,
}

/// A node handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub width: f64,
    pub height: f64,
    pub position: Position,
    /// Side outgoing edges leave from, fixed once laid out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_position: Option<Side>,
    /// Side incoming edges arrive at, fixed once laid out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_position: Option<Side>,
}

impl FlowNode {
    pub fn person(&self) -> Option<&Person> {
        match &self.kind {
            NodeKind::Person(person) => Some(person),
            NodeKind::Union => None,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self.kind, NodeKind::Union)
    }
}

/// Rendering style of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Step,
    Marriage,
}

/// An edge handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<Side>,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

/// Nodes and edges of one layout pass
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn node(&self, id: &NodeId) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn person_node(&self, person_id: &str) -> Option<&FlowNode> {
        self.nodes
            .iter()
            .find(|n| matches!(&n.id, NodeId::Person(id) if id == person_id))
    }

    pub fn union_nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.iter().filter(|n| n.is_union())
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &FlowEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json(&self) -> Result<String, crate::core::TreeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
