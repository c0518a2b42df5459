//! Core error types for family tree processing
//!
//! Dangling references and ancestor cycles are not errors: they degrade to
//! "unknown" inside the tree model and the rank algorithm. The variants here
//! cover malformed input and layout engine failures.

use thiserror::Error;

/// Error type shared by the tree model, the flow builder and the layout engines
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Duplicate person id: {id}")]
    DuplicatePersonId { id: String },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Layout engine '{engine}' failed: {message}")]
    Engine { engine: String, message: String },

    #[error("Layout edge {edge} references unknown node {node}")]
    UnknownLayoutNode { edge: String, node: String },

    #[error("Invalid layout option {key}={value}")]
    InvalidLayoutOption { key: String, value: String },
}

impl TreeError {
    /// Create a new duplicate id error
    pub fn duplicate_person_id(id: impl Into<String>) -> Self {
        Self::DuplicatePersonId { id: id.into() }
    }

    /// Create a new engine failure
    pub fn engine(engine: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Engine {
            engine: engine.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown node error
    pub fn unknown_layout_node(edge: impl Into<String>, node: impl Into<String>) -> Self {
        Self::UnknownLayoutNode {
            edge: edge.into(),
            node: node.into(),
        }
    }

    /// Create a new invalid option error
    pub fn invalid_layout_option(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidLayoutOption {
            key: key.into(),
            value: value.into(),
        }
    }
}
