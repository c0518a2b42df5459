//! Core types shared across the crate
//!
//! Errors, logging, layout configuration, direction/side types and the
//! layout engine boundary.

mod config;
pub mod engine;
mod error;
pub mod logging;
mod types;

pub use config::*;
pub use engine::{LayoutEdge, LayoutEngine, LayoutGraph, LayoutNode, LayoutOptions, OptionValue};
pub use error::*;
pub use logging::*;
pub use types::*;
