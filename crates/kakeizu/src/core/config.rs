//! Layout configuration
//!
//! Sizes of person nodes and the spacing handed to the layout engine.

use serde::{Deserialize, Serialize};

use super::engine::{keys, LayoutOptions};
use super::{Direction, PlacementStrategy};

/// Width of a person node (a single vertical name column)
pub const PERSON_WIDTH: f64 = 36.0;
/// Height of a person node
pub const PERSON_HEIGHT: f64 = 172.0;

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub direction: Direction,
    pub person_width: f64,
    pub person_height: f64,
    /// Gap between generations
    pub layer_spacing: f64,
    /// Gap between neighbouring nodes of one generation
    pub node_spacing: f64,
    pub placement: PlacementStrategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::TopBottom,
            person_width: PERSON_WIDTH,
            person_height: PERSON_HEIGHT,
            layer_spacing: 100.0,
            node_spacing: 80.0,
            placement: PlacementStrategy::Simple,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_person_size(mut self, width: f64, height: f64) -> Self {
        self.person_width = width;
        self.person_height = height;
        self
    }

    pub fn with_spacing(mut self, layer_spacing: f64, node_spacing: f64) -> Self {
        self.layer_spacing = layer_spacing;
        self.node_spacing = node_spacing;
        self
    }

    pub fn with_placement(mut self, placement: PlacementStrategy) -> Self {
        self.placement = placement;
        self
    }

    /// Root options for the layout engine
    pub fn layout_options(&self) -> LayoutOptions {
        let mut options = LayoutOptions::new();
        options.insert(keys::ALGORITHM.to_string(), "layered".into());
        options.insert(
            keys::DIRECTION.to_string(),
            self.direction.engine_name().into(),
        );
        options.insert(keys::LAYER_SPACING.to_string(), self.layer_spacing.into());
        options.insert(keys::NODE_SPACING.to_string(), self.node_spacing.into());
        options.insert(
            keys::PLACEMENT.to_string(),
            self.placement.engine_name().into(),
        );
        options
    }

    /// Options for a compound group (spouse or parent pair)
    ///
    /// Members sit next to each other with no extra gap.
    pub fn group_options(&self) -> LayoutOptions {
        let mut options = LayoutOptions::new();
        options.insert(
            keys::DIRECTION.to_string(),
            self.direction.group_direction().engine_name().into(),
        );
        options.insert(keys::NODE_SPACING.to_string(), 0.0.into());
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.direction, Direction::TopBottom);
        assert_eq!(config.person_width, 36.0);
        assert_eq!(config.person_height, 172.0);
    }

    #[test]
    fn test_layout_options_follow_direction() {
        let options = LayoutConfig::new()
            .with_direction(Direction::LeftRight)
            .layout_options();
        assert_eq!(options[keys::DIRECTION].as_str(), Some("RIGHT"));
        assert_eq!(options[keys::ALGORITHM].as_str(), Some("layered"));
        assert_eq!(options[keys::LAYER_SPACING].as_f64(), Some(100.0));
    }

    #[test]
    fn test_group_options_are_horizontal_for_vertical_trees() {
        let options = LayoutConfig::default().group_options();
        assert_eq!(options[keys::DIRECTION].as_str(), Some("RIGHT"));
    }

    #[test]
    fn test_config_deserialises_partially() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"direction":"LR","node_spacing":10}"#).unwrap();
        assert_eq!(config.direction, Direction::LeftRight);
        assert_eq!(config.node_spacing, 10.0);
        assert_eq!(config.layer_spacing, 100.0);
    }
}
