//! Core type definitions shared by the flow graph and the layout engines
//!
//! Layout direction, connection sides, node placement strategy and positions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction in which generations flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Ancestors on top, descendants below
    #[default]
    #[serde(rename = "TB")]
    TopBottom,
    /// Ancestors at the bottom
    #[serde(rename = "BT")]
    BottomTop,
    /// Ancestors on the left
    #[serde(rename = "LR")]
    LeftRight,
    /// Ancestors on the right
    #[serde(rename = "RL")]
    RightLeft,
}

impl Direction {
    /// Returns true if generations are stacked vertically
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::TopBottom | Direction::BottomTop)
    }

    /// Direction name in the layout engine option vocabulary
    pub fn engine_name(&self) -> &'static str {
        match self {
            Direction::TopBottom => "DOWN",
            Direction::BottomTop => "UP",
            Direction::LeftRight => "RIGHT",
            Direction::RightLeft => "LEFT",
        }
    }

    /// Parse an engine direction name (`DOWN`, `UP`, `RIGHT`, `LEFT`)
    pub fn from_engine_name(name: &str) -> Option<Self> {
        match name {
            "DOWN" => Some(Direction::TopBottom),
            "UP" => Some(Direction::BottomTop),
            "RIGHT" => Some(Direction::LeftRight),
            "LEFT" => Some(Direction::RightLeft),
            _ => None,
        }
    }

    /// Side outgoing (descendant) edges leave from
    pub fn source_side(&self) -> Side {
        match self {
            Direction::TopBottom => Side::Bottom,
            Direction::BottomTop => Side::Top,
            Direction::LeftRight => Side::Right,
            Direction::RightLeft => Side::Left,
        }
    }

    /// Side incoming (ancestor) edges arrive at
    pub fn target_side(&self) -> Side {
        self.source_side().opposite()
    }

    /// Direction compound groups lay their members out along
    ///
    /// Couples sit side by side, across the generation axis.
    pub fn group_direction(&self) -> Direction {
        if self.is_vertical() {
            Direction::LeftRight
        } else {
            Direction::TopBottom
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::TopBottom => write!(f, "TB"),
            Direction::BottomTop => write!(f, "BT"),
            Direction::LeftRight => write!(f, "LR"),
            Direction::RightLeft => write!(f, "RL"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TB" | "TD" => Ok(Direction::TopBottom),
            "BT" => Ok(Direction::BottomTop),
            "LR" => Ok(Direction::LeftRight),
            "RL" => Ok(Direction::RightLeft),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

/// A side of a node where edges attach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Top => write!(f, "top"),
            Side::Bottom => write!(f, "bottom"),
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// How blocks are placed across a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum PlacementStrategy {
    /// Center every layer on the widest one
    #[default]
    Simple,
    /// Align each block with the mean center of its predecessors, then pack
    /// the layer so blocks do not overlap
    LinearSegments,
}

impl PlacementStrategy {
    /// Strategy name in the layout engine option vocabulary
    pub fn engine_name(&self) -> &'static str {
        match self {
            PlacementStrategy::Simple => "SIMPLE",
            PlacementStrategy::LinearSegments => "LINEAR_SEGMENTS",
        }
    }
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.engine_name())
    }
}

impl FromStr for PlacementStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "SIMPLE" => Ok(PlacementStrategy::Simple),
            "LINEAR_SEGMENTS" => Ok(PlacementStrategy::LinearSegments),
            _ => Err(format!("Unknown placement strategy: {}", s)),
        }
    }
}

/// Absolute position of a node's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("TB".parse::<Direction>().unwrap(), Direction::TopBottom);
        assert_eq!("td".parse::<Direction>().unwrap(), Direction::TopBottom);
        assert_eq!("lr".parse::<Direction>().unwrap(), Direction::LeftRight);
        assert!("XY".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_display_roundtrip() {
        for direction in [
            Direction::TopBottom,
            Direction::BottomTop,
            Direction::LeftRight,
            Direction::RightLeft,
        ] {
            assert_eq!(direction.to_string().parse::<Direction>().unwrap(), direction);
            assert_eq!(
                Direction::from_engine_name(direction.engine_name()),
                Some(direction)
            );
        }
    }

    #[test]
    fn test_vertical_sides() {
        assert_eq!(Direction::TopBottom.source_side(), Side::Bottom);
        assert_eq!(Direction::TopBottom.target_side(), Side::Top);
        assert_eq!(Direction::LeftRight.source_side(), Side::Right);
        assert_eq!(Direction::LeftRight.target_side(), Side::Left);
    }

    #[test]
    fn test_group_direction_is_across_generations() {
        assert_eq!(Direction::TopBottom.group_direction(), Direction::LeftRight);
        assert_eq!(Direction::RightLeft.group_direction(), Direction::TopBottom);
    }

    #[test]
    fn test_placement_parsing() {
        assert_eq!(
            "linear-segments".parse::<PlacementStrategy>().unwrap(),
            PlacementStrategy::LinearSegments
        );
        assert_eq!(
            "SIMPLE".parse::<PlacementStrategy>().unwrap(),
            PlacementStrategy::Simple
        );
        assert!("network".parse::<PlacementStrategy>().is_err());
    }
}
