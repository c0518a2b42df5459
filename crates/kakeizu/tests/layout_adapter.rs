//! Grouping adapter against the bundled engine and a recording engine

use std::sync::{Arc, Mutex};

use kakeizu::core::engine::keys;
use kakeizu::flow::build_flow;
use kakeizu::layout::{GroupingLayout, LayeredEngine};
use kakeizu::tree::{Person, Tree};
use kakeizu::{Direction, LayoutConfig, LayoutEngine, LayoutGraph, OptionValue, Side, TreeError};

/// Places every top-level child at (100 * index, 10) and group members at (5 * index, 1)
#[derive(Default)]
struct Recording {
    seen: Mutex<Option<LayoutGraph>>,
}

impl LayoutEngine for Recording {
    fn layout(&self, mut graph: LayoutGraph) -> Result<LayoutGraph, TreeError> {
        if let Ok(mut seen) = self.seen.lock() {
            *seen = Some(graph.clone());
        }
        for (i, child) in graph.children.iter_mut().enumerate() {
            child.x = 100.0 * i as f64;
            child.y = 10.0;
            for (j, member) in child.children.iter_mut().enumerate() {
                member.x = 5.0 * j as f64;
                member.y = 1.0;
            }
        }
        Ok(graph)
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct DropsNodes;

impl LayoutEngine for DropsNodes {
    fn layout(&self, mut graph: LayoutGraph) -> Result<LayoutGraph, TreeError> {
        graph.children.clear();
        Ok(graph)
    }

    fn name(&self) -> &'static str {
        "drops-nodes"
    }
}

fn family() -> Tree {
    Tree::new(vec![
        Person::new("f").man().with_spouse("m"),
        Person::new("m").woman().with_spouse("f"),
        Person::new("c").with_parents("f", "m"),
        Person::new("h").man().with_spouse("w"),
        Person::new("w").woman().with_spouse("h"),
        Person::new("solo"),
    ])
    .unwrap()
}

#[test]
fn test_request_groups_and_options() {
    let engine = Arc::new(Recording::default());
    let layout = GroupingLayout::new(engine.clone(), LayoutConfig::default());
    layout.layout(build_flow(&family())).unwrap();

    let request = engine.seen.lock().unwrap().clone().unwrap();
    assert_eq!(request.layout_options.get(keys::DIRECTION), Some(&OptionValue::from("DOWN")));
    assert_eq!(request.layout_options.get(keys::LAYER_SPACING), Some(&OptionValue::from(100.0)));

    let groups: Vec<_> = request.children.iter().filter(|c| c.is_group()).collect();
    assert_eq!(groups.len(), 2);
    let members = |i: usize| groups[i].children.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
    assert_eq!(members(0), vec!["m", "f"]);
    assert_eq!(members(1), vec!["w", "h"]);
    assert_eq!(groups[0].layout_options.get(keys::DIRECTION), Some(&OptionValue::from("RIGHT")));

    // union, child, solo stay top-level
    assert_eq!(request.children.len(), 5);
    assert!(request.edges.iter().all(|e| e.sources.len() == 1 && e.targets.len() == 1));
}

#[test]
fn test_group_offsets_are_flattened() {
    let layout = GroupingLayout::new(Arc::new(Recording::default()), LayoutConfig::default());
    let graph = layout.layout(build_flow(&family())).unwrap();

    // first top-level child is the m/f group at (0, 10)
    let m = graph.person_node("m").unwrap().position;
    let f = graph.person_node("f").unwrap().position;
    assert_eq!((m.x, m.y), (0.0, 11.0));
    assert_eq!((f.x, f.y), (5.0, 11.0));
}

#[test]
fn test_missing_node_is_an_engine_error() {
    let layout = GroupingLayout::new(Arc::new(DropsNodes), LayoutConfig::default());
    let result = layout.layout(build_flow(&family()));
    assert!(matches!(result, Err(TreeError::Engine { .. })));
}

#[test]
fn test_connection_sides_follow_direction() {
    let cases = [
        (Direction::TopBottom, Side::Bottom, Side::Top),
        (Direction::BottomTop, Side::Top, Side::Bottom),
        (Direction::LeftRight, Side::Right, Side::Left),
        (Direction::RightLeft, Side::Left, Side::Right),
    ];
    for (direction, source, target) in cases {
        let config = LayoutConfig::new().with_direction(direction);
        let graph = GroupingLayout::new(Arc::new(LayeredEngine::new()), config)
            .layout(build_flow(&family()))
            .unwrap();
        for node in &graph.nodes {
            assert_eq!(node.source_position, Some(source), "{direction}");
            assert_eq!(node.target_position, Some(target), "{direction}");
        }
    }
}

#[test]
fn test_bundled_engine_keeps_couples_adjacent_and_ordered() {
    let graph = kakeizu::layout_tree(&family()).unwrap();
    let pos = |id: &str| graph.person_node(id).unwrap().position;

    assert_eq!(pos("f").x - pos("m").x, 36.0);
    assert_eq!(pos("f").y, pos("m").y);
    assert_eq!(pos("h").x - pos("w").x, 36.0);
    assert!(pos("m").y < pos("c").y);
}

#[test]
fn test_bottom_top_puts_ancestors_below() {
    let config = LayoutConfig::new().with_direction(Direction::BottomTop);
    let graph = kakeizu::layout_tree_with_config(&family(), &config).unwrap();
    let pos = |id: &str| graph.person_node(id).unwrap().position;
    assert!(pos("f").y > pos("c").y);
}

#[test]
fn test_no_overlap_within_generation() {
    let graph = kakeizu::layout_tree(&family()).unwrap();
    let people: Vec<_> = graph.nodes.iter().filter(|n| !n.is_union()).collect();
    for (i, a) in people.iter().enumerate() {
        for b in &people[i + 1..] {
            if a.position.y == b.position.y {
                let gap = (a.position.x - b.position.x).abs();
                assert!(gap >= 36.0, "{} and {} overlap", a.id, b.id);
            }
        }
    }
}

#[test]
fn test_same_input_same_arrangement() {
    let first = kakeizu::layout_tree(&family()).unwrap();
    let second = kakeizu::layout_tree(&family()).unwrap();
    assert_eq!(first, second);
}

/// Reports the first top-level child twice
struct Duplicates;

impl LayoutEngine for Duplicates {
    fn layout(&self, mut graph: LayoutGraph) -> Result<LayoutGraph, TreeError> {
        if let Some(first) = graph.children.first().cloned() {
            graph.children.push(first);
        }
        Ok(graph)
    }

    fn name(&self) -> &'static str {
        "duplicates"
    }
}

/// Parent ids that concatenate to the same text across two unions
fn lookalike_unions() -> Tree {
    Tree::new(vec![
        Person::new("a+b").woman(),
        Person::new("c").man(),
        Person::new("a").woman(),
        Person::new("b+c").man(),
        Person::new("x").with_parents("c", "a+b"),
        Person::new("y").with_parents("b+c", "a"),
        Person::new("union:a+b+c"),
    ])
    .unwrap()
}

#[test]
fn test_lookalike_unions_keep_their_own_positions() {
    let engine = Arc::new(Recording::default());
    let layout = GroupingLayout::new(engine.clone(), LayoutConfig::default());
    let graph = layout.layout(build_flow(&lookalike_unions())).unwrap();

    let mut ids: Vec<String> = graph.nodes.iter().map(|n| n.id.to_string()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), graph.nodes.len());

    let request = engine.seen.lock().unwrap().clone().unwrap();
    assert_eq!(request.leaf_count(), graph.nodes.len());

    let unions: Vec<_> = graph.union_nodes().collect();
    assert_eq!(unions.len(), 2);
    assert_ne!(unions[0].id.to_string(), unions[1].id.to_string());
    assert_ne!(unions[0].position, unions[1].position);

    let edge_ids: Vec<String> = graph.edges.iter().map(|e| e.id.to_string()).collect();
    let mut unique = edge_ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), edge_ids.len());
}

#[test]
fn test_lookalike_unions_lay_out_with_bundled_engine() {
    let graph = kakeizu::layout_tree(&lookalike_unions()).unwrap();
    let pos = |id: &str| graph.person_node(id).unwrap().position;
    assert!(pos("a+b").y < pos("x").y);
    assert!(pos("a").y < pos("y").y);
    let unions: Vec<_> = graph.union_nodes().collect();
    assert_ne!(unions[0].position, unions[1].position);
}

#[test]
fn test_node_placed_twice_is_an_engine_error() {
    let layout = GroupingLayout::new(Arc::new(Duplicates), LayoutConfig::default());
    let result = layout.layout(build_flow(&family()));
    assert!(matches!(result, Err(TreeError::Engine { .. })));
}
