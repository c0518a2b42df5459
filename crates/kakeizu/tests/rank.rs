//! Generation ranks and row assembly

use kakeizu::rank::{compute_rank, generation_rows, rank, ranks, VisitedPath};
use kakeizu::tree::{Person, Tree};

fn row_ids(tree: &Tree) -> Vec<Vec<&str>> {
    generation_rows(tree)
        .into_iter()
        .map(|row| row.into_iter().map(|p| p.id.as_str()).collect())
        .collect()
}

#[test]
fn test_people_without_parents_are_rank_zero() {
    let tree = Tree::new(vec![
        Person::new("a"),
        Person::new("b").man(),
        Person::new("c").with_spouse("a"),
    ])
    .unwrap();
    assert!(ranks(&tree).iter().all(|(_, r)| *r == 0));
}

#[test]
fn test_three_generation_chain() {
    let tree = Tree::new(vec![
        Person::new("A").with_mother("B"),
        Person::new("B").with_father("C"),
        Person::new("C"),
    ])
    .unwrap();
    let by_id: Vec<(&str, usize)> = ranks(&tree).into_iter().map(|(p, r)| (p.id.as_str(), r)).collect();
    assert_eq!(by_id, vec![("A", 2), ("B", 1), ("C", 0)]);
}

#[test]
fn test_two_cycle_terminates_with_small_rank() {
    let tree = Tree::new(vec![
        Person::new("A").with_father("B"),
        Person::new("B").with_father("A"),
    ])
    .unwrap();
    let r = rank(&tree, tree.get("A").unwrap());
    assert!(r <= 1);
}

#[test]
fn test_longer_cycle_terminates() {
    let tree = Tree::new(vec![
        Person::new("a").with_father("b"),
        Person::new("b").with_mother("c"),
        Person::new("c").with_father("a"),
    ])
    .unwrap();
    for (_, r) in ranks(&tree) {
        assert!(r <= 2);
    }
}

#[test]
fn test_caller_supplied_path_cuts_recursion() {
    let tree = Tree::new(vec![Person::new("c").with_father("p"), Person::new("p")]).unwrap();
    let root = VisitedPath::new();
    let path = root.with("c");
    assert_eq!(compute_rank(&tree, tree.get("c").unwrap(), &path), 0);
    assert_eq!(compute_rank(&tree, tree.get("c").unwrap(), &VisitedPath::new()), 1);
}

#[test]
fn test_rows_place_couple_above_children() {
    let tree = Tree::new(vec![
        Person::new("uncle"),
        Person::new("f").man(),
        Person::new("m").woman(),
        Person::new("c1").with_parents("f", "m"),
        Person::new("c2").with_parents("f", "m"),
    ])
    .unwrap();
    assert_eq!(row_ids(&tree), vec![vec!["m", "f", "uncle"], vec!["c1", "c2"]]);
}

#[test]
fn test_rows_cover_everyone_once() {
    let tree = Tree::new(vec![
        Person::new("gf").man(),
        Person::new("gm").woman(),
        Person::new("f").man().with_parents("gf", "gm"),
        Person::new("m").woman(),
        Person::new("c").with_parents("f", "m"),
        Person::new("d").with_parents("f", "m"),
        Person::new("loner"),
    ])
    .unwrap();
    let mut all: Vec<&str> = row_ids(&tree).into_iter().flatten().collect();
    all.sort_unstable();
    assert_eq!(all, vec!["c", "d", "f", "gf", "gm", "loner", "m"]);
}

#[test]
fn test_rows_survive_cycles() {
    let tree = Tree::new(vec![
        Person::new("a").with_parents("b", "c"),
        Person::new("b").man().with_father("a"),
        Person::new("c").woman(),
    ])
    .unwrap();
    let total: usize = generation_rows(&tree).iter().map(Vec::len).sum();
    assert_eq!(total, 3);
}

/// Each generation is a brother and sister whose parents are the previous pair
fn sibling_pedigree(generations: usize) -> Tree {
    let mut people = vec![Person::new("b0").man(), Person::new("s0").woman()];
    for g in 1..generations {
        let (father, mother) = (format!("b{}", g - 1), format!("s{}", g - 1));
        people.push(Person::new(format!("b{}", g)).man().with_parents(father.as_str(), mother.as_str()));
        people.push(Person::new(format!("s{}", g)).woman().with_parents(father, mother));
    }
    Tree::new(people).unwrap()
}

#[test]
fn test_shared_ancestry_ranks_stay_linear() {
    let tree = sibling_pedigree(40);
    let ranked = ranks(&tree);
    assert_eq!(ranked.len(), 80);
    for (person, r) in &ranked {
        let generation: usize = person.id[1..].parse().unwrap();
        assert_eq!(*r, generation, "{}", person.id);
    }
    assert_eq!(rank(&tree, tree.get("s39").unwrap()), 39);
}

#[test]
fn test_shared_ancestry_rows_pair_each_generation() {
    let tree = sibling_pedigree(30);
    let rows = row_ids(&tree);
    assert_eq!(rows.len(), 30);
    assert_eq!(rows[0], vec!["s0", "b0"]);
    assert_eq!(rows[29], vec!["b29", "s29"]);
    assert!(rows.iter().all(|row| row.len() == 2));
}
