//! Generation ranks and rows without a layout engine
//!
//! A person with no recorded parents has rank 0; everyone else sits one
//! generation below their deeper parent. Ancestor loops in malformed data are
//! cut by tracking the chain of people visited on the way up.
//!
//! [`generation_rows`] buckets people by rank and pairs parents above their
//! children, mother then father.

use std::collections::{HashMap, VecDeque};
use tracing::{debug, span, trace, Level};

use crate::tree::{Person, Tree};

/// Ids visited on the way from the starting person up to the current one
///
/// Each recursive step links a new head onto its caller's path, so the
/// father and mother branches never see each other's visits.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisitedPath<'a> {
    head: Option<(&'a str, &'a VisitedPath<'a>)>,
}

impl<'a> VisitedPath<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// This path extended by `id`
    pub fn with<'b>(&'b self, id: &'b str) -> VisitedPath<'b>
    where
        'a: 'b,
    {
        VisitedPath {
            head: Some((id, self)),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.iter().any(|visited| visited == id)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Ids from the most recent visit back to the first
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        let mut current = self.head;
        std::iter::from_fn(move || {
            let (id, rest) = current?;
            current = rest.head;
            Some(id)
        })
    }
}

/// Rank of `person` given the people already visited above it
///
/// A dangling parent reference counts as rank 0. When a resolved parent is
/// already on the path, `person` closes an ancestor loop and gets rank 0.
pub fn compute_rank<'t>(tree: &'t Tree, person: &'t Person, path: &VisitedPath<'_>) -> usize {
    RankMemo::default().rank_on_path(tree, person, path).0
}

/// Rank of one person
pub fn rank(tree: &Tree, person: &Person) -> usize {
    compute_rank(tree, person, &VisitedPath::new())
}

/// Every person with their rank, in tree order
pub fn ranks(tree: &Tree) -> Vec<(&Person, usize)> {
    let mut memo = RankMemo::default();
    tree.iter()
        .map(|person| (person, memo.rank_on_path(tree, person, &VisitedPath::new()).0))
        .collect()
}

/// Ranks computed without ever reaching the loop guard
///
/// Such a rank depends only on the person's ancestry: a path that could cut
/// it would have to run through an ancestor loop, and walking that loop trips
/// the guard. Ranks that did trip it are recomputed on every path.
#[derive(Debug, Default)]
struct RankMemo<'t> {
    known: HashMap<&'t str, usize>,
}

impl<'t> RankMemo<'t> {
    /// The rank and whether it is safe to reuse on another path
    fn rank_on_path(&mut self, tree: &'t Tree, person: &'t Person, path: &VisitedPath<'_>) -> (usize, bool) {
        if path.contains(&person.id) {
            trace!(person = %person.id, "Already on path");
            return (0, false);
        }
        if let Some(&known) = self.known.get(person.id.as_str()) {
            return (known, true);
        }
        if person.has_no_recorded_parents() {
            self.known.insert(person.id.as_str(), 0);
            return (0, true);
        }

        let here = path.with(&person.id);
        let mut deepest = 0;
        let mut reusable = true;
        for parent in [tree.father_of(person), tree.mother_of(person)].into_iter().flatten() {
            if here.contains(&parent.id) {
                debug!(person = %person.id, parent = %parent.id, depth = here.len(), "Ancestor loop; rank degraded to 0");
                return (0, false);
            }
            let (parent_rank, parent_reusable) = self.rank_on_path(tree, parent, &here);
            deepest = deepest.max(parent_rank);
            reusable &= parent_reusable;
        }
        if reusable {
            self.known.insert(person.id.as_str(), 1 + deepest);
        }
        (1 + deepest, reusable)
    }
}

/// People arranged into rows, ancestors first
///
/// Rows are processed from the deepest generation upward. For each person the
/// rows above are scanned, nearest first, for their mother and for their
/// father. When both are still unplaced they move into the row directly above
/// the person, mother then father, and are processed with that row. Empty
/// rows are dropped.
pub fn generation_rows(tree: &Tree) -> Vec<Vec<&Person>> {
    let rows_span = span!(Level::DEBUG, "generation_rows", people = tree.len());
    let _enter = rows_span.enter();

    let ranked = ranks(tree);
    let Some(max_rank) = ranked.iter().map(|(_, r)| *r).max() else {
        return Vec::new();
    };

    let mut buckets: Vec<VecDeque<&Person>> = vec![VecDeque::new(); max_rank + 1];
    for (person, r) in ranked {
        buckets[r].push_back(person);
    }

    let mut rows: Vec<Vec<&Person>> = vec![Vec::new(); max_rank + 1];
    let mut paired = 0usize;
    for r in (0..=max_rank).rev() {
        let mut next = 0;
        loop {
            if next == rows[r].len() {
                match buckets[r].pop_front() {
                    Some(person) => rows[r].push(person),
                    None => break,
                }
            }
            let person = rows[r][next];
            next += 1;
            if r == 0 {
                continue;
            }
            if let Some((mother, father)) = take_parents(&mut buckets[..r], person) {
                trace!(child = %person.id, mother = %mother.id, father = %father.id, "Paired parents");
                rows[r - 1].push(mother);
                rows[r - 1].push(father);
                paired += 1;
            }
        }
    }

    rows.retain(|row| !row.is_empty());
    debug!(rows = rows.len(), paired, "Assembled generation rows");
    rows
}

/// Remove `person`'s mother and father from the buckets above, if both are there
fn take_parents<'t>(above: &mut [VecDeque<&'t Person>], person: &Person) -> Option<(&'t Person, &'t Person)> {
    let (mother_id, father_id) = (person.mother()?, person.father()?);
    if mother_id == father_id {
        return None;
    }
    let mother_at = find_upward(above, mother_id)?;
    let father_at = find_upward(above, father_id)?;

    // Remove the later slot first so the earlier index stays valid.
    let (first, second) = if mother_at < father_at {
        (father_at, mother_at)
    } else {
        (mother_at, father_at)
    };
    let a = above[first.0].remove(first.1)?;
    let b = above[second.0].remove(second.1)?;
    if first == father_at {
        Some((b, a))
    } else {
        Some((a, b))
    }
}

/// Nearest bucket holding `id`, scanning from the row directly above upward
fn find_upward(above: &[VecDeque<&Person>], id: &str) -> Option<(usize, usize)> {
    (0..above.len())
        .rev()
        .find_map(|k| above[k].iter().position(|p| p.id == id).map(|i| (k, i)))
}
