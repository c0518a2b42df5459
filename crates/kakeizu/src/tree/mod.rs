//! Family tree data model
//!
//! A [`Tree`] is an ordered list of [`Person`] records with unique ids.
//! Order is insertion order and only serves as a tie-break for layout.

mod names;
mod person;

pub use names::*;
pub use person::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

use crate::core::TreeError;

/// Serialised form of a tree: `{"people": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TreeFile {
    #[serde(default)]
    people: Vec<Person>,
}

/// An ordered collection of people with unique ids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeFile", into = "TreeFile")]
pub struct Tree {
    people: Vec<Person>,
    index: HashMap<String, usize>,
}

impl TryFrom<TreeFile> for Tree {
    type Error = TreeError;

    fn try_from(file: TreeFile) -> Result<Self, Self::Error> {
        Tree::new(file.people)
    }
}

impl From<Tree> for TreeFile {
    fn from(tree: Tree) -> Self {
        TreeFile {
            people: tree.people,
        }
    }
}

impl Tree {
    /// Build a tree, rejecting duplicate ids
    pub fn new(people: Vec<Person>) -> Result<Self, TreeError> {
        let mut index = HashMap::with_capacity(people.len());
        for (i, person) in people.iter().enumerate() {
            if index.insert(person.id.clone(), i).is_some() {
                return Err(TreeError::duplicate_person_id(&person.id));
            }
        }
        debug!(people = people.len(), "Built tree");
        Ok(Self { people, index })
    }

    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append a person, rejecting a duplicate id
    pub fn push(&mut self, person: Person) -> Result<(), TreeError> {
        if self.index.contains_key(&person.id) {
            return Err(TreeError::duplicate_person_id(&person.id));
        }
        self.index.insert(person.id.clone(), self.people.len());
        self.people.push(person);
        Ok(())
    }

    /// Look up a person; `None` is the "not found" sentinel
    pub fn get(&self, id: &str) -> Option<&Person> {
        self.index.get(id).map(|&i| &self.people[i])
    }

    /// Edit one person in place; returns `false` when `id` is unknown
    ///
    /// The id is restored after `edit` runs, so the index stays in step.
    pub fn edit<F>(&mut self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut Person),
    {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        let person = &mut self.people[i];
        edit(person);
        if person.id != id {
            trace!(id, attempted = %person.id, "Id change ignored");
            person.id = id.to_string();
        }
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Resolved father, `None` when unrecorded or dangling
    pub fn father_of(&self, person: &Person) -> Option<&Person> {
        person.father().and_then(|id| self.resolve(person, "father", id))
    }

    /// Resolved mother, `None` when unrecorded or dangling
    pub fn mother_of(&self, person: &Person) -> Option<&Person> {
        person.mother().and_then(|id| self.resolve(person, "mother", id))
    }

    /// Resolved spouse, `None` when unrecorded or dangling
    pub fn spouse_of(&self, person: &Person) -> Option<&Person> {
        person.spouse().and_then(|id| self.resolve(person, "spouse", id))
    }

    /// Children in tree order
    pub fn children_of(&self, person: &Person) -> Vec<&Person> {
        self.people
            .iter()
            .filter(|p| p.father() == Some(&person.id) || p.mother() == Some(&person.id))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Person> {
        self.people.iter()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Report references that do not hold up
    ///
    /// Nothing here stops a layout; the flow builder and rank algorithm treat
    /// every reported reference as unknown.
    pub fn validate(&self) -> Vec<TreeIssue> {
        let mut issues = Vec::new();
        for person in &self.people {
            let id = &person.id;
            for (relation, target) in [
                (Relation::Father, person.father()),
                (Relation::Mother, person.mother()),
                (Relation::Spouse, person.spouse()),
            ] {
                let Some(target) = target else { continue };
                if target == id {
                    issues.push(TreeIssue::SelfReference {
                        person: id.clone(),
                        relation,
                    });
                } else if !self.contains(target) {
                    issues.push(TreeIssue::Dangling {
                        person: id.clone(),
                        relation,
                        target: target.to_string(),
                    });
                }
            }

            if let Some(spouse) = self.spouse_of(person) {
                if spouse.id != *id && spouse.spouse() != Some(id.as_str()) {
                    issues.push(TreeIssue::AsymmetricSpouse {
                        person: id.clone(),
                        spouse: spouse.id.clone(),
                    });
                }
            }
        }
        debug!(issues = issues.len(), "Validated tree");
        issues
    }

    fn resolve(&self, person: &Person, relation: &'static str, id: &str) -> Option<&Person> {
        let found = self.get(id);
        if found.is_none() {
            trace!(person = %person.id, relation, target = id, "Dangling reference");
        }
        found
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Person;
    type IntoIter = std::slice::Iter<'a, Person>;

    fn into_iter(self) -> Self::IntoIter {
        self.people.iter()
    }
}

/// Which reference an issue concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Father,
    Mother,
    Spouse,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Father => write!(f, "father"),
            Relation::Mother => write!(f, "mother"),
            Relation::Spouse => write!(f, "spouse"),
        }
    }
}

/// A questionable reference found by [`Tree::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeIssue {
    /// The referenced person is not in the tree
    Dangling {
        person: String,
        relation: Relation,
        target: String,
    },
    /// A person references themselves
    SelfReference { person: String, relation: Relation },
    /// `person` names `spouse`, who does not name `person` back
    AsymmetricSpouse { person: String, spouse: String },
}

impl fmt::Display for TreeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeIssue::Dangling {
                person,
                relation,
                target,
            } => write!(f, "{}: {} {} is not in the tree", person, relation, target),
            TreeIssue::SelfReference { person, relation } => {
                write!(f, "{}: is recorded as their own {}", person, relation)
            }
            TreeIssue::AsymmetricSpouse { person, spouse } => write!(
                f,
                "{}: spouse {} does not name {} as spouse",
                person, spouse, person
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> Tree {
        Tree::new(vec![
            Person::new("f").man().with_spouse("m"),
            Person::new("m").woman().with_spouse("f"),
            Person::new("c1").with_parents("f", "m"),
            Person::new("c2").with_parents("f", "m"),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Tree::new(vec![Person::new("a"), Person::new("a")]);
        assert!(matches!(result, Err(TreeError::DuplicatePersonId { id }) if id == "a"));
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut tree = family();
        assert!(tree.push(Person::new("c3")).is_ok());
        assert!(tree.push(Person::new("c3")).is_err());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_lookup_and_resolution() {
        let tree = family();
        let child = tree.get("c1").unwrap();
        assert_eq!(tree.father_of(child).unwrap().id, "f");
        assert_eq!(tree.mother_of(child).unwrap().id, "m");
        assert!(tree.get("nobody").is_none());
    }

    #[test]
    fn test_dangling_reference_resolves_to_none() {
        let tree = Tree::new(vec![Person::new("a").with_father("ghost")]).unwrap();
        let person = tree.get("a").unwrap();
        assert!(tree.father_of(person).is_none());
        assert!(!person.has_no_recorded_parents());
    }

    #[test]
    fn test_children_in_tree_order() {
        let tree = family();
        let father = tree.get("f").unwrap();
        let children: Vec<_> = tree.children_of(father).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(children, vec!["c1", "c2"]);
    }

    #[test]
    fn test_validate_clean_tree() {
        assert!(family().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_issues() {
        let tree = Tree::new(vec![
            Person::new("a").with_father("ghost").with_spouse("b"),
            Person::new("b"),
            Person::new("c").with_mother("c"),
        ])
        .unwrap();
        let issues = tree.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.contains(&TreeIssue::Dangling {
            person: "a".to_string(),
            relation: Relation::Father,
            target: "ghost".to_string(),
        }));
        assert!(issues.contains(&TreeIssue::AsymmetricSpouse {
            person: "a".to_string(),
            spouse: "b".to_string(),
        }));
        assert!(issues.contains(&TreeIssue::SelfReference {
            person: "c".to_string(),
            relation: Relation::Mother,
        }));
    }

    #[test]
    fn test_edit_keeps_id_and_index_in_step() {
        let mut tree = Tree::new(vec![Person::new("a"), Person::new("b")]).unwrap();
        assert!(tree.edit("a", |p| {
            p.id = "b".to_string();
            p.description = "edited".to_string();
        }));
        assert_eq!(tree.get("a").unwrap().description, "edited");
        assert_eq!(tree.get("a").unwrap().id, "a");
        assert!(tree.validate().is_empty());
        assert!(!tree.edit("ghost", |_| {}));
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let tree = family();
        let json = tree.to_json().unwrap();
        let parsed = Tree::from_json(&json).unwrap();
        assert_eq!(parsed, tree);
        let ids: Vec<_> = parsed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["f", "m", "c1", "c2"]);
    }

    #[test]
    fn test_json_with_duplicates_fails() {
        let result = Tree::from_json(r#"{"people":[{"id":"a"},{"id":"a"}]}"#);
        assert!(result.is_err());
    }
}
