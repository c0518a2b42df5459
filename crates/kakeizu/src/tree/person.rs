//! Person records
//!
//! Every name field may be empty, meaning "unknown". Parent and spouse ids are
//! weak references into the same tree; an empty string records "no link".

use serde::{Deserialize, Serialize};
use std::fmt;

/// One person in a family tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    pub last_name_kana: String,
    pub first_name_kana: String,
    /// `None` when the sex is unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_man: Option<bool>,
    pub father_id: String,
    pub mother_id: String,
    pub spouse_id: String,
    pub description: String,
}

/// Sex as recorded on a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Man,
    Woman,
    Unknown,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Man => write!(f, "男"),
            Sex::Woman => write!(f, "女"),
            Sex::Unknown => write!(f, "不明"),
        }
    }
}

impl Person {
    /// Create a person with only an id; everything else unknown
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self.first_name = first_name.into();
        self
    }

    pub fn with_kana(mut self, last_name_kana: impl Into<String>, first_name_kana: impl Into<String>) -> Self {
        self.last_name_kana = last_name_kana.into();
        self.first_name_kana = first_name_kana.into();
        self
    }

    pub fn man(mut self) -> Self {
        self.is_man = Some(true);
        self
    }

    pub fn woman(mut self) -> Self {
        self.is_man = Some(false);
        self
    }

    pub fn with_father(mut self, father_id: impl Into<String>) -> Self {
        self.father_id = father_id.into();
        self
    }

    pub fn with_mother(mut self, mother_id: impl Into<String>) -> Self {
        self.mother_id = mother_id.into();
        self
    }

    pub fn with_parents(self, father_id: impl Into<String>, mother_id: impl Into<String>) -> Self {
        self.with_father(father_id).with_mother(mother_id)
    }

    pub fn with_spouse(mut self, spouse_id: impl Into<String>) -> Self {
        self.spouse_id = spouse_id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn sex(&self) -> Sex {
        match self.is_man {
            Some(true) => Sex::Man,
            Some(false) => Sex::Woman,
            None => Sex::Unknown,
        }
    }

    /// Recorded father id, `None` when empty
    pub fn father(&self) -> Option<&str> {
        non_empty(&self.father_id)
    }

    /// Recorded mother id, `None` when empty
    pub fn mother(&self) -> Option<&str> {
        non_empty(&self.mother_id)
    }

    /// Recorded spouse id, `None` when empty
    pub fn spouse(&self) -> Option<&str> {
        non_empty(&self.spouse_id)
    }

    /// True when neither parent is recorded
    pub fn has_no_recorded_parents(&self) -> bool {
        self.father().is_none() && self.mother().is_none()
    }
}

fn non_empty(id: &str) -> Option<&str> {
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
