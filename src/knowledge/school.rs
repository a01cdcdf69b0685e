use std::collections::BTreeSet;

use crate::knowledge::skill::Skill;

/// A knowledge domain: its skills and the schools it dominates
#[derive(Debug, Clone, PartialEq, Default)]
pub struct School {
    pub name: String,
    pub skills: Vec<Skill>,
    pub dominates: BTreeSet<String>,
}

impl School {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skills: Vec::new(),
            dominates: BTreeSet::new(),
        }
    }

    pub fn with_dominance<I, S>(mut self, dominated: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dominates.extend(dominated.into_iter().map(Into::into));
        self
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn dominates(&self, other: &str) -> bool {
        self.dominates.contains(other)
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }
}
