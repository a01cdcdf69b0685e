//! Registry of schools and the dominance multiplier

use std::collections::BTreeMap;

use crate::core::error::{DuelError, Result};
use crate::knowledge::school::School;
use crate::knowledge::skill::Skill;

/// Multiplier when the attacker's school dominates the defender's
pub const DOMINANT_MULTIPLIER: f64 = 1.2;
/// Multiplier when the defender's school dominates the attacker's
pub const DOMINATED_MULTIPLIER: f64 = 0.8;

/// All schools of a match, keyed by name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchoolsTable {
    schools: BTreeMap<String, School>,
}

impl SchoolsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a school
    pub fn add_school(&mut self, school: School) {
        self.schools.insert(school.name.clone(), school);
    }

    /// Append a skill to the school named by its descriptor
    pub fn add_skill(&mut self, skill: Skill) -> Result<()> {
        let school_name = skill.school().to_string();
        let school = self
            .schools
            .get_mut(&school_name)
            .ok_or_else(|| DuelError::NoSuchSchool(school_name.clone()))?;
        if school.skill(&skill.name).is_some() {
            return Err(DuelError::DuplicateSkill {
                school: school_name,
                skill: skill.name,
            });
        }
        school.skills.push(skill);
        Ok(())
    }

    pub fn get_school(&self, name: &str) -> Result<&School> {
        self.schools
            .get(name)
            .ok_or_else(|| DuelError::NoSuchSchool(name.to_string()))
    }

    pub fn get_skill(&self, school: &str, skill: &str) -> Result<&Skill> {
        self.schools
            .get(school)
            .and_then(|s| s.skill(skill))
            .ok_or_else(|| DuelError::NoSuchSkill {
                school: school.to_string(),
                skill: skill.to_string(),
            })
    }

    pub fn contains_school(&self, name: &str) -> bool {
        self.schools.contains_key(name)
    }

    /// Does `attacker` dominate `defender`? Unknown schools dominate nothing.
    pub fn dominates(&self, attacker: &str, defender: &str) -> bool {
        self.schools
            .get(attacker)
            .is_some_and(|school| school.dominates(defender))
    }

    /// Damage multiplier for a troop of `attacker` school hitting `defender` school
    ///
    /// Only the pairwise relation between the two schools matters.
    pub fn combat_multiplier(&self, attacker: &str, defender: &str) -> f64 {
        if attacker == defender {
            1.0
        } else if self.dominates(attacker, defender) {
            DOMINANT_MULTIPLIER
        } else if self.dominates(defender, attacker) {
            DOMINATED_MULTIPLIER
        } else {
            1.0
        }
    }

    pub fn schools_amount(&self) -> usize {
        self.schools.len()
    }

    pub fn skills_amount(&self) -> usize {
        self.schools.values().map(|s| s.skills.len()).sum()
    }

    pub fn schools(&self) -> impl Iterator<Item = &School> {
        self.schools.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::skill::Production;
    use crate::units::descriptor::fixtures::{calculus, commission};

    fn msu_mephi() -> SchoolsTable {
        let mut table = SchoolsTable::new();
        table.add_school(
            School::new("MSU").with_skill(Skill::new("Classes", calculus(), Production::Amoral, 0.0, 0.0)),
        );
        table.add_school(
            School::new("MEPhI")
                .with_dominance(["MSU"])
                .with_skill(Skill::new("Commission", commission(), Production::Moral, 0.0, 0.0)),
        );
        table
    }

    #[test]
    fn test_multiplier_follows_dominance() {
        let table = msu_mephi();
        assert_eq!(table.combat_multiplier("MEPhI", "MSU"), 1.2);
        assert_eq!(table.combat_multiplier("MSU", "MEPhI"), 0.8);
        assert_eq!(table.combat_multiplier("MSU", "MSU"), 1.0);
        assert_eq!(table.combat_multiplier("MSU", "Unknown"), 1.0);
    }

    #[test]
    fn test_mutual_dominance_favours_attacker() {
        let mut table = SchoolsTable::new();
        table.add_school(School::new("A").with_dominance(["B"]));
        table.add_school(School::new("B").with_dominance(["A"]));
        assert_eq!(table.combat_multiplier("A", "B"), 1.2);
        assert_eq!(table.combat_multiplier("B", "A"), 1.2);
    }

    #[test]
    fn test_dominance_is_not_transitive() {
        let mut table = SchoolsTable::new();
        table.add_school(School::new("A").with_dominance(["B"]));
        table.add_school(School::new("B").with_dominance(["C"]));
        table.add_school(School::new("C"));
        assert_eq!(table.combat_multiplier("A", "C"), 1.0);
    }

    #[test]
    fn test_add_skill_appends_to_declared_school() {
        let mut table = SchoolsTable::new();
        table.add_school(School::new("Mix"));
        assert_eq!(table.get_school("Mix").unwrap().skills.len(), 0);

        let mut classes = calculus();
        classes.school = "Mix".into();
        let mut board = commission();
        board.school = "Mix".into();
        table.add_skill(Skill::new("Classes", classes, Production::Amoral, 0.0, 0.0)).unwrap();
        table.add_skill(Skill::new("Commission", board, Production::Moral, 0.0, 0.0)).unwrap();

        assert_eq!(table.get_skill("Mix", "Classes").unwrap().descriptor.initiative, 0.5);
        assert_eq!(table.schools_amount(), 1);
        assert_eq!(table.skills_amount(), 2);
    }

    #[test]
    fn test_lookup_failures() {
        let table = msu_mephi();
        assert!(matches!(
            table.get_skill("MEPhI", "Love"),
            Err(DuelError::NoSuchSkill { .. })
        ));
        assert!(matches!(table.get_skill("Nowhere", "Classes"), Err(DuelError::NoSuchSkill { .. })));
        assert!(matches!(table.get_school("Nowhere"), Err(DuelError::NoSuchSchool(_))));
    }

    #[test]
    fn test_duplicate_and_orphan_skills_rejected() {
        let mut table = msu_mephi();
        let dup = Skill::new("Classes", calculus(), Production::Amoral, 0.0, 0.0);
        assert!(matches!(table.add_skill(dup), Err(DuelError::DuplicateSkill { .. })));

        let mut orphan = calculus();
        orphan.school = "Nowhere".into();
        let orphan = Skill::new("Lost", orphan, Production::Amoral, 0.0, 0.0);
        assert!(matches!(table.add_skill(orphan), Err(DuelError::NoSuchSchool(_))));
    }
}
