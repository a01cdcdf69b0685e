//! The leader unit of a side
//!
//! A summoner is indivisible (amount is always 1), ignores school dominance,
//! and spends energy and knowledge to summon troops. Its death ends the match.

use std::collections::BTreeMap;

use crate::core::error::{DuelError, Result};
use crate::core::types::{GridPos, Side};
use crate::knowledge::{SchoolsTable, Skill};
use crate::units::constants::{FIRST_ENERGY_CHARGE, UPGRADE_KNOWLEDGE_GAIN, UPGRADE_XP_COST};
use crate::units::descriptor::SummonerDescriptor;

#[derive(Debug, Clone, PartialEq)]
pub struct Summoner {
    pub descriptor: SummonerDescriptor,
    pub position: GridPos,
    current_hp: f64,
    energy: f64,
    xp: f64,
    knowledge: BTreeMap<String, f64>,
}

impl Summoner {
    /// Full HP, full energy, no XP
    pub fn new(descriptor: SummonerDescriptor) -> Self {
        Self {
            position: GridPos::default(),
            current_hp: descriptor.max_hp,
            energy: descriptor.max_energy,
            xp: 0.0,
            knowledge: descriptor.knowledge.clone(),
            descriptor,
        }
    }

    pub fn side(&self) -> Side {
        self.descriptor.team
    }

    pub fn current_hp(&self) -> f64 {
        self.current_hp
    }

    pub fn set_current_hp(&mut self, hp: f64) {
        self.current_hp = hp;
    }

    pub fn take_damage(&mut self, damage: f64) {
        self.current_hp -= damage;
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy;
    }

    pub fn xp(&self) -> f64 {
        self.xp
    }

    pub fn set_xp(&mut self, xp: f64) {
        self.xp = xp;
    }

    pub fn collect_xp(&mut self, xp: f64) {
        self.xp += xp;
    }

    pub fn knowledge(&self, school: &str) -> f64 {
        self.knowledge.get(school).copied().unwrap_or(0.0)
    }

    pub fn set_knowledge(&mut self, school: impl Into<String>, value: f64) {
        self.knowledge.insert(school.into(), value);
    }

    /// First charge from empty is a flat amount; later charges multiply, capped at max
    pub fn accumulate_energy(&mut self) {
        if self.energy == 0.0 {
            self.energy = FIRST_ENERGY_CHARGE;
        } else {
            self.energy = (self.energy * self.descriptor.accumulation_coefficient)
                .min(self.descriptor.max_energy);
        }
    }

    /// Trade XP for knowledge in one school
    pub fn upgrade_school(&mut self, school: &str) -> Result<()> {
        if self.xp < UPGRADE_XP_COST {
            return Err(DuelError::InsufficientXp {
                have: self.xp,
                need: UPGRADE_XP_COST,
            });
        }
        *self.knowledge.entry(school.to_string()).or_insert(0.0) += UPGRADE_KNOWLEDGE_GAIN;
        self.xp -= UPGRADE_XP_COST;
        Ok(())
    }

    /// Check knowledge and energy for a skill without spending anything
    pub fn check_summon(&self, skill: &Skill) -> Result<()> {
        let have = self.knowledge(skill.school());
        if have < skill.min_knowledge {
            return Err(DuelError::InsufficientKnowledge {
                school: skill.school().to_string(),
                have,
                need: skill.min_knowledge,
            });
        }
        if self.energy < skill.required_energy {
            return Err(DuelError::InsufficientEnergy {
                have: self.energy,
                need: skill.required_energy,
            });
        }
        Ok(())
    }

    pub fn spend_energy(&mut self, amount: f64) {
        self.energy -= amount;
    }

    /// Greedy choice: the affordable skill with the highest damage
    ///
    /// Scans the schools this leader has knowledge of, in name order. Later
    /// skills win ties. Returns `(school, skill)` names.
    pub fn preferred_skill(&self, schools: &SchoolsTable) -> Option<(String, String)> {
        let mut best: Option<(&str, &Skill)> = None;
        for (school_name, &knowledge) in &self.knowledge {
            let Ok(school) = schools.get_school(school_name) else {
                continue;
            };
            for skill in &school.skills {
                let affordable = knowledge >= skill.min_knowledge && self.energy >= skill.required_energy;
                let better = best.map_or(true, |(_, b)| skill.descriptor.damage >= b.descriptor.damage);
                if affordable && better {
                    best = Some((school_name, skill));
                }
            }
        }
        best.map(|(school, skill)| (school.to_string(), skill.name.clone()))
    }
}
