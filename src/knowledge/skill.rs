//! Summonable skills and their production rule

use serde::{Deserialize, Serialize};

use crate::units::descriptor::UnitDescriptor;
use crate::units::factory::create_unit;
use crate::units::Unit;

/// Which troop variant a skill instantiates
///
/// Serialized names match the template and save files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Production {
    Moral,
    Amoral,
    #[serde(rename = "Ressurection")]
    Resurrection,
    Kamikaze,
}

/// A troop template gated by knowledge and energy
#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub name: String,
    pub descriptor: UnitDescriptor,
    pub production: Production,
    pub min_knowledge: f64,
    pub required_energy: f64,
    pub knowledge_coefficient: f64,
}

impl Skill {
    pub fn new(
        name: impl Into<String>,
        descriptor: UnitDescriptor,
        production: Production,
        min_knowledge: f64,
        required_energy: f64,
    ) -> Self {
        Self {
            name: name.into(),
            descriptor,
            production,
            min_knowledge,
            required_energy,
            knowledge_coefficient: 0.0,
        }
    }

    /// School the summoned troop fights for
    pub fn school(&self) -> &str {
        &self.descriptor.school
    }

    /// Build a fresh, undeployed unit at full strength
    pub fn create(&self) -> Unit {
        create_unit(self.production, &self.descriptor)
    }
}
