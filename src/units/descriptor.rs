//! Immutable template stats for troops and leaders

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::Side;

/// Stats shared by every troop built from one template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub name: String,
    pub school: String,
    pub initiative: f64,
    pub max_amount: u32,
    /// Flat damage per attack for the whole group
    pub damage: f64,
    /// HP of a single creature in the group
    pub entity_hp: f64,
    /// Cells per turn along each axis
    pub speed: i32,
    pub defence: f64,
    pub xp_for_destroy: f64,
    /// Morale baseline; present only for morale-capable troops
    pub morality: Option<f64>,
}

impl UnitDescriptor {
    /// HP pool of a full-strength group
    pub fn max_hp(&self) -> f64 {
        self.entity_hp * self.max_amount as f64
    }

    pub fn is_morale_capable(&self) -> bool {
        self.morality.is_some()
    }
}

/// Stats of a side's leader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummonerDescriptor {
    pub team: Side,
    pub name: String,
    pub initiative: f64,
    pub damage: f64,
    pub max_hp: f64,
    /// Energy multiplier applied by each accumulation after the first
    pub accumulation_coefficient: f64,
    pub max_energy: f64,
    /// Starting knowledge per school name
    pub knowledge: BTreeMap<String, f64>,
}
